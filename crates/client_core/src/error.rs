use thiserror::Error;

/// Prefix of every user-facing message for a failure that did not come with
/// a service-provided explanation.
pub const GENERIC_FAILURE_PREFIX: &str = "An error occurred during analysis";

/// Why an analysis attempt ended in the failed state, or why a workflow
/// command was refused. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("Please select a video file")]
    NoFileSelected,
    #[error("An analysis is already in progress")]
    InFlight,
    #[error("An error occurred during analysis: request timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("An error occurred during analysis: {detail}")]
    Transport { detail: String },
    /// Text of the service's `error` field, surfaced untouched.
    #[error("{0}")]
    Service(String),
    #[error("An error occurred during analysis: malformed response body: {detail}")]
    MalformedBody { detail: String },
    #[error("analysis session has shut down")]
    SessionClosed,
}

impl AnalysisError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    /// Failures the user fixes locally without the service being involved.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::NoFileSelected | Self::InFlight)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Transport { .. })
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service(_) | Self::MalformedBody { .. })
    }
}
