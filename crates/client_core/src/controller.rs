//! Upload workflow: owns the [`WorkflowState`] and drives one analysis
//! request at a time.

use std::{
    mem,
    sync::Arc,
    time::{Duration, Instant},
};

use shared::{error::ServiceErrorBody, protocol::AnalysisResult};
use tracing::{debug, info, warn};

use crate::{
    error::AnalysisError,
    transport::{AnalysisTransport, TransportFailure, TransportResponse},
    types::{AnalysisRequest, VideoFile, WorkflowState},
};

pub type AnalysisOutcome = Result<AnalysisResult, AnalysisError>;

pub struct UploadController {
    transport: Arc<dyn AnalysisTransport>,
    timeout: Duration,
    state: WorkflowState,
}

impl UploadController {
    pub fn new(transport: Arc<dyn AnalysisTransport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            state: WorkflowState::NoFile,
        }
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Makes `file` the analysis candidate and drops any previous result or
    /// error. Refused while a request is in flight.
    pub fn select_file(&mut self, file: VideoFile) -> Result<(), AnalysisError> {
        if self.state.is_analyzing() {
            warn!(file = file.name(), "file selection refused while analyzing");
            return Err(AnalysisError::InFlight);
        }
        info!(
            file = file.name(),
            bytes = file.len(),
            content_type = file.content_type(),
            "video selected"
        );
        self.state = WorkflowState::FileSelected(file);
        Ok(())
    }

    /// Moves the held file into Analyzing and hands back the attempt to run.
    /// A settled state that still holds its file starts a new attempt with it.
    ///
    /// Without a file the state becomes Failed and
    /// [`AnalysisError::NoFileSelected`] is returned; while another attempt is
    /// in flight [`AnalysisError::InFlight`] is returned and nothing changes.
    pub fn begin_analysis(&mut self) -> Result<PendingAnalysis, AnalysisError> {
        if self.state.is_analyzing() {
            debug!("analyze ignored: request already in flight");
            return Err(AnalysisError::InFlight);
        }
        let Some(file) = self.state.selected_file().cloned() else {
            self.state = WorkflowState::Failed {
                file: None,
                error: AnalysisError::NoFileSelected,
            };
            return Err(AnalysisError::NoFileSelected);
        };
        if self.state.is_settled() {
            debug!(
                file = file.name(),
                previous = self.state.label(),
                "analyzing held file again"
            );
        }

        let request = AnalysisRequest::for_file(&file);
        info!(file = file.name(), bytes = file.len(), "analysis started");
        self.state = WorkflowState::Analyzing(file);
        Ok(PendingAnalysis {
            transport: Arc::clone(&self.transport),
            timeout: self.timeout,
            request,
        })
    }

    /// Settles an in-flight attempt. Outcomes arriving outside Analyzing are
    /// dropped.
    pub fn complete(&mut self, outcome: AnalysisOutcome) {
        let file = match mem::take(&mut self.state) {
            WorkflowState::Analyzing(file) => file,
            other => {
                warn!(
                    state = other.label(),
                    "dropping analysis outcome with no attempt in flight"
                );
                self.state = other;
                return;
            }
        };

        self.state = match outcome {
            Ok(result) => {
                info!(
                    step_count = ?result.step_count,
                    average_lean_angle = ?result.average_lean_angle,
                    method = ?result.method.as_ref().map(|method| method.as_tag()),
                    "analysis succeeded"
                );
                WorkflowState::Succeeded { file, result }
            }
            Err(error) => {
                warn!("analysis failed: {error}");
                WorkflowState::Failed {
                    file: Some(file),
                    error,
                }
            }
        };
    }

    /// Runs a whole attempt: begin, await the request, settle.
    pub async fn analyze(&mut self) -> &WorkflowState {
        if let Ok(pending) = self.begin_analysis() {
            let outcome = pending.run().await;
            self.complete(outcome);
        }
        &self.state
    }
}

/// One upload waiting to be sent. Owns everything it needs, so it can run on
/// another task while the controller keeps serving commands.
pub struct PendingAnalysis {
    transport: Arc<dyn AnalysisTransport>,
    timeout: Duration,
    request: AnalysisRequest,
}

impl PendingAnalysis {
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub async fn run(self) -> AnalysisOutcome {
        let started = Instant::now();
        let file_name = self.request.file_name.clone();
        let timeout_ms = whole_millis(self.timeout);

        let outcome = match tokio::time::timeout(self.timeout, self.transport.submit(self.request))
            .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(file = %file_name, timeout_ms, "analysis request timed out");
                return Err(AnalysisError::Timeout { timeout_ms });
            }
        };

        debug!(
            file = %file_name,
            elapsed_ms = whole_millis(started.elapsed()),
            "analysis request finished"
        );
        resolve_outcome(outcome)
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Maps what the transport delivered onto a result or a user-facing error.
///
/// An `error` field in any body wins. Otherwise a 200 with a body is a
/// success even when the transport reported it as a failure.
pub fn resolve_outcome(outcome: Result<TransportResponse, TransportFailure>) -> AnalysisOutcome {
    match outcome {
        Ok(response) => resolve_response(&response).unwrap_or_else(|| {
            let detail = if response.is_ok() {
                "empty response body".to_string()
            } else {
                format!("unexpected response status {}", response.status)
            };
            Err(AnalysisError::transport(detail))
        }),
        Err(failure) => match failure.response.as_ref().and_then(resolve_response) {
            Some(Ok(result)) => {
                warn!(
                    "HTTP 200 delivered on the failure path ({}); using its body",
                    failure.message
                );
                Ok(result)
            }
            Some(Err(err)) => Err(err),
            None => Err(AnalysisError::transport(failure.message)),
        },
    }
}

fn resolve_response(response: &TransportResponse) -> Option<AnalysisOutcome> {
    if let Some(body) = ServiceErrorBody::from_body(&response.body) {
        return Some(Err(AnalysisError::Service(body.error)));
    }
    if !response.is_ok() || response.body.trim().is_empty() {
        return None;
    }
    Some(
        serde_json::from_str::<AnalysisResult>(&response.body).map_err(|err| {
            AnalysisError::MalformedBody {
                detail: err.to_string(),
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_saturate_instead_of_wrapping() {
        assert_eq!(whole_millis(Duration::from_millis(30_000)), 30_000);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }
}
