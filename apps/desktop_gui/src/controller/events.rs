//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{AnalysisError, WorkflowState};

pub enum UiEvent {
    Info(String),
    StateChanged(WorkflowState),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Service,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SelectFile,
    Analyze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_analysis(context: UiErrorContext, err: &AnalysisError) -> Self {
        let category = if err.is_validation() {
            UiErrorCategory::Validation
        } else if err.is_transport() {
            UiErrorCategory::Transport
        } else if err.is_service() {
            UiErrorCategory::Service
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timed out")
            || message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("not found")
            || message_lower.contains("no such file")
            || message_lower.contains("permission denied")
            || message_lower.contains("must use http")
        {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn title(&self) -> &'static str {
        match (self.context(), self.category()) {
            (UiErrorContext::BackendStartup, _) => "Backend failed to start",
            (_, UiErrorCategory::Validation) => "Check your selection",
            (_, UiErrorCategory::Transport) => "Could not reach the analysis service",
            (_, UiErrorCategory::Service) => "The analysis service reported an error",
            (_, UiErrorCategory::Unknown) => "Error",
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_errors_map_to_categories() {
        let cases = [
            (AnalysisError::NoFileSelected, UiErrorCategory::Validation),
            (
                AnalysisError::Timeout { timeout_ms: 30_000 },
                UiErrorCategory::Transport,
            ),
            (
                AnalysisError::Service("video too short".to_string()),
                UiErrorCategory::Service,
            ),
            (AnalysisError::SessionClosed, UiErrorCategory::Unknown),
        ];
        for (err, expected) in cases {
            let ui_error = UiError::from_analysis(UiErrorContext::Analyze, &err);
            assert_eq!(ui_error.category(), expected, "{err:?}");
            assert_eq!(ui_error.message(), err.to_string());
        }
    }

    #[test]
    fn file_read_failures_are_validation_errors() {
        let err = UiError::from_message(
            UiErrorContext::SelectFile,
            "failed to read 'C:/runs/a.mp4': No such file or directory (os error 2)",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.context(), UiErrorContext::SelectFile);
        assert_eq!(err.title(), "Check your selection");
    }

    #[test]
    fn startup_errors_keep_startup_title() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "backend worker startup failure: connection pool unavailable",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err.title(), "Backend failed to start");
    }
}
