//! Applies backend events to the state the UI draws from.

use client_core::{render_state, WorkflowState};

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Default)]
pub struct UiModel {
    pub workflow: WorkflowState,
    pub status: String,
    pub banner: Option<UiError>,
}

pub fn reduce(model: &mut UiModel, event: UiEvent) {
    match event {
        UiEvent::Info(message) => {
            model.status = message;
        }
        UiEvent::StateChanged(state) => {
            model.banner = state
                .error()
                .map(|err| UiError::from_analysis(UiErrorContext::Analyze, err));
            model.status = render_state(&state).status;
            model.workflow = state;
        }
        UiEvent::Error(err) => {
            model.status = err.message().to_string();
            model.banner = Some(err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{AnalysisError, VideoFile};

    use crate::controller::events::UiErrorCategory;

    #[test]
    fn failed_state_raises_banner_and_selection_clears_it() {
        let mut model = UiModel::default();

        reduce(
            &mut model,
            UiEvent::StateChanged(WorkflowState::Failed {
                file: None,
                error: AnalysisError::Service("unsupported file format".to_string()),
            }),
        );
        let banner = model.banner.clone().expect("banner");
        assert_eq!(banner.category(), UiErrorCategory::Service);
        assert_eq!(banner.message(), "unsupported file format");
        assert_eq!(model.status, "Analysis failed");

        let file = VideoFile::new("run.mp4", "video/mp4", vec![0; 8]);
        reduce(&mut model, UiEvent::StateChanged(WorkflowState::FileSelected(file)));
        assert!(model.banner.is_none());
        assert_eq!(model.status, "Ready to analyze run.mp4");
    }

    #[test]
    fn backend_errors_leave_workflow_untouched() {
        let mut model = UiModel::default();
        reduce(
            &mut model,
            UiEvent::Error(UiError::from_message(
                UiErrorContext::SelectFile,
                "failed to read 'gone.mp4': No such file or directory (os error 2)",
            )),
        );
        assert_eq!(model.workflow, WorkflowState::NoFile);
        assert!(model.status.starts_with("failed to read"));
        assert!(model.banner.is_some());

        reduce(&mut model, UiEvent::Info("Backend ready".to_string()));
        assert_eq!(model.status, "Backend ready");
        assert!(model.banner.is_some());
    }
}
