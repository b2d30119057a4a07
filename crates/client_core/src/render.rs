//! Turns workflow state and analysis results into display text. Everything
//! here is a pure function of its input.

use std::{borrow::Cow, fmt};

use shared::{domain::AnalysisMethod, protocol::AnalysisResult};

use crate::types::WorkflowState;

pub const RESULT_TITLE: &str = "Analysis result";
pub const NO_RESULT_MESSAGE: &str =
    "No analysis result yet. Upload a video and run the analysis.";
pub const NOT_MEASURED: &str = "could not be measured";
pub const STEPS_LABEL: &str = "Steps";
pub const LEAN_ANGLE_LABEL: &str = "Average lean angle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub term: &'static str,
    pub description: &'static str,
}

pub static LEGEND: [LegendEntry; 2] = [
    LegendEntry {
        term: "Steps",
        description: "total number of steps detected across the video",
    },
    LegendEntry {
        term: "Lean angle",
        description: "closer to 90 degrees is more upright; smaller values mean more forward lean",
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub note: Option<String>,
    pub method_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultBody {
    Placeholder(&'static str),
    Report {
        steps: String,
        lean_angle: String,
        explanation: Option<Explanation>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub title: &'static str,
    pub body: ResultBody,
    pub legend: &'static [LegendEntry],
}

pub fn method_label(method: &AnalysisMethod) -> Cow<'static, str> {
    match method {
        AnalysisMethod::OpencvBasic => Cow::Borrowed("OpenCV-based analysis"),
        AnalysisMethod::Mediapipe => Cow::Borrowed("MediaPipe high-precision analysis"),
        AnalysisMethod::Other(tag) if tag.trim().is_empty() => {
            Cow::Borrowed("Other analysis method")
        }
        AnalysisMethod::Other(tag) => Cow::Owned(format!("Other analysis method ({tag})")),
    }
}

pub fn format_steps(step_count: Option<u64>) -> String {
    match step_count {
        Some(count) => format!("{count} steps"),
        None => NOT_MEASURED.to_string(),
    }
}

pub fn format_lean_angle(angle: Option<f64>) -> String {
    match angle {
        Some(angle) if angle.is_finite() => format!("{angle} degrees"),
        _ => NOT_MEASURED.to_string(),
    }
}

pub fn render_result(result: Option<&AnalysisResult>) -> ResultView {
    let body = match result {
        None => ResultBody::Placeholder(NO_RESULT_MESSAGE),
        Some(result) => {
            let note = result
                .note
                .as_deref()
                .map(str::trim)
                .filter(|note| !note.is_empty())
                .map(str::to_string);
            let method_label = result
                .method
                .as_ref()
                .map(|method| method_label(method).into_owned());
            let explanation = (note.is_some() || method_label.is_some()).then_some(Explanation {
                note,
                method_label,
            });
            ResultBody::Report {
                steps: format_steps(result.step_count),
                lean_angle: format_lean_angle(result.average_lean_angle),
                explanation,
            }
        }
    };

    ResultView {
        title: RESULT_TITLE,
        body,
        legend: &LEGEND,
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        match &self.body {
            ResultBody::Placeholder(message) => writeln!(f, "  {message}")?,
            ResultBody::Report {
                steps,
                lean_angle,
                explanation,
            } => {
                writeln!(f, "  {STEPS_LABEL}: {steps}")?;
                writeln!(f, "  {LEAN_ANGLE_LABEL}: {lean_angle}")?;
                if let Some(explanation) = explanation {
                    writeln!(f)?;
                    writeln!(f, "Analysis method")?;
                    if let Some(note) = &explanation.note {
                        writeln!(f, "  {note}")?;
                    }
                    if let Some(label) = &explanation.method_label {
                        writeln!(f, "  Method used: {label}")?;
                    }
                }
            }
        }
        writeln!(f)?;
        writeln!(f, "How to read the result")?;
        for entry in self.legend {
            writeln!(f, "  - {}: {}", entry.term, entry.description)?;
        }
        Ok(())
    }
}

/// Everything a UI needs to draw the current workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowView {
    pub status: String,
    pub selected_file: Option<String>,
    pub error: Option<String>,
    pub can_analyze: bool,
    pub is_analyzing: bool,
    pub result: ResultView,
}

pub fn render_state(state: &WorkflowState) -> WorkflowView {
    let status = match state {
        WorkflowState::NoFile => "Choose a running video to analyze".to_string(),
        WorkflowState::FileSelected(file) => format!("Ready to analyze {}", file.name()),
        WorkflowState::Analyzing(file) => format!("Analyzing {}...", file.name()),
        WorkflowState::Succeeded { .. } => "Analysis complete".to_string(),
        WorkflowState::Failed { .. } => "Analysis failed".to_string(),
    };

    WorkflowView {
        status,
        selected_file: state.selected_file().map(|file| file.name().to_string()),
        error: state.error().map(ToString::to_string),
        can_analyze: state.can_analyze(),
        is_analyzing: state.is_analyzing(),
        result: render_result(state.result()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AnalysisError, types::VideoFile};

    #[test]
    fn absent_result_renders_placeholder_and_legend() {
        let view = render_result(None);
        assert_eq!(view.body, ResultBody::Placeholder(NO_RESULT_MESSAGE));
        assert_eq!(view.legend.len(), 2);

        let text = view.to_string();
        assert!(text.contains(NO_RESULT_MESSAGE));
        assert!(text.contains("closer to 90 degrees is more upright"));
    }

    #[test]
    fn missing_step_count_degrades_to_placeholder() {
        let result = AnalysisResult {
            average_lean_angle: Some(45.2),
            ..AnalysisResult::default()
        };
        let view = render_result(Some(&result));
        match &view.body {
            ResultBody::Report {
                steps,
                lean_angle,
                explanation,
            } => {
                assert_eq!(steps, NOT_MEASURED);
                assert_eq!(lean_angle, "45.2 degrees");
                assert!(explanation.is_none());
            }
            other => panic!("expected report, got {other:?}"),
        }
    }

    #[test]
    fn known_method_maps_to_label() {
        let result = AnalysisResult {
            step_count: Some(120),
            average_lean_angle: Some(78.5),
            note: None,
            method: Some(AnalysisMethod::OpencvBasic),
        };
        let text = render_result(Some(&result)).to_string();
        assert!(text.contains("120 steps"));
        assert!(text.contains("78.5 degrees"));
        assert!(text.contains("Method used: OpenCV-based analysis"));
    }

    #[test]
    fn unknown_method_gets_default_label() {
        assert_eq!(
            method_label(&AnalysisMethod::from("dummy_analysis")),
            "Other analysis method (dummy_analysis)"
        );
        assert_eq!(
            method_label(&AnalysisMethod::from("")),
            "Other analysis method"
        );
        assert_eq!(
            method_label(&AnalysisMethod::Mediapipe),
            "MediaPipe high-precision analysis"
        );
    }

    #[test]
    fn note_alone_produces_explanation_block() {
        let result = AnalysisResult {
            note: Some("fell back to the basic detector".to_string()),
            ..AnalysisResult::default()
        };
        let view = render_result(Some(&result));
        let ResultBody::Report { explanation, .. } = &view.body else {
            panic!("expected report");
        };
        assert_eq!(
            explanation.as_ref(),
            Some(&Explanation {
                note: Some("fell back to the basic detector".to_string()),
                method_label: None,
            })
        );
    }

    #[test]
    fn rendering_is_idempotent() {
        let result = AnalysisResult {
            step_count: Some(64),
            average_lean_angle: Some(82.0),
            note: Some("pose landmarks".to_string()),
            method: Some(AnalysisMethod::Mediapipe),
        };
        let first = render_result(Some(&result));
        let second = render_result(Some(&result));
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn whole_degrees_render_without_fraction() {
        assert_eq!(format_lean_angle(Some(85.0)), "85 degrees");
        assert_eq!(format_steps(Some(0)), "0 steps");
    }

    #[test]
    fn workflow_view_tracks_state() {
        let file = VideoFile::new("run.mp4", "video/mp4", vec![1, 2, 3]);

        let selected = render_state(&WorkflowState::FileSelected(file.clone()));
        assert!(selected.can_analyze);
        assert_eq!(selected.selected_file.as_deref(), Some("run.mp4"));
        assert_eq!(selected.result.body, ResultBody::Placeholder(NO_RESULT_MESSAGE));

        let analyzing = render_state(&WorkflowState::Analyzing(file.clone()));
        assert!(!analyzing.can_analyze);
        assert!(analyzing.is_analyzing);

        let failed = render_state(&WorkflowState::Failed {
            file: Some(file.clone()),
            error: AnalysisError::Timeout { timeout_ms: 30_000 },
        });
        assert!(failed.error.as_deref().unwrap_or_default().contains("timed out"));
        assert_eq!(failed.result.body, ResultBody::Placeholder(NO_RESULT_MESSAGE));
        assert_eq!(failed.selected_file.as_deref(), Some("run.mp4"));
        assert!(failed.can_analyze);

        let succeeded = render_state(&WorkflowState::Succeeded {
            file,
            result: AnalysisResult::default(),
        });
        assert_eq!(succeeded.status, "Analysis complete");
        assert!(succeeded.can_analyze);

        let rejected = render_state(&WorkflowState::Failed {
            file: None,
            error: AnalysisError::NoFileSelected,
        });
        assert!(rejected.selected_file.is_none());
        assert!(!rejected.can_analyze);
    }
}
