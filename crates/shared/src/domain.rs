use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag the analysis service attaches to a result to say which technique
/// produced it. Unknown tags are kept verbatim so nothing is lost on the way
/// to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnalysisMethod {
    /// Frame-difference heuristics on plain OpenCV.
    OpencvBasic,
    /// Pose-landmark tracking.
    Mediapipe,
    Other(String),
}

impl AnalysisMethod {
    pub const OPENCV_BASIC_TAG: &'static str = "opencv_basic";
    pub const MEDIAPIPE_TAG: &'static str = "mediapipe";

    pub fn as_tag(&self) -> &str {
        match self {
            Self::OpencvBasic => Self::OPENCV_BASIC_TAG,
            Self::Mediapipe => Self::MEDIAPIPE_TAG,
            Self::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for AnalysisMethod {
    fn from(value: String) -> Self {
        match value.as_str() {
            Self::OPENCV_BASIC_TAG => Self::OpencvBasic,
            Self::MEDIAPIPE_TAG => Self::Mediapipe,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for AnalysisMethod {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<AnalysisMethod> for String {
    fn from(value: AnalysisMethod) -> Self {
        match value {
            AnalysisMethod::Other(tag) => tag,
            known => known.as_tag().to_string(),
        }
    }
}

impl fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}
