use std::{fmt, io, path::Path};

use shared::protocol::AnalysisResult;
use tokio::fs;

use crate::error::AnalysisError;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A video the user picked, held in memory until it is analyzed or replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl VideoFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads `path` and guesses its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let content_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        Ok(Self::new(name, content_type, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_video(&self) -> bool {
        self.content_type.starts_with("video/")
    }
}

impl fmt::Debug for VideoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Payload of one upload. Built per attempt and handed to the transport.
#[derive(Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AnalysisRequest {
    pub fn for_file(file: &VideoFile) -> Self {
        Self {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            bytes: file.bytes.clone(),
        }
    }
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Where the upload workflow stands. Settled states keep the file they were
/// computed from, so the same video can be analyzed again without picking it
/// a second time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState {
    #[default]
    NoFile,
    FileSelected(VideoFile),
    Analyzing(VideoFile),
    Succeeded {
        file: VideoFile,
        result: AnalysisResult,
    },
    Failed {
        file: Option<VideoFile>,
        error: AnalysisError,
    },
}

impl WorkflowState {
    pub fn is_analyzing(&self) -> bool {
        matches!(self, Self::Analyzing(_))
    }

    /// Succeeded or Failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed { .. })
    }

    pub fn selected_file(&self) -> Option<&VideoFile> {
        match self {
            Self::FileSelected(file) | Self::Analyzing(file) | Self::Succeeded { file, .. } => {
                Some(file)
            }
            Self::Failed { file, .. } => file.as_ref(),
            Self::NoFile => None,
        }
    }

    /// A file is held and no request is in flight.
    pub fn can_analyze(&self) -> bool {
        !self.is_analyzing() && self.selected_file().is_some()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::Succeeded { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&AnalysisError> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoFile => "no_file",
            Self::FileSelected(_) => "file_selected",
            Self::Analyzing(_) => "analyzing",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn from_path_guesses_video_content_type() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("morning_run.mp4");
        std::fs::write(&path, b"not really a video").expect("write");

        let file = VideoFile::from_path(&path).await.expect("read");
        assert_eq!(file.name(), "morning_run.mp4");
        assert_eq!(file.content_type(), "video/mp4");
        assert_eq!(file.len(), 18);
        assert!(file.is_video());
    }

    #[tokio::test]
    async fn from_path_falls_back_to_octet_stream() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("capture");
        std::fs::write(&path, b"\x00\x01").expect("write");

        let file = VideoFile::from_path(&path).await.expect("read");
        assert_eq!(file.content_type(), "application/octet-stream");
        assert!(!file.is_video());
    }

    #[test]
    fn settled_states_keep_their_file_for_another_attempt() {
        let file = VideoFile::new("run.mp4", "video/mp4", vec![1, 2, 3]);

        let succeeded = WorkflowState::Succeeded {
            file: file.clone(),
            result: AnalysisResult::default(),
        };
        assert_eq!(succeeded.selected_file(), Some(&file));
        assert!(succeeded.can_analyze());

        let failed = WorkflowState::Failed {
            file: Some(file.clone()),
            error: AnalysisError::Timeout { timeout_ms: 20 },
        };
        assert_eq!(failed.selected_file(), Some(&file));
        assert!(failed.can_analyze());

        let rejected = WorkflowState::Failed {
            file: None,
            error: AnalysisError::NoFileSelected,
        };
        assert!(!rejected.can_analyze());
        assert!(!WorkflowState::Analyzing(file).can_analyze());
    }

    #[test]
    fn debug_output_omits_payload_bytes() {
        let file = VideoFile::new("a.mp4", "video/mp4", vec![7; 64]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("len: 64"));
        assert!(!rendered.contains("7, 7"));
    }
}
