//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

pub enum BackendCommand {
    SelectFile { path: PathBuf },
    Analyze,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectFile { .. } => "select_file",
            Self::Analyze => "analyze",
        }
    }
}
