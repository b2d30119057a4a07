//! Client side of the running-video analysis service: the upload workflow,
//! the HTTP transport that talks to the service, and the text renderer that
//! turns results into something a person can read.

pub mod controller;
pub mod error;
pub mod render;
pub mod session;
pub mod settings;
pub mod transport;
pub mod types;

pub use controller::{resolve_outcome, AnalysisOutcome, PendingAnalysis, UploadController};
pub use error::AnalysisError;
pub use render::{render_result, render_state, ResultBody, ResultView, WorkflowView};
pub use session::{AnalysisSession, SessionCommand};
pub use settings::{load_settings, ClientSettings, SettingsError};
pub use transport::{
    AnalysisTransport, HttpAnalysisTransport, TransportFailure, TransportResponse,
};
pub use types::{AnalysisRequest, VideoFile, WorkflowState};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
