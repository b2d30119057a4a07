use serde::{Deserialize, Serialize};

/// Body the analysis service sends when it rejects or fails a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

impl ServiceErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Extracts the `error` string from a raw response body, if the body is a
    /// JSON object carrying one. Any other shape yields `None`.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<Self>(body).ok()
    }
}
