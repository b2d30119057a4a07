use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use shared::protocol::{HealthResponse, ANALYZE_PATH, HEALTH_PATH, VIDEO_FIELD};
use thiserror::Error;
use tracing::debug;

use crate::{
    error::AnalysisError,
    settings::{ClientSettings, SettingsError},
    types::AnalysisRequest,
};

/// Status line and body of a response, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A request that the transport reported as failed. When the server did
/// answer, the response rides along so the caller can inspect it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportFailure {
    pub message: String,
    pub response: Option<TransportResponse>,
}

impl TransportFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            response: None,
        }
    }

    pub fn with_response(message: impl Into<String>, response: TransportResponse) -> Self {
        Self {
            message: message.into(),
            response: Some(response),
        }
    }
}

#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Sends one upload. Timeouts are the caller's concern.
    async fn submit(&self, request: AnalysisRequest)
        -> Result<TransportResponse, TransportFailure>;
}

pub struct HttpAnalysisTransport {
    http: Client,
    api_base_url: String,
}

impl HttpAnalysisTransport {
    /// `api_base_url` must already be normalized (no trailing slash).
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base_url: api_base_url.into(),
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, SettingsError> {
        Ok(Self::new(settings.normalized_api_base_url()?))
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.api_base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.api_base_url)
    }

    pub async fn health(&self) -> Result<HealthResponse, AnalysisError> {
        let response = self
            .http
            .get(self.health_url())
            .send()
            .await
            .map_err(|err| AnalysisError::transport(err.to_string()))?
            .error_for_status()
            .map_err(|err| AnalysisError::transport(err.to_string()))?;
        response
            .json::<HealthResponse>()
            .await
            .map_err(|err| AnalysisError::MalformedBody {
                detail: err.to_string(),
            })
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisTransport {
    async fn submit(
        &self,
        request: AnalysisRequest,
    ) -> Result<TransportResponse, TransportFailure> {
        let url = self.analyze_url();
        let part = Part::bytes(request.bytes)
            .file_name(request.file_name)
            .mime_str(&request.content_type)
            .map_err(|err| TransportFailure::new(format!("invalid upload content type: {err}")))?;
        let form = Form::new().part(VIDEO_FIELD, part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|err| TransportFailure::new(err.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            TransportFailure::new(format!("failed to read response body: {err}"))
        })?;
        debug!(%url, status = status.as_u16(), body_len = body.len(), "analysis response received");

        let response = TransportResponse::new(status.as_u16(), body);
        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportFailure::with_response(
                format!("request failed with status code {}", status.as_u16()),
                response,
            ))
        }
    }
}
