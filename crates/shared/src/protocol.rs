use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::AnalysisMethod;

pub const ANALYZE_PATH: &str = "/api/analyze/";
pub const HEALTH_PATH: &str = "/api/health/";
/// Multipart field that carries the uploaded video.
pub const VIDEO_FIELD: &str = "video";

/// Result record returned by the analysis service. Every field is optional:
/// the service omits what it could not measure, and a field with an
/// unexpected JSON type is treated as absent rather than failing the parse.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(
        default,
        deserialize_with = "lenient_step_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub step_count: Option<u64>,
    #[serde(
        default,
        deserialize_with = "lenient_angle",
        skip_serializing_if = "Option::is_none"
    )]
    pub average_lean_angle: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_note",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_method",
        skip_serializing_if = "Option::is_none"
    )]
    pub method: Option<AnalysisMethod>,
}

impl AnalysisResult {
    pub fn has_measurements(&self) -> bool {
        self.step_count.is_some() || self.average_lean_angle.is_some()
    }
}

fn lenient_step_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Number(number) => number.as_u64().or_else(|| {
            number
                .as_f64()
                .filter(|count| *count >= 0.0 && count.fract() == 0.0 && *count <= u64::MAX as f64)
                .map(|count| count as u64)
        }),
        _ => None,
    }))
}

fn lenient_angle<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| value.as_f64()))
}

fn lenient_note<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(note) => Some(note),
        _ => None,
    }))
}

fn lenient_method<'de, D>(deserializer: D) -> Result<Option<AnalysisMethod>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(tag) => Some(AnalysisMethod::from(tag)),
        _ => None,
    }))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
