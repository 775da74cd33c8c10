//! Exoscope prediction server client.
//!
//! This crate wraps a `reqwest::Client` configured for the classifier
//! server. It focuses on:
//!
//! - Validating `EXOSCOPE_API_BASE` before any request leaves the machine
//! - Building requests with a consistent User-Agent
//! - Translating error responses into the messages users see
//! - Classifying a whole table row by row (see [`PredictionClient::classify_table`])
//! - Training custom models from CSV uploads
//!
//! ```ignore
//! let client = PredictionClient::new_from_env()?;
//! let info = client.model_info("random_forest").await?;
//! println!("{} uses {} features", info.model_name, info.features.len());
//! ```

use std::env;
use std::time::Duration;

use exoscope_types::{ConfusionMatrix, ManualPredictionInput, ModelInfo};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde_json::Value;
use tracing::{debug, info};

mod batch;
mod error;
mod training;

pub use batch::{ClassifiedTable, MAX_IN_FLIGHT, MAX_UPLOAD_ROWS, PREDICTION_COLUMN};
pub use error::{ApiError, INVALID_FORMAT_MESSAGE, TOO_LARGE_MESSAGE, TRAIN_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE};
pub use training::TRAIN_PATH;

pub const API_BASE_ENV: &str = "EXOSCOPE_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for the prediction
/// server.
pub struct PredictionClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl PredictionClient {
    /// Construct a client from `EXOSCOPE_API_BASE`, falling back to the local
    /// development server.
    pub fn new_from_env() -> Result<Self, ApiError> {
        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.into());
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        validate_base_url(&base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("exoscope/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    /// Build a request for a method and server-relative path.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }

    /// Classifies one record. Returns the label the model produced.
    pub async fn predict_manual(&self, input: &ManualPredictionInput) -> Result<String, ApiError> {
        let response = self.request(Method::POST, "/predict/manual").json(input).send().await?;
        let body = read_json(response).await?;
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return Err(ApiError::Prediction(message.to_string()));
        }
        prediction_label(&body).ok_or_else(|| ApiError::Prediction("response carried no prediction".into()))
    }

    pub async fn model_info(&self, name: &str) -> Result<ModelInfo, ApiError> {
        let response = self.request(Method::GET, &format!("/model/{name}")).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::ModelNotFound(name.to_string()));
        }
        let body = read_json(response).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Prediction(format!("unexpected model info: {e}")))
    }

    pub async fn confusion_matrix(&self, name: &str) -> Result<ConfusionMatrix, ApiError> {
        let response = self
            .request(Method::GET, &format!("/model/{name}/confusion-matrix"))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::ModelNotFound(name.to_string()));
        }
        let body = read_json(response).await?;
        info!(model = name, "confusion matrix fetched");
        Ok(ConfusionMatrix::from_response(&body))
    }
}

/// Reads a success body as JSON, mapping error statuses first.
async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        debug!(status = status.as_u16(), body = %text, "server returned an error status");
        return Err(ApiError::from_status(status, &text));
    }
    parse_body(&text)
}

fn parse_body(text: &str) -> Result<Value, ApiError> {
    serde_json::from_str(text).map_err(|e| ApiError::Prediction(format!("malformed server response: {e}")))
}

/// The model may answer with a bare label or a one-element list.
fn prediction_label(body: &Value) -> Option<String> {
    match body.get("prediction")? {
        Value::String(label) => Some(label.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`, `127.0.0.1` or `[::1]`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        base: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;
    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("URL must include a host".into()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn localhost_accepts_any_scheme() {
        assert!(validate_base_url("http://127.0.0.1:8000").is_ok());
        assert!(validate_base_url("http://LOCALHOST:9000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_base_url("https://exoplanets.example.org").is_ok());
        let error = validate_base_url("http://exoplanets.example.org").unwrap_err();
        assert!(error.to_string().contains("https"), "{error}");
        assert!(matches!(validate_base_url("not a url"), Err(ApiError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = PredictionClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:8000");
    }

    #[test]
    fn malformed_bodies_are_reported() {
        assert_eq!(parse_body(r#"{"prediction":"Candidate"}"#).unwrap(), json!({"prediction": "Candidate"}));
        let error = parse_body("<html>upstream timeout</html>").unwrap_err();
        assert!(matches!(error, ApiError::Prediction(_)));
        assert!(error.to_string().starts_with("Prediction failed: malformed server response:"), "{error}");
        assert!(parse_body("").is_err());
    }

    #[test]
    fn prediction_label_accepts_string_or_list() {
        assert_eq!(prediction_label(&json!({"prediction": "Candidate"})).as_deref(), Some("Candidate"));
        assert_eq!(prediction_label(&json!({"prediction": ["Confirmed"]})).as_deref(), Some("Confirmed"));
        assert_eq!(prediction_label(&json!({"other": 1})), None);
    }
}
