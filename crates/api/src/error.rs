use std::io;
use std::path::PathBuf;

use exoscope_table::TableError;
use exoscope_types::FeatureError;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub const TOO_LARGE_MESSAGE: &str = "File is too large. Please upload a smaller file.";
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid file format. Please ensure the CSV contains the required columns.";
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file. Please try again.";
pub const TRAIN_FAILED_MESSAGE: &str = "Failed to train model";

/// Errors surfaced by [`crate::PredictionClient`]. Display strings are the
/// messages shown to the user.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid EXOSCOPE_API_BASE '{base}': {reason}")]
    InvalidBaseUrl { base: String, reason: String },
    #[error("File is too large. Please upload a smaller file.")]
    PayloadTooLarge,
    #[error("{}", .0.as_deref().unwrap_or(INVALID_FORMAT_MESSAGE))]
    Unprocessable(Option<String>),
    #[error("Missing required features: {}", .0.join(", "))]
    MissingFeatures(Vec<String>),
    #[error("Model '{0}' not found")]
    ModelNotFound(String),
    #[error("Error uploading file. Please try again.")]
    Upload { status: u16 },
    #[error("Prediction failed: {0}")]
    Prediction(String),
    #[error("Row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: FeatureError,
    },
    #[error("Please enter a model name.")]
    MissingModelName,
    #[error("Please upload at least one CSV file.")]
    NoTrainingFiles,
    #[error("Only CSV files are allowed.")]
    NotCsv(PathBuf),
    #[error("failed to read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}", .0.as_deref().unwrap_or(TRAIN_FAILED_MESSAGE))]
    Training(Option<String>),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("Network error: {0}. Hint: check that the prediction server is running")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Maps a non-success response onto the message the user sees.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge,
            StatusCode::UNPROCESSABLE_ENTITY => ApiError::Unprocessable(server_message(body)),
            _ => ApiError::Upload {
                status: status.as_u16(),
            },
        }
    }

    /// Maps a failed training response. Every status shows the server's
    /// message when it sent one.
    pub fn training_failure(body: &str) -> Self {
        ApiError::Training(server_message(body))
    }
}

/// Pulls a human readable message out of an error body. The server uses
/// `message`; validation failures carry `detail`.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
