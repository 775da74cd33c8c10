//! Training a custom model from uploaded CSV files.

use std::fs;
use std::path::{Path, PathBuf};

use exoscope_types::TrainedModel;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use tracing::{debug, info};

use crate::{ApiError, PredictionClient};

pub const TRAIN_PATH: &str = "/custom-model/train";
const CSV_MIME: &str = "text/csv";

impl PredictionClient {
    /// Trains a model called `name` on the given CSV files.
    ///
    /// The name and file list are checked before anything is read or sent.
    /// A failed response surfaces the server's `message` when it has one.
    pub async fn train_custom_model(&self, name: &str, files: &[PathBuf]) -> Result<TrainedModel, ApiError> {
        let response = self.training_request(name, files)?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %body, "training rejected");
            return Err(ApiError::training_failure(&body));
        }
        let trained: TrainedModel = serde_json::from_str(&body)
            .map_err(|e| ApiError::Training(Some(format!("unexpected training response: {e}"))))?;
        if !trained.is_ok() {
            return Err(ApiError::training_failure(&body));
        }
        info!(model = %trained.model, files = files.len(), "custom model trained");
        Ok(trained)
    }

    fn training_request(&self, name: &str, files: &[PathBuf]) -> Result<RequestBuilder, ApiError> {
        let name = validate_training_request(name, files)?;
        let mut form = Form::new().text("model_name", name.to_string());
        for path in files {
            form = form.part("files", csv_part(path)?);
        }
        Ok(self.request(Method::POST, TRAIN_PATH).multipart(form))
    }
}

/// Returns the trimmed model name once the request is known to be sendable.
fn validate_training_request<'a>(name: &'a str, files: &[PathBuf]) -> Result<&'a str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingModelName);
    }
    if files.is_empty() {
        return Err(ApiError::NoTrainingFiles);
    }
    if let Some(path) = files.iter().find(|path| !is_csv(path)) {
        return Err(ApiError::NotCsv(path.clone()));
    }
    Ok(name)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn csv_part(path: &Path) -> Result<Part, ApiError> {
    let bytes = fs::read(path).map_err(|source| ApiError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "training.csv".into());
    Ok(Part::bytes(bytes).file_name(file_name).mime_str(CSV_MIME)?)
}
