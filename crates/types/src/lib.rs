use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod features;

pub use features::{FeatureError, ManualPredictionInput, REQUIRED_FEATURES};

/// Disposition the prediction server assigns to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Confirmed,
    Candidate,
    #[serde(rename = "False Positive")]
    FalsePositive,
}

impl Classification {
    /// Maps a server label onto a classification. Anything that is neither
    /// "Confirmed" nor "Candidate" counts as a false positive, matching how
    /// the server tallies its batch results.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Confirmed" => Classification::Confirmed,
            "Candidate" => Classification::Candidate,
            _ => Classification::FalsePositive,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Classification::Confirmed => "Confirmed",
            Classification::Candidate => "Candidate",
            Classification::FalsePositive => "False Positive",
        }
    }

    /// Long form used in result banners.
    pub fn title(self) -> &'static str {
        match self {
            Classification::Confirmed => "Confirmed Exoplanet",
            Classification::Candidate => "Planetary Candidate",
            Classification::FalsePositive => "False Positive",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-class counts for a classified batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionSummary {
    pub confirmed: usize,
    pub candidate: usize,
    pub false_positive: usize,
    pub total: usize,
}

impl PredictionSummary {
    pub fn record(&mut self, classification: Classification) {
        match classification {
            Classification::Confirmed => self.confirmed += 1,
            Classification::Candidate => self.candidate += 1,
            Classification::FalsePositive => self.false_positive += 1,
        }
        self.total += 1;
    }
}

impl FromIterator<Classification> for PredictionSummary {
    fn from_iter<T: IntoIterator<Item = Classification>>(iter: T) -> Self {
        let mut summary = PredictionSummary::default();
        for classification in iter {
            summary.record(classification);
        }
        summary
    }
}

/// Metadata the server publishes for a trained model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Acknowledgement returned once a custom model finished training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub status: String,
    pub model: String,
}

impl TrainedModel {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// 3x3 confusion matrix. Rows are the actual class and columns the predicted
/// class, both in the order Confirmed, Candidate, False Positive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix(pub [[u64; 3]; 3]);

impl ConfusionMatrix {
    pub const ORDER: [Classification; 3] =
        [Classification::Confirmed, Classification::Candidate, Classification::FalsePositive];

    /// Reads the `confusion_matrix` field of a server response. Missing rows,
    /// missing cells and non-numeric cells read as zero.
    pub fn from_response(value: &Value) -> Self {
        let mut cells = [[0u64; 3]; 3];
        let rows = value.get("confusion_matrix").and_then(Value::as_array);
        for (row_index, row) in rows.into_iter().flatten().take(3).enumerate() {
            let Some(row) = row.as_array() else { continue };
            for (column_index, cell) in row.iter().take(3).enumerate() {
                cells[row_index][column_index] = cell
                    .as_u64()
                    .or_else(|| cell.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
                    .unwrap_or(0);
            }
        }
        ConfusionMatrix(cells)
    }

    pub fn get(&self, actual: Classification, predicted: Classification) -> u64 {
        let index = |c: Classification| Self::ORDER.iter().position(|o| *o == c).unwrap_or(0);
        self.0[index(actual)][index(predicted)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_labels_are_false_positives() {
        assert_eq!(Classification::from_label("Confirmed"), Classification::Confirmed);
        assert_eq!(Classification::from_label(" Candidate "), Classification::Candidate);
        assert_eq!(Classification::from_label("False Positive"), Classification::FalsePositive);
        assert_eq!(Classification::from_label("REFUTED"), Classification::FalsePositive);
    }

    #[test]
    fn summary_counts_each_class() {
        let summary: PredictionSummary = [
            Classification::Confirmed,
            Classification::FalsePositive,
            Classification::Confirmed,
            Classification::Candidate,
        ]
        .into_iter()
        .collect();
        assert_eq!(
            summary,
            PredictionSummary {
                confirmed: 2,
                candidate: 1,
                false_positive: 1,
                total: 4
            }
        );
    }

    #[test]
    fn confusion_matrix_tolerates_gaps() {
        let matrix = ConfusionMatrix::from_response(&json!({
            "confusion_matrix": [[50, 3, 1], [4, "x"], null]
        }));
        assert_eq!(matrix.0, [[50, 3, 1], [4, 0, 0], [0, 0, 0]]);
        assert_eq!(matrix.get(Classification::Confirmed, Classification::Candidate), 3);
        assert_eq!(ConfusionMatrix::from_response(&json!({})), ConfusionMatrix::default());
    }

    #[test]
    fn trained_model_reads_server_acknowledgement() {
        let trained: TrainedModel = serde_json::from_value(json!({"status": "ok", "model": "kepler_rf"})).unwrap();
        assert!(trained.is_ok());
        assert_eq!(trained.model, "kepler_rf");
    }

    #[test]
    fn classification_serializes_with_server_labels() {
        assert_eq!(serde_json::to_string(&Classification::FalsePositive).unwrap(), "\"False Positive\"");
    }
}
