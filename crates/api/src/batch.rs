//! Row-by-row classification of a whole table.

use exoscope_table::{HeaderCell, Table};
use exoscope_types::features::missing_features;
use exoscope_types::{Classification, ManualPredictionInput, PredictionSummary};
use futures_util::{StreamExt, stream};
use tracing::info;

use crate::{ApiError, PredictionClient};

/// Largest table the server accepts in one batch.
pub const MAX_UPLOAD_ROWS: usize = 100;
/// Predictions requested concurrently.
pub const MAX_IN_FLIGHT: usize = 4;
pub const PREDICTION_COLUMN: &str = "prediction";

/// A table with a `prediction` column appended, plus its class counts.
#[derive(Debug, Clone)]
pub struct ClassifiedTable {
    pub table: Table,
    pub summary: PredictionSummary,
}

impl PredictionClient {
    /// Classifies every row of `table` with `model`.
    ///
    /// The table is validated before any request goes out: it may hold at
    /// most [`MAX_UPLOAD_ROWS`] rows and must carry every required feature
    /// column. Rows are sent with bounded concurrency and results keep the
    /// table's row order.
    pub async fn classify_table(&self, model: &str, table: &Table) -> Result<ClassifiedTable, ApiError> {
        let inputs = prepare_inputs(model, table)?;

        let requests: Vec<_> = inputs.iter().map(|input| self.predict_manual(input)).collect();
        let labels: Vec<String> = stream::iter(requests)
            .buffered(MAX_IN_FLIGHT)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .collect::<Result<_, _>>()?;

        let summary: PredictionSummary = labels.iter().map(|label| Classification::from_label(label)).collect();
        let mut classified = table.clone();
        classified.append_column(HeaderCell::sortable(PREDICTION_COLUMN), labels)?;
        info!(
            model,
            total = summary.total,
            confirmed = summary.confirmed,
            candidate = summary.candidate,
            false_positive = summary.false_positive,
            "table classified"
        );
        Ok(ClassifiedTable {
            table: classified,
            summary,
        })
    }
}

/// Checks the batch limits and builds one payload per row.
fn prepare_inputs(model: &str, table: &Table) -> Result<Vec<ManualPredictionInput>, ApiError> {
    if table.len() > MAX_UPLOAD_ROWS {
        return Err(ApiError::PayloadTooLarge);
    }
    let headers: Vec<&str> = table.headers().iter().map(HeaderCell::label).collect();
    let missing = missing_features(headers.iter().copied());
    if !missing.is_empty() {
        return Err(ApiError::MissingFeatures(missing));
    }

    table
        .rows()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            ManualPredictionInput::from_record(model, &headers, row.cells())
                .map_err(|source| ApiError::InvalidRow { row: index + 1, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use exoscope_types::{FeatureError, REQUIRED_FEATURES};

    fn feature_table(rows: usize) -> Table {
        let mut headers: Vec<&str> = vec!["kepoi_name"];
        headers.extend(REQUIRED_FEATURES);
        let mut table = Table::new(headers);
        for n in 0..rows {
            let mut cells = vec![format!("K{n:05}.01")];
            cells.extend(REQUIRED_FEATURES.iter().map(|_| "1.25".to_string()));
            table.push_row(cells).unwrap();
        }
        table
    }

    #[test]
    fn prepares_one_payload_per_row() {
        let inputs = prepare_inputs("rf", &feature_table(3)).unwrap();
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs[0].model, "rf");
        assert_eq!(inputs[2].features["koi_srad"], 1.25);
    }

    #[test]
    fn rejects_tables_over_the_row_limit() {
        assert!(prepare_inputs("rf", &feature_table(MAX_UPLOAD_ROWS)).is_ok());
        let error = prepare_inputs("rf", &feature_table(MAX_UPLOAD_ROWS + 1)).unwrap_err();
        assert_eq!(error.to_string(), "File is too large. Please upload a smaller file.");
    }

    #[test]
    fn reports_missing_feature_columns() {
        let table = Table::new(["kepoi_name", "koi_period"]);
        let Err(ApiError::MissingFeatures(missing)) = prepare_inputs("rf", &table) else {
            panic!("expected missing features");
        };
        assert_eq!(missing.len(), REQUIRED_FEATURES.len() - 1);
        assert_eq!(missing[0], "koi_period_err1");
    }

    #[test]
    fn blank_feature_cells_name_the_row() {
        let mut table = feature_table(2);
        let mut cells: Vec<String> = table.rows()[0].cells().to_vec();
        cells[1] = String::new();
        table.push_row(cells).unwrap();

        let error = prepare_inputs("rf", &table).unwrap_err();
        assert!(matches!(
            error,
            ApiError::InvalidRow { row: 3, source: FeatureError::NotNumeric { .. } }
        ));
    }

    #[tokio::test]
    async fn validation_happens_before_any_request() {
        // Nothing listens on port 9; reaching the network would surface a
        // network error instead.
        let client = PredictionClient::new("http://127.0.0.1:9").unwrap();
        let error = client.classify_table("rf", &Table::new(["kepoi_name"])).await.unwrap_err();
        assert!(matches!(error, ApiError::MissingFeatures(_)));
    }

    #[tokio::test]
    async fn empty_feature_table_classifies_to_an_empty_column() {
        let client = PredictionClient::new("http://127.0.0.1:9").unwrap();
        let classified = client.classify_table("rf", &feature_table(0)).await.unwrap();
        assert_eq!(classified.summary.total, 0);
        assert_eq!(classified.table.headers().last().unwrap().label(), PREDICTION_COLUMN);
    }
}
