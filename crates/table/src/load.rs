//! Builds tables from CSV and JSON sources.
//!
//! CSV follows the shape the prediction server accepts for uploads: a
//! header record, comma separated fields with optional double-quote quoting,
//! and `#` comment lines that are skipped.

use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use indexmap::IndexSet;
use serde_json::Value;

use crate::{Table, TableError};

/// Loads a `.csv` or `.json` file.
pub fn from_path(path: &Path) -> Result<Table, TableError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let read = || {
        fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })
    };
    match extension.as_str() {
        "csv" => from_csv_str(&read()?),
        "json" => from_json_str(&read()?),
        _ => Err(TableError::UnsupportedFile(path.to_path_buf())),
    }
}

/// Parses CSV text; the first record is the header.
///
/// Blank lines are skipped and every data record must have one field per
/// header column.
pub fn from_csv_str(input: &str) -> Result<Table, TableError> {
    let mut reader = ReaderBuilder::new()
        .comment(Some(b'#'))
        .flexible(false)
        .from_reader(input.as_bytes());
    let header = reader.headers().map_err(csv_error)?;
    if header.is_empty() {
        return Err(TableError::MissingHeader);
    }
    let mut table = Table::new(header.iter().map(str::trim));
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        table.push_row(record.iter())?;
    }
    Ok(table)
}

fn csv_error(error: csv::Error) -> TableError {
    let line = error.position().map_or(0, |position| position.line() as usize);
    let message = match error.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {expected_len} fields, found {len}")
        }
        _ => error.to_string(),
    };
    TableError::Csv { line, message }
}

/// Parses a JSON array of objects. Columns are the union of object keys in
/// first-seen order; missing keys and nulls become empty cells.
pub fn from_json_str(input: &str) -> Result<Table, TableError> {
    let value: Value = serde_json::from_str(input)?;
    from_json(&value)
}

pub fn from_json(value: &Value) -> Result<Table, TableError> {
    let Value::Array(items) = value else {
        return Err(TableError::UnsupportedJson);
    };
    let mut columns: IndexSet<&str> = IndexSet::new();
    for item in items {
        let Value::Object(map) = item else {
            return Err(TableError::UnsupportedJson);
        };
        columns.extend(map.keys().map(String::as_str));
    }

    let mut table = Table::new(columns.iter().copied());
    for item in items {
        table.push_row(columns.iter().map(|key| display_value(item.get(*key))))?;
    }
    Ok(table)
}

fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_comments_and_blank_lines() {
        let csv = "# exported from the KOI archive\nkepoi_name,koi_disposition,notes\r\n\nK00752.01,CONFIRMED,\"deep, clean\"\nK00753.01,FALSE POSITIVE,\"said \"\"maybe\"\"\"\n";
        let table = from_csv_str(csv).unwrap();
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].cells(), ["K00752.01", "CONFIRMED", "deep, clean"]);
        assert_eq!(table.rows()[1].cell(2), Some("said \"maybe\""));
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let table = from_csv_str("a,b\n\"first\nsecond\",2").unwrap();
        assert_eq!(table.rows()[0].cell(0), Some("first\nsecond"));
    }

    #[test]
    fn ragged_rows_report_their_line() {
        let error = from_csv_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(error, TableError::Csv { line: 3, .. }), "{error}");
        assert!(error.to_string().contains("expected 2 fields, found 1"), "{error}");
    }

    #[test]
    fn header_labels_are_trimmed_but_cells_are_kept() {
        let table = from_csv_str(" kepoi_name , koi_score\n K1 ,0.5").unwrap();
        let labels: Vec<&str> = table.headers().iter().map(|h| h.label()).collect();
        assert_eq!(labels, vec!["kepoi_name", "koi_score"]);
        assert_eq!(table.rows()[0].cell(0), Some(" K1 "));
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_input() {
        let table = from_csv_str("a\n\"open").unwrap();
        assert_eq!(table.rows()[0].cell(0), Some("open"));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(from_csv_str("# only a comment\n"), Err(TableError::MissingHeader)));
    }

    #[test]
    fn json_columns_are_unioned_in_order() {
        let table = from_json_str(r#"[{"name":"K1","score":0.5},{"name":"K2","prediction":"Candidate","score":null}]"#).unwrap();
        let labels: Vec<&str> = table.headers().iter().map(|h| h.label()).collect();
        assert_eq!(labels, vec!["name", "score", "prediction"]);
        assert_eq!(table.rows()[0].cells(), ["K1", "0.5", ""]);
        assert_eq!(table.rows()[1].cells(), ["K2", "", "Candidate"]);
    }

    #[test]
    fn json_must_be_array_of_objects() {
        assert!(matches!(from_json_str(r#"{"a":1}"#), Err(TableError::UnsupportedJson)));
        assert!(matches!(from_json_str("[1,2]"), Err(TableError::UnsupportedJson)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let error = from_path(Path::new("predictions.parquet")).unwrap_err();
        assert!(matches!(error, TableError::UnsupportedFile(_)));
    }
}
