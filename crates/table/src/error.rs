use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, loading or exporting a table.
///
/// Interactive operations on a missing table or a missing anchor never
/// produce one of these; they are logged and ignored instead.
#[derive(Debug, Error)]
pub enum TableError {
    /// A row did not have one cell per header column.
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    ColumnCountMismatch { row: usize, expected: usize, found: usize },

    /// The CSV input could not be tokenized.
    #[error("CSV parse error on line {line}: {message}")]
    Csv { line: usize, message: String },

    /// The input contained no header record.
    #[error("table data is empty; expected a header row")]
    MissingHeader,

    /// JSON input was not an array of objects.
    #[error("expected a JSON array of objects")]
    UnsupportedJson,

    /// The file extension is not one we know how to load.
    #[error("unsupported table file '{}'; expected .csv or .json", .0.display())]
    UnsupportedFile(PathBuf),

    /// Reading a table file failed.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Writing the export artifact failed.
    #[error("export I/O error: {0}")]
    Io(#[from] io::Error),
}
