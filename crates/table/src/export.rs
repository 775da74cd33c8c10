//! CSV rendering and the on-disk export artifact.

use std::borrow::Cow;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;
use tracing::info;

use crate::{Table, TableError};

/// File name of every export.
pub const EXPORT_FILE_NAME: &str = "exoplanet_predictions.csv";
/// Media type of the export artifact.
pub const EXPORT_MIME_TYPE: &str = "text/csv;charset=utf-8;";

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n|\r").expect("line break pattern is valid"));

/// Escapes one CSV field.
///
/// Line breaks collapse to a single space first. The result is quoted, with
/// inner quotes doubled, when it contains a comma or a double quote (or a
/// line break, which cannot survive the collapse).
pub fn escape_field(value: &str) -> Cow<'_, str> {
    let collapsed = LINE_BREAK.replace_all(value, " ");
    if collapsed.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", collapsed.replace('"', "\"\"")))
    } else {
        collapsed
    }
}

/// Renders header labels and every row (hidden ones included) as CSV.
/// Records are joined with `\n` and there is no trailing newline.
pub fn to_csv(table: &Table) -> String {
    let header = table.headers().iter().map(|header| header.export_label());
    let mut lines = Vec::with_capacity(table.len() + 1);
    lines.push(join_record(header));
    for row in table.rows() {
        lines.push(join_record(row.cells().iter().map(|cell| cell.trim().to_string())));
    }
    lines.join("\n")
}

fn join_record(fields: impl Iterator<Item = String>) -> String {
    fields.map(|field| escape_field(&field).into_owned()).collect::<Vec<_>>().join(",")
}

/// Writes `contents` to [`EXPORT_FILE_NAME`] inside `directory`.
///
/// The bytes go to a temporary file in the same directory which is renamed
/// into place on success. On any failure the temporary file is removed when
/// it drops, so no partial artifact is left behind.
pub fn write_export(directory: &Path, contents: &str) -> Result<PathBuf, TableError> {
    fs::create_dir_all(directory)?;
    let mut staged = NamedTempFile::new_in(directory)?;
    staged.write_all(contents.as_bytes())?;
    staged.flush()?;

    let target = directory.join(EXPORT_FILE_NAME);
    staged.persist(&target).map_err(|error| TableError::Io(error.error))?;
    info!(path = %target.display(), bytes = contents.len(), mime = EXPORT_MIME_TYPE, "exported results table");
    Ok(target)
}
