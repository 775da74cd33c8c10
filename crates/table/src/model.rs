//! Table data model: header cells, rows and their identities.

use crate::TableError;
use crate::sort::SortDirection;

/// Glyph shown on columns that are not the active sort key.
pub const NEUTRAL_GLYPH: char = '↕';
/// Opacity applied to indicators of inactive columns.
pub const DIMMED_OPACITY: f32 = 0.6;

/// Stable identity of a row; survives sorting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// One record of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    id: RowId,
    cells: Vec<String>,
    hidden: bool,
}

impl Row {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Whether the current filter hides this row.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub(crate) fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Concatenated text of every cell, in column order.
    pub fn text(&self) -> String {
        self.cells.concat()
    }

    pub(crate) fn push_cell(&mut self, value: String) {
        self.cells.push(value);
    }
}

/// Small sort-direction marker rendered next to a header label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortIndicator {
    pub glyph: char,
    pub opacity: f32,
}

impl SortIndicator {
    pub fn neutral() -> Self {
        Self {
            glyph: NEUTRAL_GLYPH,
            opacity: DIMMED_OPACITY,
        }
    }

    pub fn active(direction: SortDirection) -> Self {
        Self {
            glyph: direction.glyph(),
            opacity: 1.0,
        }
    }

    pub fn is_dimmed(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Default for SortIndicator {
    fn default() -> Self {
        Self::neutral()
    }
}

/// A column header: its label text plus an optional indicator element.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    label: String,
    indicator: Option<SortIndicator>,
}

impl HeaderCell {
    /// Header with a neutral sort indicator, the shape produced by the loaders.
    pub fn sortable(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            indicator: Some(SortIndicator::neutral()),
        }
    }

    /// Header without any indicator element.
    pub fn plain(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            indicator: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn indicator(&self) -> Option<SortIndicator> {
        self.indicator
    }

    /// Full text of the header, indicator glyph included.
    pub fn text_content(&self) -> String {
        match self.indicator {
            Some(indicator) => format!("{} {}", self.label, indicator.glyph),
            None => self.label.clone(),
        }
    }

    /// Semantic label used for export: the label text when it is present,
    /// otherwise the whole trimmed text content.
    pub fn export_label(&self) -> String {
        let label = self.label.trim();
        if label.is_empty() {
            self.text_content().trim().to_string()
        } else {
            label.to_string()
        }
    }

    pub(crate) fn set_indicator(&mut self, indicator: SortIndicator) {
        if self.indicator.is_some() {
            self.indicator = Some(indicator);
        }
    }
}

/// Headers plus rows. Every row has exactly one cell per header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<HeaderCell>,
    rows: Vec<Row>,
    next_id: u64,
}

impl Table {
    /// Creates an empty table with sortable headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_headers(headers.into_iter().map(HeaderCell::sortable).collect())
    }

    pub fn with_headers(headers: Vec<HeaderCell>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            next_id: 0,
        }
    }

    /// Builds a table and validates every record against the header width.
    pub fn from_records<I, S>(headers: I, records: Vec<Vec<String>>) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(headers);
        for record in records {
            table.push_row(record)?;
        }
        Ok(table)
    }

    /// Appends a row, assigning it a fresh identity.
    pub fn push_row<I, S>(&mut self, cells: I) -> Result<RowId, TableError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<String> = cells.into_iter().map(Into::into).collect();
        if cells.len() != self.headers.len() {
            return Err(TableError::ColumnCountMismatch {
                row: self.rows.len() + 1,
                expected: self.headers.len(),
                found: cells.len(),
            });
        }
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(Row { id, cells, hidden: false });
        Ok(id)
    }

    /// Adds a column at the right edge; `values` must hold one entry per row.
    pub fn append_column(&mut self, header: HeaderCell, values: Vec<String>) -> Result<(), TableError> {
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnCountMismatch {
                row: values.len().min(self.rows.len()) + 1,
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        self.headers.push(header);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push_cell(value);
        }
        Ok(())
    }

    pub fn headers(&self) -> &[HeaderCell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut Vec<Row> {
        &mut self.rows
    }

    pub(crate) fn headers_mut(&mut self) -> &mut [HeaderCell] {
        &mut self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column whose label matches `name` (ASCII case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.headers.iter().position(|header| header.label().trim().eq_ignore_ascii_case(name))
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| !row.is_hidden())
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Text of one column for every row, in current order.
    pub fn column_values(&self, column: usize) -> Vec<&str> {
        self.rows.iter().filter_map(|row| row.cell(column)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_rows_with_wrong_width() {
        let mut table = Table::new(["Name", "Score"]);
        table.push_row(["Kepler-22 b", "0.91"]).unwrap();
        let error = table.push_row(["only one"]).unwrap_err();
        assert!(matches!(
            error,
            TableError::ColumnCountMismatch {
                row: 2,
                expected: 2,
                found: 1
            }
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn row_ids_are_unique_and_sequential() {
        let mut table = Table::new(["a"]);
        let first = table.push_row(["1"]).unwrap();
        let second = table.push_row(["2"]).unwrap();
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn export_label_skips_indicator_glyph() {
        let header = HeaderCell::sortable("koi_period");
        assert_eq!(header.text_content(), "koi_period ↕");
        assert_eq!(header.export_label(), "koi_period");

        let unlabeled = HeaderCell::sortable("  ");
        assert_eq!(unlabeled.export_label(), "↕");
    }

    #[test]
    fn append_column_extends_every_row() {
        let mut table = Table::new(["koi_period"]);
        table.push_row(["9.48"]).unwrap();
        table.push_row(["54.41"]).unwrap();
        table
            .append_column(HeaderCell::sortable("prediction"), vec!["Confirmed".into(), "Candidate".into()])
            .unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column_values(1), vec!["Confirmed", "Candidate"]);
        assert_eq!(table.column_index("PREDICTION"), Some(1));
    }
}
