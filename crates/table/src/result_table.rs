//! The interactive results table.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::bindings::{Anchor, Bindings, Operation, Outcome, TriggerEvent};
use crate::export::{to_csv, write_export};
use crate::filter::FilterState;
use crate::page::PageState;
use crate::sort::{SortState, sort_rows, update_indicators};
use crate::{Row, Table, TableError};

/// A table plus its sort, filter and paging state.
///
/// All state lives on the instance, so several result tables can coexist.
/// Every operation on a missing table is a logged no-op.
#[derive(Debug)]
pub struct ResultTable {
    table: Option<Table>,
    sort: SortState,
    filter: FilterState,
    page: PageState,
    bindings: Bindings,
    export_dir: PathBuf,
}

impl Default for ResultTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultTable {
    pub fn new() -> Self {
        Self {
            table: None,
            sort: SortState::default(),
            filter: FilterState::default(),
            page: PageState::default(),
            bindings: Bindings::default(),
            export_dir: PathBuf::from("."),
        }
    }

    /// Directory the export artifact is written to.
    pub fn with_export_dir(mut self, directory: impl Into<PathBuf>) -> Self {
        self.export_dir = directory.into();
        self
    }

    pub fn with_page_state(mut self, page: PageState) -> Self {
        self.page = page;
        self
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn page_state(&self) -> &PageState {
        &self.page
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Swaps in a new table.
    ///
    /// The active sort and the page size carry over and are applied to the
    /// new rows, the current filter term is re-applied, and paging restarts
    /// at the first page. Bindings stay as they are until the host calls
    /// [`ResultTable::initialize`] again.
    pub fn replace_table(&mut self, mut table: Table) {
        if let Some(column) = self.sort.column() {
            if column < table.column_count() {
                sort_rows(&mut table, column, self.sort.direction());
            } else {
                debug!(column, "previous sort column is missing from the new table; keeping row order");
                self.sort = SortState::default();
            }
        }
        update_indicators(&mut table, &self.sort);
        let visible = self.filter.apply(&mut table);
        self.page.first_page();
        debug!(rows = table.len(), visible, columns = table.column_count(), "results table replaced");
        self.table = Some(table);
    }

    /// Binds every present anchor to its operation. Absent anchors are
    /// skipped; calling this again replaces the previous bindings.
    pub fn initialize(&mut self, anchors: &[Anchor]) {
        self.bindings.rebind(anchors);
        debug!(bound = self.bindings.len(), has_table = self.table.is_some(), "results table initialized");
    }

    /// Routes an anchor event to its bound operation.
    pub fn dispatch(&mut self, anchor: Anchor, event: TriggerEvent) -> Result<Outcome, TableError> {
        let Some(operation) = self.bindings.operation(anchor) else {
            debug!(?anchor, "event on unbound anchor ignored");
            return Ok(Outcome::Ignored);
        };
        let outcome = match (operation, event) {
            (Operation::Filter, TriggerEvent::Input(term)) => self
                .filter_rows(&term)
                .map_or(Outcome::Ignored, |visible| Outcome::Filtered { visible }),
            (Operation::Export, TriggerEvent::Click) => self.export_csv()?.map_or(Outcome::Ignored, Outcome::Exported),
            (Operation::SetEntriesPerPage, TriggerEvent::Change(raw)) => self
                .set_entries_per_page(&raw)
                .map_or(Outcome::Ignored, Outcome::EntriesPerPageChanged),
            (operation, event) => {
                debug!(?anchor, ?operation, ?event, "event does not apply to bound operation");
                Outcome::Ignored
            }
        };
        Ok(outcome)
    }

    /// Sorts by `column`, toggling the direction when it is already the
    /// active sort column.
    pub fn sort_by_column(&mut self, column: usize) {
        let Some(table) = self.table.as_mut() else {
            debug!(column, "sort requested without a table");
            return;
        };
        if column >= table.column_count() {
            warn!(column, columns = table.column_count(), "sort requested on a missing column");
            return;
        }
        self.sort.activate(column);
        sort_rows(table, column, self.sort.direction());
        update_indicators(table, &self.sort);
        debug!(column, direction = ?self.sort.direction(), "results table sorted");
    }

    /// Hides rows whose text does not contain `term`. Returns the number of
    /// visible rows, or `None` without a table.
    pub fn filter_rows(&mut self, term: &str) -> Option<usize> {
        self.filter.set_term(term);
        let table = self.table.as_mut()?;
        let visible = self.filter.apply(table);
        self.page.clamp(visible);
        Some(visible)
    }

    /// CSV text for the current table, hidden rows included.
    pub fn csv(&self) -> Option<String> {
        self.table.as_ref().map(to_csv)
    }

    /// Writes the export artifact. Returns `Ok(None)` without a table.
    pub fn export_csv(&self) -> Result<Option<PathBuf>, TableError> {
        let Some(csv) = self.csv() else {
            warn!("No results table found to export");
            return Ok(None);
        };
        write_export(&self.export_dir, &csv).map(Some)
    }

    /// Applies a raw selector value. Invalid values are logged and ignored.
    /// Row visibility is left untouched.
    pub fn set_entries_per_page(&mut self, raw: &str) -> Option<usize> {
        let Some(entries_per_page) = PageState::parse_entries_per_page(raw) else {
            warn!(value = raw, "ignoring invalid entries-per-page value");
            return None;
        };
        self.page.set_entries_per_page(entries_per_page);
        info!(entries_per_page, "entries per page changed");
        Some(entries_per_page)
    }

    /// Visible rows on the current page.
    pub fn page_rows(&self) -> Vec<&Row> {
        let Some(table) = self.table.as_ref() else {
            return Vec::new();
        };
        let visible: Vec<&Row> = table.visible_rows().collect();
        let window = self.page.window(visible.len());
        visible[window].to_vec()
    }

    pub fn visible_count(&self) -> usize {
        self.table.as_ref().map_or(0, Table::visible_count)
    }

    pub fn next_page(&mut self) {
        let total = self.visible_count();
        self.page.next_page(total);
    }

    pub fn prev_page(&mut self) {
        self.page.prev_page();
    }

    pub fn first_page(&mut self) {
        self.page.first_page();
    }

    pub fn last_page(&mut self) {
        let total = self.visible_count();
        self.page.last_page(total);
    }

    pub fn page_info(&self) -> String {
        self.page.page_info(self.visible_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored() -> Table {
        Table::from_records(
            ["Name", "Score"],
            vec![vec!["Beta".into(), "7".into()], vec!["Alpha".into(), "12".into()]],
        )
        .unwrap()
    }

    #[test]
    fn operations_without_table_are_no_ops() {
        let mut results = ResultTable::new();
        results.sort_by_column(0);
        assert_eq!(results.sort_state().column(), None);
        assert_eq!(results.filter_rows("x"), None);
        assert_eq!(results.export_csv().unwrap(), None);
        assert!(results.page_rows().is_empty());
    }

    #[test]
    fn out_of_range_column_is_ignored() {
        let mut results = ResultTable::new();
        results.replace_table(scored());
        results.sort_by_column(5);
        assert_eq!(results.sort_state().column(), None);
        assert_eq!(results.table().unwrap().column_values(0), vec!["Beta", "Alpha"]);
    }

    #[test]
    fn replacement_reapplies_sort_and_filter() {
        let mut results = ResultTable::new();
        results.replace_table(scored());
        results.sort_by_column(0);
        results.filter_rows("a");

        let mut next = Table::new(["Name", "Score"]);
        next.push_row(["Gamma", "3"]).unwrap();
        next.push_row(["Delta", "1"]).unwrap();
        next.push_row(["Epsilon", "2"]).unwrap();
        results.replace_table(next);

        let table = results.table().unwrap();
        assert_eq!(table.column_values(0), vec!["Delta", "Epsilon", "Gamma"]);
        assert!(table.rows()[1].is_hidden(), "Epsilon has no 'a'");
        assert_eq!(table.headers()[0].indicator().unwrap().glyph, '↑');
    }

    #[test]
    fn page_rows_window_visible_rows() {
        let mut table = Table::new(["n"]);
        for n in 0..30 {
            table.push_row([n.to_string()]).unwrap();
        }
        let mut results = ResultTable::new();
        results.replace_table(table);
        results.set_entries_per_page("25");
        results.next_page();
        assert_eq!(results.page_rows().len(), 5);
        results.filter_rows("1");
        // 1, 10..19, 21 => 12 rows, back on a single page
        assert_eq!(results.page_state().current_page(), 1);
        assert_eq!(results.page_rows().len(), 12);
    }
}
