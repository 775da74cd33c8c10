//! # Exoscope results table
//!
//! This crate implements the interactive results table shown after a batch of
//! exoplanet candidates has been classified. A [`ResultTable`] owns a
//! [`Table`] produced elsewhere (a loaded file or a prediction response) and
//! layers the interactive behavior on top of it:
//!
//! - column sorting with numeric-aware comparison and header indicators
//! - free-text row filtering that hides rows without removing them
//! - CSV export to `exoplanet_predictions.csv`
//! - an entries-per-page selector backing a paged view of the visible rows
//!
//! Host views (the TUI, the CLI) attach these operations to their trigger
//! anchors through [`ResultTable::initialize`], which can be re-run every
//! time the table is replaced.
//!
//! ```ignore
//! use exoscope_table::{Anchor, ResultTable, Table, TriggerEvent};
//!
//! let mut table = Table::new(["Name", "Score"]);
//! table.push_row(["Beta", "7"])?;
//! table.push_row(["Alpha", "12"])?;
//!
//! let mut results = ResultTable::new();
//! results.replace_table(table);
//! results.initialize(&[Anchor::SearchInput, Anchor::ExportButton]);
//! results.sort_by_column(1);
//! results.dispatch(Anchor::SearchInput, TriggerEvent::Input("alp".into()))?;
//! ```

mod bindings;
pub mod collate;
mod error;
pub mod export;
mod filter;
pub mod load;
mod model;
mod page;
mod result_table;
mod sort;

pub use bindings::{Anchor, Bindings, Operation, Outcome, TriggerEvent};
pub use error::TableError;
pub use export::{EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
pub use filter::FilterState;
pub use model::{HeaderCell, Row, RowId, SortIndicator, Table};
pub use page::{DEFAULT_ENTRIES_PER_PAGE, PAGE_SIZE_CHOICES, PageState};
pub use result_table::ResultTable;
pub use sort::{SortDirection, SortState};
