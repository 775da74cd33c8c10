//! # Exoscope TUI
//!
//! Terminal viewer for classified exoplanet candidates. It wraps the
//! interactive [`exoscope_table::ResultTable`] in a Ratatui interface with a
//! search box, sortable headers, paging, CSV export and an entries-per-page
//! selector, and can run a classification in the background while it is open.

mod app;
mod cmd;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use exoscope_util::UserPreferences;

pub use app::{ClassifyRequest, Startup};

/// Runs the viewer until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be put into raw mode or drawn to.
pub async fn run(startup: Startup, preferences: Arc<UserPreferences>) -> Result<()> {
    ui::runtime::run_app(startup, preferences).await
}
