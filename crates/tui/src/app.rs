//! Application state for the results viewer.
//!
//! [`App`] owns the [`ResultTable`] and everything the view needs around it:
//! the search input, which area has focus, the selected row and sort column,
//! the batch summary and the status line. Components mutate it in response to
//! keys; work that leaves the process is described by [`Effect`]s.

use std::path::PathBuf;

use exoscope_api::ClassifiedTable;
use exoscope_table::{Anchor, PageState, ResultTable, Table};
use exoscope_types::PredictionSummary;
use exoscope_util::UserPreferences;
use tracing::{debug, info};

use crate::ui::components::common::TextInputState;
use crate::ui::theme::{self, Palette, ThemeName};

/// Messages delivered to the app by the runtime.
#[derive(Debug)]
pub enum Msg {
    Tick,
    Resize(u16, u16),
    /// A spawned classification finished; the error is the user-facing message.
    PredictionCompleted(Box<Result<ClassifiedTable, String>>),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Classify `table` with `model` in the background.
    Classify { model: String, table: Table },
    /// Save the page size so the next session starts with it.
    PersistEntriesPerPage(usize),
    PersistTheme(ThemeName),
    Quit,
}

/// Which area receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub severity: Severity,
}

/// A classification the viewer should start as soon as it opens.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    pub model: String,
    pub table: Table,
}

/// What the viewer opens on.
#[derive(Debug, Default)]
pub struct Startup {
    pub title: String,
    pub table: Option<Table>,
    pub summary: Option<PredictionSummary>,
    pub classify: Option<ClassifyRequest>,
    /// Overrides the export directory from preferences.
    pub export_dir: Option<PathBuf>,
}

#[derive(Debug)]
pub struct App {
    pub results: ResultTable,
    pub search: TextInputState,
    pub focus: Focus,
    /// Column the `s` key sorts by.
    pub sort_cursor: usize,
    /// Selected row within the current page.
    pub selected: usize,
    pub summary: Option<PredictionSummary>,
    pub status: Option<StatusLine>,
    pub title: String,
    pub theme: ThemeName,
    /// Model name while a classification is running.
    pub classifying: Option<String>,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(startup: Startup, preferences: &UserPreferences) -> Self {
        let page = preferences.entries_per_page().map(PageState::new).unwrap_or_default();
        let export_dir = startup
            .export_dir
            .or_else(|| preferences.export_dir())
            .unwrap_or_else(|| PathBuf::from("."));
        let theme = theme::load(preferences.preferred_theme().as_deref());
        debug!(theme = theme.id(), "theme selected");

        let mut app = Self {
            results: ResultTable::new().with_export_dir(export_dir).with_page_state(page),
            search: TextInputState::new(),
            focus: Focus::Table,
            sort_cursor: 0,
            selected: 0,
            summary: None,
            status: None,
            title: startup.title,
            theme,
            classifying: None,
            throbber_idx: 0,
            should_quit: false,
        };
        if let Some(table) = startup.table {
            app.load_table(table, startup.summary);
        } else {
            app.results.initialize(&Anchor::ALL);
        }
        app
    }

    /// Hands a new table to the results widget and re-binds the view's
    /// anchors, the way a freshly rendered fragment is wired up.
    pub fn load_table(&mut self, table: Table, summary: Option<PredictionSummary>) {
        self.results.replace_table(table);
        self.results.initialize(&Anchor::ALL);
        self.summary = summary;
        self.selected = 0;
        let columns = self.results.table().map_or(0, Table::column_count);
        self.sort_cursor = self.sort_cursor.min(columns.saturating_sub(1));
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                if self.classifying.is_some() {
                    self.throbber_idx = (self.throbber_idx + 1) % THROBBER.len();
                }
            }
            Msg::Resize(width, height) => debug!(width, height, "terminal resized"),
            Msg::PredictionCompleted(outcome) => {
                let model = self.classifying.take().unwrap_or_default();
                match *outcome {
                    Ok(ClassifiedTable { table, summary }) => {
                        info!(model = %model, rows = summary.total, "classification loaded into the viewer");
                        self.load_table(table, Some(summary));
                        self.set_status(Severity::Success, format!("Classified {} rows with {model}", summary.total));
                    }
                    Err(message) => self.set_status(Severity::Error, message),
                }
            }
        }
        Vec::new()
    }

    /// Marks a classification as running and returns the effect that starts it.
    pub fn start_classification(&mut self, request: ClassifyRequest) -> Effect {
        self.set_status(Severity::Info, format!("Classifying {} rows with {}", request.table.len(), request.model));
        self.classifying = Some(request.model.clone());
        Effect::Classify {
            model: request.model,
            table: request.table,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        self.theme.palette()
    }

    /// Switches to the next theme and returns the effect that saves it.
    pub fn cycle_theme(&mut self) -> Effect {
        self.theme = self.theme.next();
        self.set_status(Severity::Info, format!("Theme: {}", self.theme.label()));
        Effect::PersistTheme(self.theme)
    }

    pub fn set_status(&mut self, severity: Severity, message: impl Into<String>) {
        self.status = Some(StatusLine {
            message: message.into(),
            severity,
        });
    }

    pub fn throbber(&self) -> char {
        THROBBER[self.throbber_idx % THROBBER.len()]
    }
}

const THROBBER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

#[cfg(test)]
mod tests {
    use super::*;
    use exoscope_types::Classification;

    fn app_with(table: Table) -> App {
        let startup = Startup {
            title: "test".into(),
            table: Some(table),
            ..Startup::default()
        };
        App::new(startup, &UserPreferences::ephemeral())
    }

    #[test]
    fn new_app_binds_every_anchor() {
        let app = app_with(Table::new(["kepoi_name"]));
        for anchor in Anchor::ALL {
            assert!(app.results.bindings().is_bound(anchor));
        }
        assert_eq!(app.results.page_state().entries_per_page(), 10);
    }

    #[test]
    fn completed_prediction_replaces_the_table() {
        let mut app = app_with(Table::new(["kepoi_name"]));
        let mut request_table = Table::new(["kepoi_name"]);
        request_table.push_row(["K00001.01"]).unwrap();
        let effect = app.start_classification(ClassifyRequest {
            model: "rf".into(),
            table: request_table.clone(),
        });
        assert!(matches!(effect, Effect::Classify { ref model, .. } if model == "rf"));

        let mut classified = request_table;
        classified
            .append_column(exoscope_table::HeaderCell::sortable("prediction"), vec!["Confirmed".into()])
            .unwrap();
        let summary: PredictionSummary = [Classification::Confirmed].into_iter().collect();
        app.update(Msg::PredictionCompleted(Box::new(Ok(ClassifiedTable {
            table: classified,
            summary,
        }))));

        assert!(app.classifying.is_none());
        assert_eq!(app.summary, Some(summary));
        assert_eq!(app.results.table().unwrap().column_count(), 2);
        assert_eq!(app.status.as_ref().unwrap().severity, Severity::Success);
    }

    #[test]
    fn cycling_the_theme_requests_persistence() {
        let mut app = app_with(Table::new(["kepoi_name"]));
        let before = app.theme;
        let effect = app.cycle_theme();
        assert_eq!(app.theme, before.next());
        assert_eq!(effect, Effect::PersistTheme(app.theme));
        assert!(app.status.as_ref().unwrap().message.starts_with("Theme: "));
    }

    #[test]
    fn failed_prediction_reports_in_status_line() {
        let mut app = app_with(Table::new(["kepoi_name"]));
        app.classifying = Some("rf".into());
        app.update(Msg::PredictionCompleted(Box::new(Err("File is too large. Please upload a smaller file.".into()))));
        let status = app.status.unwrap();
        assert_eq!(status.severity, Severity::Error);
        assert_eq!(status.message, "File is too large. Please upload a smaller file.");
    }
}
