//! The results view: search box, sortable table, footer and status line.
//!
//! # Keys
//!
//! - `/` focuses the search box; typing filters on every keystroke; `Esc` or
//!   `Enter` returns to the table
//! - `1`-`9` sort by that column; `←`/`→` pick a column and `s` sorts it
//! - `e` exports `exoplanet_predictions.csv`
//! - `+`/`-` cycle the entries-per-page selector
//! - `t` switches to the next color theme and remembers it
//! - `n`/`p`/`Home`/`End` page through visible rows; `↑`/`↓` move the selection
//! - `q` quits

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use exoscope_table::{Anchor, Outcome, TriggerEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    widgets::{Block, Paragraph, TableState},
};
use tracing::{debug, error, info};

use super::{footer, table_view};
use crate::app::{App, Effect, Focus, Msg, Severity};
use crate::ui::components::component::Component;
use crate::ui::theme::styles;

#[derive(Debug, Default)]
pub struct ResultsComponent {
    table_state: TableState,
}

impl Component for ResultsComponent {
    fn handle_message(&mut self, app: &mut App, msg: Msg) -> Vec<Effect> {
        let loads_table = matches!(msg, Msg::PredictionCompleted(_));
        let effects = app.update(msg);
        if loads_table {
            self.table_state = TableState::default();
        }
        effects
    }

    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        match app.focus {
            Focus::Search => {
                handle_search_key(app, key);
                Vec::new()
            }
            Focus::Table => handle_table_key(app, key),
        }
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let [search_area, table_area, footer_area, status_area, hints_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(rect);

        frame.render_widget(Block::default().style(styles::background(app.palette())), rect);
        render_search(frame, search_area, app);
        table_view::render(frame, table_area, app, &mut self.table_state);
        footer::render_footer(frame, footer_area, app);
        footer::render_status(frame, status_area, app);
        footer::render_hints(frame, hints_area, app);
    }
}

fn render_search(frame: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let focused = app.focus == Focus::Search;
    let block = styles::block(palette, Some("Search"), focused);
    let paragraph = if app.search.input().is_empty() && !focused {
        Paragraph::new("Press / to filter rows").style(styles::muted(palette))
    } else {
        Paragraph::new(app.search.input()).style(styles::input(palette, focused))
    };
    frame.render_widget(paragraph.block(block), area);

    if focused {
        let column = u16::try_from(app.search.cursor_column()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(column).min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y + 1));
    }
}

fn handle_search_key(app: &mut App, key: KeyEvent) {
    let changed = match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
            app.focus = Focus::Table;
            false
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.insert_char(c);
            true
        }
        KeyCode::Backspace => app.search.backspace(),
        KeyCode::Delete => app.search.delete(),
        KeyCode::Left => {
            app.search.move_left();
            false
        }
        KeyCode::Right => {
            app.search.move_right();
            false
        }
        KeyCode::Home => {
            app.search.move_home();
            false
        }
        KeyCode::End => {
            app.search.move_end();
            false
        }
        _ => false,
    };
    if changed {
        apply_search(app);
    }
}

/// Sends the search box's full value through the search anchor.
fn apply_search(app: &mut App) {
    let term = app.search.input().to_string();
    match app.results.dispatch(Anchor::SearchInput, TriggerEvent::Input(term)) {
        Ok(Outcome::Filtered { visible }) => {
            app.selected = 0;
            debug!(visible, "search applied");
        }
        Ok(_) => {}
        Err(error) => report_error(app, "Search failed", &error),
    }
}

fn handle_table_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let column_count = app.results.table().map_or(0, |table| table.column_count());
    match key.code {
        KeyCode::Char('q') => return vec![Effect::Quit],
        KeyCode::Char('/') => app.focus = Focus::Search,
        KeyCode::Char(digit @ '1'..='9') => {
            let column = digit as usize - '1' as usize;
            if column < column_count {
                app.sort_cursor = column;
                app.results.sort_by_column(column);
            }
        }
        KeyCode::Left => app.sort_cursor = app.sort_cursor.saturating_sub(1),
        KeyCode::Right => app.sort_cursor = (app.sort_cursor + 1).min(column_count.saturating_sub(1)),
        KeyCode::Char('s') | KeyCode::Enter => app.results.sort_by_column(app.sort_cursor),
        KeyCode::Char('e') => export(app),
        KeyCode::Char('t') => return vec![app.cycle_theme()],
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let next = app.results.page_state().next_choice();
            return change_entries_per_page(app, next);
        }
        KeyCode::Char('-') => {
            let previous = app.results.page_state().prev_choice();
            return change_entries_per_page(app, previous);
        }
        KeyCode::Char('n') | KeyCode::PageDown => {
            app.results.next_page();
            app.selected = 0;
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            app.results.prev_page();
            app.selected = 0;
        }
        KeyCode::Home => {
            app.results.first_page();
            app.selected = 0;
        }
        KeyCode::End => {
            app.results.last_page();
            app.selected = 0;
        }
        KeyCode::Up => app.selected = app.selected.saturating_sub(1),
        KeyCode::Down => {
            let rows_on_page = app.results.page_rows().len();
            app.selected = (app.selected + 1).min(rows_on_page.saturating_sub(1));
        }
        _ => {}
    }
    Vec::new()
}

fn export(app: &mut App) {
    match app.results.dispatch(Anchor::ExportButton, TriggerEvent::Click) {
        Ok(Outcome::Exported(path)) => {
            info!(path = %path.display(), "export written from the viewer");
            app.set_status(Severity::Success, format!("Exported {}", path.display()));
        }
        Ok(_) => app.set_status(Severity::Info, "No results table found to export"),
        Err(error) => report_error(app, "Export failed", &error),
    }
}

fn change_entries_per_page(app: &mut App, entries_per_page: usize) -> Vec<Effect> {
    let raw = entries_per_page.to_string();
    match app.results.dispatch(Anchor::EntriesPerPage, TriggerEvent::Change(raw)) {
        Ok(Outcome::EntriesPerPageChanged(applied)) => {
            app.selected = 0;
            vec![Effect::PersistEntriesPerPage(applied)]
        }
        Ok(_) => Vec::new(),
        Err(error) => {
            report_error(app, "Page size change failed", &error);
            Vec::new()
        }
    }
}

fn report_error(app: &mut App, context: &str, error: &dyn std::error::Error) {
    error!(%error, "{context}");
    app.set_status(Severity::Error, format!("{context}: {error}"));
}
