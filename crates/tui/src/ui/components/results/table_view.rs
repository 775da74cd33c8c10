//! Renders the current page of the results table.

use exoscope_api::PREDICTION_COLUMN;
use exoscope_table::{HeaderCell, Row as ResultRow};
use exoscope_types::Classification;
use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::theme::{Palette, styles};

const MIN_COLUMN_WIDTH: usize = 4;
const MAX_COLUMN_WIDTH: usize = 40;

pub(super) fn render(frame: &mut Frame, area: Rect, app: &App, table_state: &mut TableState) {
    let palette = app.palette();
    let title = table_title(app);
    let block = styles::block(palette, Some(title.as_str()), false);

    let Some(table) = app.results.table() else {
        let placeholder = Paragraph::new("No results to display")
            .style(styles::muted(palette))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    };

    let page_rows = app.results.page_rows();
    if page_rows.is_empty() {
        let message = if table.is_empty() { "No results to display" } else { "No matching rows" };
        let placeholder = Paragraph::new(message).style(styles::muted(palette)).block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let prediction_column = table.column_index(PREDICTION_COLUMN);
    let header = Row::new(
        table
            .headers()
            .iter()
            .enumerate()
            .map(|(index, header)| header_cell(palette, header, index == app.sort_cursor)),
    )
    .style(styles::header_row(palette));

    let rows = page_rows
        .iter()
        .enumerate()
        .map(|(index, row)| body_row(palette, row, prediction_column).style(styles::row(palette, index)));

    let widths = column_widths(table.headers(), &page_rows);
    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .row_highlight_style(styles::selected_row(palette))
        .block(block)
        .style(styles::panel(palette));

    table_state.select(Some(app.selected.min(page_rows.len() - 1)));
    frame.render_stateful_widget(widget, area, table_state);
}

fn table_title(app: &App) -> String {
    match app.classifying.as_deref() {
        Some(model) => format!("{} {} classifying with {model}", app.title, app.throbber()),
        None => app.title.clone(),
    }
}

/// Label plus its sort glyph; the column under the sort cursor is underlined.
fn header_cell<'a>(palette: &Palette, header: &'a HeaderCell, under_cursor: bool) -> Cell<'a> {
    let mut label_style = styles::header_label(palette);
    if under_cursor {
        label_style = label_style.add_modifier(Modifier::UNDERLINED);
    }
    let mut spans = vec![Span::styled(header.label(), label_style)];
    if let Some(indicator) = header.indicator() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(indicator.glyph.to_string(), styles::sort_indicator(palette, indicator)));
    }
    Cell::from(Line::from(spans))
}

fn body_row<'a>(palette: &Palette, row: &'a ResultRow, prediction_column: Option<usize>) -> Row<'a> {
    Row::new(row.cells().iter().enumerate().map(|(index, value)| {
        let style = if Some(index) == prediction_column {
            styles::disposition(palette, Classification::from_label(value))
        } else {
            Style::default()
        };
        Cell::from(value.as_str()).style(style)
    }))
}

/// Sizes each column to its widest header or on-page cell. The last column
/// takes whatever width is left.
fn column_widths(headers: &[HeaderCell], rows: &[&ResultRow]) -> Vec<Constraint> {
    let count = headers.len();
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let widest_cell = rows
                .iter()
                .filter_map(|row| row.cell(index))
                .map(UnicodeWidthStr::width)
                .max()
                .unwrap_or(0);
            let width = widest_cell.max(header.text_content().width()).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH) as u16;
            if index + 1 == count {
                Constraint::Min(width)
            } else {
                Constraint::Length(width)
            }
        })
        .collect()
}
