//! Footer lines under the table: page info with the entries selector, the
//! status message and the key hints.

use exoscope_table::PAGE_SIZE_CHOICES;
use exoscope_types::Classification;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, Focus};
use crate::ui::theme::{Palette, styles};

const TABLE_HINTS: &str =
    "/ search  1-9 sort  ←/→ column  s sort  e export  +/- entries  n/p page  ↑/↓ select  t theme  q quit";
const SEARCH_HINTS: &str = "type to filter  Esc/Enter back to table";

pub(super) fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let palette = app.palette();
    let selector = entries_selector(palette, app.results.page_state().entries_per_page());
    let selector_width = u16::try_from(selector.width()).unwrap_or(u16::MAX);
    let [info_area, selector_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(selector_width)]).areas(area);

    let mut spans = vec![Span::styled(app.results.page_info(), styles::text(palette))];
    if let Some(summary) = app.summary {
        spans.push(Span::styled("  │  ", styles::muted(palette)));
        let counts = [
            (Classification::Confirmed, summary.confirmed),
            (Classification::Candidate, summary.candidate),
            (Classification::FalsePositive, summary.false_positive),
        ];
        for (class, count) in counts {
            spans.push(Span::styled(format!("{} {count}", class.label()), styles::disposition(palette, class)));
            spans.push(Span::styled(" · ", styles::muted(palette)));
        }
        spans.push(Span::styled(format!("Total {}", summary.total), styles::text(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), info_area);
    frame.render_widget(Paragraph::new(selector), selector_area);
}

/// `Show: 10 25 50 100` with the active size highlighted.
fn entries_selector(palette: &Palette, current: usize) -> Line<'static> {
    let mut spans = vec![Span::styled("Show:", styles::muted(palette))];
    for choice in PAGE_SIZE_CHOICES {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(choice.to_string(), styles::page_choice(palette, choice == current)));
    }
    Line::from(spans)
}

pub(super) fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let Some(status) = app.status.as_ref() else {
        return;
    };
    let style = styles::status(app.palette(), status.severity);
    frame.render_widget(Paragraph::new(status.message.as_str()).style(style), area);
}

pub(super) fn render_hints(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.focus {
        Focus::Table => TABLE_HINTS,
        Focus::Search => SEARCH_HINTS,
    };
    frame.render_widget(Paragraph::new(hints).style(styles::muted(app.palette())), area);
}
