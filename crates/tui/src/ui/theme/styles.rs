//! Style builders for the results view widgets.

use exoscope_table::SortIndicator;
use exoscope_types::Classification;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::Palette;
use crate::app::Severity;

/// Bordered panel; the border lights up while the panel has focus.
pub fn block<'a>(palette: &Palette, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let border = if focused { palette.border_focused } else { palette.border };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Thick } else { BorderType::Rounded })
        .border_style(Style::default().fg(border))
        .style(panel(palette));
    if let Some(title) = title {
        block = block.title(Span::styled(title, header_label(palette)));
    }
    block
}

pub fn background(palette: &Palette) -> Style {
    Style::default().bg(palette.sky).fg(palette.text)
}

pub fn panel(palette: &Palette) -> Style {
    Style::default().bg(palette.panel).fg(palette.text)
}

pub fn text(palette: &Palette) -> Style {
    Style::default().fg(palette.text)
}

pub fn muted(palette: &Palette) -> Style {
    Style::default().fg(palette.text_dim)
}

pub fn header_row(palette: &Palette) -> Style {
    Style::default().bg(palette.header).fg(palette.heading)
}

pub fn header_label(palette: &Palette) -> Style {
    Style::default().fg(palette.heading).add_modifier(Modifier::BOLD)
}

/// Columns that are not the active sort key show a dimmed glyph.
pub fn sort_indicator(palette: &Palette, indicator: SortIndicator) -> Style {
    if indicator.is_dimmed() {
        muted(palette)
    } else {
        Style::default().fg(palette.highlight).add_modifier(Modifier::BOLD)
    }
}

/// Zebra striping counted from the top of the page.
pub fn row(palette: &Palette, index_on_page: usize) -> Style {
    let background = if index_on_page % 2 == 0 { palette.panel } else { palette.stripe };
    Style::default().bg(background).fg(palette.text)
}

pub fn selected_row(palette: &Palette) -> Style {
    Style::default()
        .bg(palette.selection)
        .fg(palette.text)
        .add_modifier(Modifier::BOLD)
}

/// Prediction cell colored by disposition.
pub fn disposition(palette: &Palette, classification: Classification) -> Style {
    Style::default()
        .fg(palette.disposition(classification))
        .add_modifier(Modifier::BOLD)
}

pub fn input(palette: &Palette, focused: bool) -> Style {
    let style = panel(palette);
    if focused { style.add_modifier(Modifier::BOLD) } else { style }
}

pub fn status(palette: &Palette, severity: Severity) -> Style {
    let color = match severity {
        Severity::Info => palette.notice,
        Severity::Success => palette.confirmed,
        Severity::Error => palette.false_positive,
    };
    Style::default().fg(color)
}

/// One entry of the page size selector.
pub fn page_choice(palette: &Palette, active: bool) -> Style {
    if active {
        Style::default()
            .fg(palette.highlight)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        muted(palette)
    }
}
