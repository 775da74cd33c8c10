//! Color palettes for the results viewer.

use exoscope_types::Classification;
use ratatui::style::Color;

/// Colors the viewer paints with. Each disposition has its own color so a
/// prediction column reads at a glance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Fill behind every panel.
    pub sky: Color,
    pub panel: Color,
    /// Background of odd table rows.
    pub stripe: Color,
    pub header: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_dim: Color,
    pub heading: Color,
    /// Active sort glyph and the selected page size.
    pub highlight: Color,
    pub selection: Color,
    pub confirmed: Color,
    pub candidate: Color,
    pub false_positive: Color,
    pub notice: Color,
}

impl Palette {
    pub fn disposition(&self, classification: Classification) -> Color {
        match classification {
            Classification::Confirmed => self.confirmed,
            Classification::Candidate => self.candidate,
            Classification::FalsePositive => self.false_positive,
        }
    }
}

/// Deep navy night sky with starlight text.
pub const OBSERVATORY: Palette = Palette {
    sky: Color::Rgb(0x0b, 0x10, 0x26),
    panel: Color::Rgb(0x11, 0x18, 0x33),
    stripe: Color::Rgb(0x16, 0x1f, 0x40),
    header: Color::Rgb(0x1c, 0x27, 0x4f),
    border: Color::Rgb(0x33, 0x41, 0x6e),
    border_focused: Color::Rgb(0x7a, 0xa2, 0xf7),
    text: Color::Rgb(0xe4, 0xe8, 0xf7),
    text_dim: Color::Rgb(0x7d, 0x86, 0xa8),
    heading: Color::Rgb(0xb8, 0xc4, 0xf0),
    highlight: Color::Rgb(0xff, 0xd2, 0x7f),
    selection: Color::Rgb(0x2e, 0x3c, 0x72),
    confirmed: Color::Rgb(0x6e, 0xe7, 0xa8),
    candidate: Color::Rgb(0xf5, 0xc2, 0x6b),
    false_positive: Color::Rgb(0xf0, 0x71, 0x78),
    notice: Color::Rgb(0x7d, 0xd3, 0xfc),
};

/// Dark teal with green and violet aurora accents.
pub const AURORA: Palette = Palette {
    sky: Color::Rgb(0x0a, 0x17, 0x1a),
    panel: Color::Rgb(0x10, 0x21, 0x25),
    stripe: Color::Rgb(0x15, 0x2a, 0x2f),
    header: Color::Rgb(0x1a, 0x35, 0x3a),
    border: Color::Rgb(0x2c, 0x52, 0x58),
    border_focused: Color::Rgb(0x5e, 0xf2, 0xc4),
    text: Color::Rgb(0xdc, 0xf2, 0xee),
    text_dim: Color::Rgb(0x6f, 0x93, 0x90),
    heading: Color::Rgb(0xa8, 0xe6, 0xd8),
    highlight: Color::Rgb(0xc7, 0x92, 0xea),
    selection: Color::Rgb(0x24, 0x4a, 0x4f),
    confirmed: Color::Rgb(0x5e, 0xf2, 0x8c),
    candidate: Color::Rgb(0xe8, 0xd4, 0x6b),
    false_positive: Color::Rgb(0xff, 0x7a, 0x93),
    notice: Color::Rgb(0x8a, 0xb4, 0xf8),
};

/// Indexed colors for terminals without truecolor.
pub const TERMINAL: Palette = Palette {
    sky: Color::Indexed(233),
    panel: Color::Indexed(234),
    stripe: Color::Indexed(235),
    header: Color::Indexed(236),
    border: Color::Indexed(240),
    border_focused: Color::Indexed(75),
    text: Color::Indexed(253),
    text_dim: Color::Indexed(245),
    heading: Color::Indexed(147),
    highlight: Color::Indexed(221),
    selection: Color::Indexed(238),
    confirmed: Color::Indexed(114),
    candidate: Color::Indexed(179),
    false_positive: Color::Indexed(203),
    notice: Color::Indexed(117),
};
