//! Viewer themes.
//!
//! Two truecolor palettes and an indexed fallback. The theme comes from
//! `TUI_THEME`, then the saved preference, then the terminal's color support;
//! `t` in the viewer cycles through them and saves the choice.

use std::env;

use tracing::debug;

pub mod palette;
pub mod styles;

pub use palette::Palette;

pub const THEME_ENV: &str = "TUI_THEME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Observatory,
    Aurora,
    Terminal,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [ThemeName::Observatory, ThemeName::Aurora, ThemeName::Terminal];

    /// Identifier stored in preferences.
    pub fn id(self) -> &'static str {
        match self {
            ThemeName::Observatory => "observatory",
            ThemeName::Aurora => "aurora",
            ThemeName::Terminal => "terminal",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeName::Observatory => "Observatory",
            ThemeName::Aurora => "Aurora",
            ThemeName::Terminal => "Terminal (256 colors)",
        }
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            ThemeName::Observatory => &palette::OBSERVATORY,
            ThemeName::Aurora => &palette::AURORA,
            ThemeName::Terminal => &palette::TERMINAL,
        }
    }

    /// Accepts an identifier in any case; `ansi` and `256` name the
    /// indexed palette.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if ["ansi", "256"].iter().any(|alias| alias.eq_ignore_ascii_case(name)) {
            return Some(ThemeName::Terminal);
        }
        Self::ALL.into_iter().find(|theme| theme.id().eq_ignore_ascii_case(name))
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|theme| *theme == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Picks the startup theme. Terminals without truecolor always get the
/// indexed palette.
pub fn load(preferred: Option<&str>) -> ThemeName {
    if !supports_truecolor(&env::var("COLORTERM").unwrap_or_default(), &env::var("TERM").unwrap_or_default()) {
        debug!("truecolor not advertised; using the indexed palette");
        return ThemeName::Terminal;
    }
    env::var(THEME_ENV)
        .ok()
        .and_then(|name| ThemeName::parse(&name))
        .or_else(|| preferred.and_then(ThemeName::parse))
        .unwrap_or(ThemeName::Observatory)
}

fn supports_truecolor(color_term: &str, term: &str) -> bool {
    let color_term = color_term.to_ascii_lowercase();
    let term = term.to_ascii_lowercase();
    color_term.contains("truecolor")
        || color_term.contains("24bit")
        || term.contains("truecolor")
        || term.contains("direct")
}
