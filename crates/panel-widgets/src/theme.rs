//! Colour palettes for the filter panel.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Text of the selected tab and focused borders.
    pub header_fg: Color,
    pub header_bg: Color,
    pub row_highlight_bg: Color,
    pub row_highlight_fg: Color,
    pub prompt_fg: Color,
    /// Placeholders, hints and unfocused borders.
    pub empty_fg: Color,
    /// Characters of a suggestion matched by the query.
    pub highlight_fg: Color,
    pub include_fg: Color,
    pub exclude_fg: Color,
    pub warning_fg: Color,
}

pub const SLATE: Theme = Theme {
    header_fg: Color::Rgb(226, 232, 240),
    header_bg: Color::Rgb(30, 58, 95),
    row_highlight_bg: Color::Rgb(30, 41, 59),
    row_highlight_fg: Color::Rgb(125, 211, 252),
    prompt_fg: Color::White,
    empty_fg: Color::DarkGray,
    highlight_fg: Color::Rgb(250, 204, 21),
    include_fg: Color::Rgb(74, 222, 128),
    exclude_fg: Color::Rgb(248, 113, 113),
    warning_fg: Color::Rgb(251, 146, 60),
};

pub const SOLARIZED: Theme = Theme {
    header_fg: Color::Rgb(238, 232, 213),
    header_bg: Color::Rgb(7, 54, 66),
    row_highlight_bg: Color::Rgb(0, 43, 54),
    row_highlight_fg: Color::Rgb(42, 161, 152),
    prompt_fg: Color::Rgb(147, 161, 161),
    empty_fg: Color::Rgb(88, 110, 117),
    highlight_fg: Color::Rgb(181, 137, 0),
    include_fg: Color::Rgb(133, 153, 0),
    exclude_fg: Color::Rgb(220, 50, 47),
    warning_fg: Color::Rgb(203, 75, 22),
};

pub const LIGHT: Theme = Theme {
    header_fg: Color::Rgb(248, 250, 252),
    header_bg: Color::Rgb(37, 99, 235),
    row_highlight_bg: Color::Rgb(219, 234, 254),
    row_highlight_fg: Color::Rgb(30, 64, 175),
    prompt_fg: Color::Black,
    empty_fg: Color::Rgb(107, 114, 128),
    highlight_fg: Color::Rgb(161, 98, 7),
    include_fg: Color::Rgb(21, 128, 61),
    exclude_fg: Color::Rgb(185, 28, 28),
    warning_fg: Color::Rgb(194, 65, 12),
};

const PALETTES: &[(&str, Theme)] = &[("slate", SLATE), ("solarized", SOLARIZED), ("light", LIGHT)];

/// Theme names accepted by [`by_name`].
pub const NAMES: &[&str] = &["slate", "solarized", "light"];

/// Case-insensitive lookup.
pub fn by_name(name: &str) -> Option<Theme> {
    let name = name.trim().to_ascii_lowercase();
    PALETTES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|&(_, theme)| theme)
}

impl Default for Theme {
    fn default() -> Self {
        SLATE
    }
}

impl Theme {
    #[must_use]
    pub fn row_highlight_style(&self) -> Style {
        Style::new()
            .bg(self.row_highlight_bg)
            .fg(self.row_highlight_fg)
    }

    #[must_use]
    pub fn prompt_style(&self) -> Style {
        Style::new().fg(self.prompt_fg)
    }

    #[must_use]
    pub fn empty_style(&self) -> Style {
        Style::new().fg(self.empty_fg)
    }

    #[must_use]
    pub fn match_style(&self) -> Style {
        Style::new()
            .fg(self.highlight_fg)
            .add_modifier(Modifier::BOLD)
    }

    /// Green for include, red for exclude.
    #[must_use]
    pub fn decision_style(&self, include: bool) -> Style {
        let fg = if include {
            self.include_fg
        } else {
            self.exclude_fg
        };
        Style::new().fg(fg)
    }

    #[must_use]
    pub fn warning_style(&self) -> Style {
        Style::new()
            .fg(self.warning_fg)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(by_name("Solarized"), Some(SOLARIZED));
        assert_eq!(by_name(" LIGHT "), Some(LIGHT));
        assert_eq!(by_name("nope"), None);
    }

    #[test]
    fn every_name_resolves() {
        for name in NAMES {
            assert!(by_name(name).is_some(), "{name}");
        }
        assert_eq!(NAMES.len(), PALETTES.len());
    }

    #[test]
    fn decision_colours_differ() {
        for (_, theme) in PALETTES {
            assert_ne!(theme.decision_style(true), theme.decision_style(false));
        }
    }
}
