//! Theme system: highlight palettes for light and dark terminals

use ratatui::style::{Color, Modifier, Style};

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub styles: ThemeStyles,
}

/// Palette a theme's styles are derived from
#[derive(Debug, Clone)]
pub struct ThemeColors {
    pub highlight: Color,
    pub highlight_active: Color,
    pub fg_primary: Color,
    pub fg_muted: Color,
}

#[derive(Debug, Clone)]
pub struct ThemeStyles {
    pub clock_border: Style,
    pub clock_text: Style,
    pub tab_border: Style,
    pub tab_border_active: Style,
    pub tab_label: Style,
    pub tab_label_active: Style,
    pub status: Style,
}

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(), // Default
        }
    }

    /// Violet highlights for dark backgrounds (default)
    pub fn dark() -> Self {
        let colors = ThemeColors {
            highlight: Color::Rgb(125, 86, 244),
            highlight_active: Color::Rgb(157, 118, 244),
            fg_primary: Color::Rgb(230, 230, 240),
            fg_muted: Color::Rgb(128, 128, 150),
        };

        Self::from_colors("Dark", colors)
    }

    /// Violet highlights for light backgrounds
    pub fn light() -> Self {
        let colors = ThemeColors {
            highlight: Color::Rgb(135, 75, 253),
            highlight_active: Color::Rgb(167, 107, 253),
            fg_primary: Color::Rgb(30, 30, 40),
            fg_muted: Color::Rgb(110, 110, 125),
        };

        Self::from_colors("Light", colors)
    }

    fn from_colors(name: &str, colors: ThemeColors) -> Self {
        let styles = ThemeStyles {
            clock_border: Style::default().fg(colors.highlight_active),
            clock_text: Style::default()
                .fg(colors.fg_primary)
                .add_modifier(Modifier::BOLD),
            tab_border: Style::default().fg(colors.highlight),
            tab_border_active: Style::default().fg(colors.highlight_active),
            tab_label: Style::default().fg(colors.fg_primary),
            tab_label_active: Style::default()
                .fg(colors.highlight_active)
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(colors.fg_muted),
        };

        Self {
            name: name.to_string(),
            styles,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
