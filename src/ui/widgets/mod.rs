//! UI Widgets

pub mod clock_panel;
pub mod status_line;
pub mod tab;

pub use clock_panel::ClockPanel;
pub use status_line::StatusLine;
pub use tab::Tab;

use ratatui::symbols::border;
use ratatui::widgets::{Block, Borders, Padding};

use crate::ui::layout::BOX_PADDING;

/// Rounded top, closed bottom.
pub const CLOSED_BORDER: border::Set = border::Set {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "└",
    bottom_right: "┘",
    vertical_left: "│",
    vertical_right: "│",
    horizontal_top: "─",
    horizontal_bottom: "─",
};

/// Rounded top, bottom left open toward the content below.
pub const OPEN_BORDER: border::Set = border::Set {
    top_left: "╭",
    top_right: "╮",
    bottom_left: "┘",
    bottom_right: "└",
    vertical_left: "│",
    vertical_right: "│",
    horizontal_top: "─",
    horizontal_bottom: " ",
};

/// The bordered, horizontally padded box every panel is drawn in.
fn boxed(set: border::Set) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_set(set)
        .padding(Padding::horizontal(BOX_PADDING))
}
