//! Layout of the dashboard: a clock box beside a column of equal-width tabs,
//! a status line underneath, all inside a fixed outer margin.
//!
//! Positions depend only on the text being shown, never on the terminal
//! size, so the same state always lands on the same cells.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Blank columns/rows around the whole dashboard.
pub const MARGIN_HORIZONTAL: u16 = 2;
pub const MARGIN_VERTICAL: u16 = 1;
/// Blank columns inside a box on each side of its text.
pub const BOX_PADDING: u16 = 1;
/// Boxes are never shorter than this many text rows.
pub const MIN_CONTENT_HEIGHT: u16 = 2;
/// Blank rows between the boxes and the status line.
pub const STATUS_GAP: u16 = 1;

const BORDER: u16 = 1;

/// Terminal columns needed by the widest line of `text`.
pub fn display_width(text: &str) -> u16 {
    text.lines()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16
}

fn line_count(text: &str) -> u16 {
    text.lines().count().min(u16::MAX as usize) as u16
}

/// Outer size of a bordered, padded box around `text` whose inner text area
/// is `text_width` columns wide.
fn box_size(text: &str, text_width: u16) -> (u16, u16) {
    let width = text_width
        .saturating_add(2 * BOX_PADDING)
        .saturating_add(2 * BORDER);
    let height = line_count(text)
        .max(MIN_CONTENT_HEIGHT)
        .saturating_add(2 * BORDER);
    (width, height)
}

/// Computed rects for every piece of the dashboard
///
/// The overall size is kept as plain numbers: it can exceed what a single
/// `Rect` holds, since ratatui caps a rect at `u16::MAX` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedLayout {
    /// Columns including the outer margin.
    pub width: u16,
    /// Rows including the outer margin.
    pub height: u16,
    pub clock: Rect,
    /// One rect per tab that fits, in display order. Tabs that would run
    /// past the last addressable row are left out.
    pub tabs: Vec<Rect>,
    pub status: Rect,
}

pub struct LayoutManager;

impl LayoutManager {
    pub fn compute(clock_text: &str, tabs: &[String], status_text: &str) -> ComputedLayout {
        let origin_x = MARGIN_HORIZONTAL;
        let origin_y = MARGIN_VERTICAL;
        // Rows below the boxes: gap, status line, bottom margin.
        let last_box_row = u16::MAX - (STATUS_GAP + 1 + MARGIN_VERTICAL);

        let (clock_width, clock_height) = box_size(clock_text, display_width(clock_text));
        let clock_height = clock_height.min(last_box_row - origin_y);
        let clock = Rect::new(origin_x, origin_y, clock_width, clock_height);

        // Every tab shares the width of the widest label.
        let label_width = tabs.iter().map(|t| display_width(t)).max().unwrap_or(0);
        let tab_x = clock.right();
        let mut tab_y = origin_y;
        let mut tab_rects = Vec::with_capacity(tabs.len());
        for label in tabs {
            let (width, height) = box_size(label, label_width);
            let next_y = match tab_y.checked_add(height) {
                Some(y) if y <= last_box_row => y,
                _ => break,
            };
            tab_rects.push(Rect::new(tab_x, tab_y, width, height));
            tab_y = next_y;
        }
        let column_width = tab_rects.first().map(|r| r.width).unwrap_or(0);
        let column_height = tab_y - origin_y;

        let block_height = clock_height.max(column_height);
        let status = Rect::new(
            origin_x,
            origin_y + block_height + STATUS_GAP,
            display_width(status_text),
            1,
        );

        let content_width = clock_width
            .saturating_add(column_width)
            .max(status.width);

        ComputedLayout {
            width: content_width.saturating_add(2 * MARGIN_HORIZONTAL),
            height: status.bottom() + MARGIN_VERTICAL,
            clock,
            tabs: tab_rects,
            status,
        }
    }
}
