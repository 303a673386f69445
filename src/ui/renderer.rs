//! Main UI renderer

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget, Frame};
use unicode_width::UnicodeWidthStr;

use crate::core::state::DashboardState;
use crate::ui::layout::{ComputedLayout, LayoutManager};
use crate::ui::theme::Theme;
use crate::ui::widgets::{ClockPanel, StatusLine, Tab};

/// Shown in the clock panel until the first reading arrives.
pub const CLOCK_PLACEHOLDER: &str = "--:--:--";

/// Draws a [`DashboardState`]. Holds only presentation settings; it never
/// touches the state it is given.
pub struct Renderer {
    theme: Theme,
    status_label: String,
}

impl Renderer {
    pub fn new(theme: Theme, status_label: impl Into<String>) -> Self {
        Self {
            theme,
            status_label: status_label.into(),
        }
    }

    /// Draw into a terminal frame. Anything past the frame edge is clipped.
    pub fn draw(&self, frame: &mut Frame, state: &DashboardState) {
        self.render_into(state, frame.buffer_mut());
    }

    /// Render to plain text, one line per row with trailing blanks trimmed.
    ///
    /// A single buffer holds at most `u16::MAX` cells, so tall dashboards are
    /// rendered in bands of whole rows and stitched together.
    pub fn render_to_string(&self, state: &DashboardState) -> String {
        let layout = self.layout(state);
        if layout.width == 0 {
            return String::new();
        }

        let band = (u16::MAX / layout.width).max(1);
        let mut rows = Vec::with_capacity(layout.height as usize);
        let mut y = 0;
        while y < layout.height {
            let height = band.min(layout.height - y);
            // Built directly: `Rect::new` would shrink it.
            let mut buf = Buffer::empty(Rect {
                x: 0,
                y,
                width: layout.width,
                height,
            });
            self.render_layout(&layout, state, &mut buf);
            rows.extend(buffer_rows(&buf));
            y += height;
        }
        rows.join("\n")
    }

    fn clock_text(state: &DashboardState) -> String {
        state
            .reading()
            .map(|r| r.render())
            .unwrap_or_else(|| CLOCK_PLACEHOLDER.to_string())
    }

    fn status_text(&self, state: &DashboardState) -> String {
        format!("{}: {}", self.status_label, state.tabs().len())
    }

    fn layout(&self, state: &DashboardState) -> ComputedLayout {
        LayoutManager::compute(
            &Self::clock_text(state),
            state.tabs(),
            &self.status_text(state),
        )
    }

    fn render_into(&self, state: &DashboardState, buf: &mut Buffer) {
        let layout = self.layout(state);
        self.render_layout(&layout, state, buf);
    }

    fn render_layout(&self, layout: &ComputedLayout, state: &DashboardState, buf: &mut Buffer) {
        let clock_text = Self::clock_text(state);
        render_clipped(ClockPanel::new(&clock_text, &self.theme), layout.clock, buf);

        for (i, (label, rect)) in state.tabs().iter().zip(&layout.tabs).enumerate() {
            let active = i == state.selected_index();
            render_clipped(Tab::new(label, active, &self.theme), *rect, buf);
        }

        let status_text = self.status_text(state);
        render_clipped(StatusLine::new(&status_text, &self.theme), layout.status, buf);
    }
}

/// Render `widget` at `rect`, keeping only the cells that fall inside `buf`.
///
/// A widget cut by the buffer edge is drawn whole off to the side first, so
/// its borders stay where they belong instead of closing at the edge.
fn render_clipped<W: Widget>(widget: W, rect: Rect, buf: &mut Buffer) {
    let visible = rect.intersection(buf.area);
    if visible.is_empty() {
        return;
    }
    if visible == rect {
        widget.render(rect, buf);
        return;
    }

    let mut scratch = Buffer::empty(rect);
    widget.render(rect, &mut scratch);
    for y in visible.top()..visible.bottom() {
        for x in visible.left()..visible.right() {
            if let (Some(src), Some(dst)) = (scratch.cell((x, y)), buf.cell_mut((x, y))) {
                *dst = src.clone();
            }
        }
    }
}

/// Cell symbols row by row. Cells hidden behind a wide character are skipped.
fn buffer_rows(buf: &Buffer) -> Vec<String> {
    let width = buf.area.width as usize;
    if width == 0 {
        return Vec::new();
    }

    buf.content
        .chunks(width)
        .map(|row| {
            let mut line = String::new();
            let mut hidden = 0;
            for cell in row {
                if hidden > 0 {
                    hidden -= 1;
                    continue;
                }
                let symbol = cell.symbol();
                line.push_str(symbol);
                hidden = symbol.width().saturating_sub(1);
            }
            line.trim_end().to_string()
        })
        .collect()
}
