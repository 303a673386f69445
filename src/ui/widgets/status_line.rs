//! Status line under the panels

use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

use crate::ui::theme::Theme;

pub struct StatusLine<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> StatusLine<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }
}

impl<'a> Widget for StatusLine<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let span = Span::styled(self.text, self.theme.styles.status);
        buf.set_span(area.x, area.y, &span, area.width);
    }
}
