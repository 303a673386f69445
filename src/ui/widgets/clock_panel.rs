//! Clock panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Text,
    widgets::{Paragraph, Widget},
};

use super::{boxed, CLOSED_BORDER};
use crate::ui::theme::Theme;

pub struct ClockPanel<'a> {
    text: &'a str,
    theme: &'a Theme,
}

impl<'a> ClockPanel<'a> {
    pub fn new(text: &'a str, theme: &'a Theme) -> Self {
        Self { text, theme }
    }
}

impl<'a> Widget for ClockPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = boxed(CLOSED_BORDER).border_style(self.theme.styles.clock_border);
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Text::raw(self.text))
            .style(self.theme.styles.clock_text)
            .render(inner, buf);
    }
}
