//! A single station tab

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Text,
    widgets::{Paragraph, Widget},
};

use super::{boxed, CLOSED_BORDER, OPEN_BORDER};
use crate::ui::theme::Theme;

/// One tab in the column. The active tab keeps its bottom edge open so it
/// reads as attached to what sits below it.
pub struct Tab<'a> {
    label: &'a str,
    active: bool,
    theme: &'a Theme,
}

impl<'a> Tab<'a> {
    pub fn new(label: &'a str, active: bool, theme: &'a Theme) -> Self {
        Self {
            label,
            active,
            theme,
        }
    }
}

impl<'a> Widget for Tab<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = &self.theme.styles;
        let (set, border_style, label_style) = if self.active {
            (OPEN_BORDER, styles.tab_border_active, styles.tab_label_active)
        } else {
            (CLOSED_BORDER, styles.tab_border, styles.tab_label)
        };

        let block = boxed(set).border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(Text::raw(self.label))
            .style(label_style)
            .render(inner, buf);
    }
}
