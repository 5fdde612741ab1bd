//! Input field widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::PitchTheme;

/// Single-line topic input
pub struct InputWidget<'a> {
    content: &'a str,
    cursor_position: usize,
    theme: &'a PitchTheme,
    title: &'a str,
    placeholder: &'a str,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(content: &'a str, theme: &'a PitchTheme) -> Self {
        Self {
            content,
            cursor_position: content.chars().count(),
            theme,
            title: "",
            placeholder: "Enter a topic...",
            is_active: true,
        }
    }

    pub fn cursor_position(mut self, pos: usize) -> Self {
        self.cursor_position = pos;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled(
                format!(" {} ", self.title),
                self.theme.title_style(self.is_active),
            ))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));

        let inner = block.inner(area);
        block.render(area, buf);

        let prompt_style = Style::default().fg(self.theme.accent);

        let line = if self.content.is_empty() {
            Line::from(vec![
                Span::styled("> ", prompt_style),
                Span::styled(self.placeholder, self.theme.system_style()),
            ])
        } else if !self.is_active {
            Line::from(vec![
                Span::styled("> ", prompt_style),
                Span::raw(self.content),
            ])
        } else {
            // Character-based slicing keeps the cursor on char boundaries
            let before_cursor: String = self.content.chars().take(self.cursor_position).collect();
            let at_cursor = self
                .content
                .chars()
                .nth(self.cursor_position)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after_cursor: String = self.content.chars().skip(self.cursor_position + 1).collect();

            Line::from(vec![
                Span::styled("> ", prompt_style),
                Span::raw(before_cursor),
                Span::styled(
                    at_cursor,
                    Style::default()
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                        .fg(self.theme.accent),
                ),
                Span::raw(after_cursor),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
