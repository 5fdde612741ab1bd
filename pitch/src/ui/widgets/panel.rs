//! Text panels: the pitch view and the collapsible history panels

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::scrollbar,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
        StatefulWidget, Widget, Wrap,
    },
};

use crate::ui::theme::PitchTheme;

/// How panel text is colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    /// First paragraph is the pitch title, the rest is the email
    Pitch,
    /// `Human:` / `AI:` transcript lines
    Transcript,
    /// Plain research text
    Plain,
}

/// Scrollable, wrapped text inside a bordered block
pub struct TextPanelWidget<'a> {
    title: String,
    text: &'a str,
    kind: TextKind,
    empty_hint: &'a str,
    scroll: usize,
    theme: &'a PitchTheme,
    focused: bool,
}

impl<'a> TextPanelWidget<'a> {
    pub fn new(title: impl Into<String>, text: &'a str, theme: &'a PitchTheme) -> Self {
        Self {
            title: title.into(),
            text,
            kind: TextKind::Plain,
            empty_hint: "Nothing yet",
            scroll: 0,
            theme,
            focused: false,
        }
    }

    pub fn kind(mut self, kind: TextKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn empty_hint(mut self, hint: &'a str) -> Self {
        self.empty_hint = hint;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        if self.text.is_empty() {
            return vec![Line::from(Span::styled(
                self.empty_hint,
                self.theme.system_style(),
            ))];
        }

        let mut in_title = self.kind == TextKind::Pitch;
        self.text
            .lines()
            .map(|line| {
                let style = match self.kind {
                    TextKind::Pitch if in_title => {
                        if line.is_empty() {
                            in_title = false;
                        }
                        self.theme.pitch_title_style()
                    }
                    TextKind::Transcript => self.theme.transcript_style(line),
                    _ => self.theme.text_style(),
                };
                Line::from(Span::styled(line, style))
            })
            .collect()
    }

    fn block(&self) -> Block<'a> {
        let title = if self.focused {
            format!(" {} [j/k scroll] ", self.title)
        } else {
            format!(" {} ", self.title)
        };

        Block::default()
            .title(Span::styled(title, self.theme.title_style(self.focused)))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.focused))
    }

    fn paragraph(&self) -> Paragraph<'a> {
        Paragraph::new(self.lines()).wrap(Wrap { trim: false })
    }

    /// Furthest scroll offset that still fills `area`, counted in wrapped rows.
    pub fn max_scroll(&self, area: Rect) -> usize {
        let inner = self.block().inner(area);
        self.paragraph()
            .line_count(inner.width)
            .saturating_sub(inner.height as usize)
    }
}

impl Widget for TextPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        let paragraph = self.paragraph();
        let visible_height = inner.height as usize;
        let total_rows = paragraph.line_count(inner.width);
        let max_scroll = total_rows.saturating_sub(visible_height);
        let scroll = self.scroll.min(max_scroll);

        paragraph
            .scroll((scroll.min(u16::MAX as usize) as u16, 0))
            .render(inner, buf);

        if total_rows > visible_height {
            let scrollbar_area = Rect {
                x: inner.x + inner.width.saturating_sub(1),
                y: inner.y,
                width: 1,
                height: inner.height,
            };

            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .symbols(scrollbar::VERTICAL)
                .thumb_style(Style::default().fg(Color::DarkGray))
                .track_style(Style::default().fg(Color::Black))
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"));

            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(scroll);
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);

            if scroll < max_scroll {
                let hint = format!(" ↓{} more ", max_scroll - scroll);
                let hint_y = inner.y + inner.height.saturating_sub(1);
                let hint_style = Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM);
                for (i, ch) in hint.chars().enumerate() {
                    let x = inner.x + (i as u16);
                    if x < inner.x + inner.width.saturating_sub(2) {
                        buf[(x, hint_y)].set_char(ch).set_style(hint_style);
                    }
                }
            }
        }
    }
}

/// One-line header for a collapsed panel
pub struct CollapsedPanelWidget<'a> {
    title: &'a str,
    hotkey: char,
    detail: String,
    theme: &'a PitchTheme,
}

impl<'a> CollapsedPanelWidget<'a> {
    pub fn new(title: &'a str, hotkey: char, theme: &'a PitchTheme) -> Self {
        Self {
            title,
            hotkey,
            detail: String::new(),
            theme,
        }
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }
}

impl Widget for CollapsedPanelWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            Span::styled("▸ ", Style::default().fg(self.theme.accent)),
            Span::styled(self.title, self.theme.title_style(false)),
            Span::styled(format!(" [{}]", self.hotkey), self.theme.system_style()),
        ];
        if !self.detail.is_empty() {
            spans.push(Span::styled(
                format!("  {}", self.detail),
                self.theme.system_style(),
            ));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
