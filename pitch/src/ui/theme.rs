//! Color theme and styling for the Sales AI Agent TUI

use ratatui::style::{Color, Modifier, Style};

/// UI color theme
#[derive(Debug, Clone)]
pub struct PitchTheme {
    pub foreground: Color,
    pub border: Color,
    pub border_focused: Color,
    pub accent: Color,
    pub title_text: Color,
    pub transcript_human: Color,
    pub transcript_ai: Color,
    pub system_text: Color,
    pub error_text: Color,
}

impl Default for PitchTheme {
    fn default() -> Self {
        Self {
            foreground: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            accent: Color::Cyan,
            title_text: Color::Yellow,
            transcript_human: Color::Cyan,
            transcript_ai: Color::White,
            system_text: Color::DarkGray,
            error_text: Color::LightRed,
        }
    }
}

impl PitchTheme {
    /// Style for body text
    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Style for the generated pitch title
    pub fn pitch_title_style(&self) -> Style {
        Style::default()
            .fg(self.title_text)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a transcript line, by speaker prefix
    pub fn transcript_style(&self, line: &str) -> Style {
        if line.starts_with("Human: ") {
            Style::default()
                .fg(self.transcript_human)
                .add_modifier(Modifier::ITALIC)
        } else if line.starts_with("AI: ") {
            Style::default().fg(self.transcript_ai)
        } else {
            self.text_style()
        }
    }

    /// Style for hints and placeholders
    pub fn system_style(&self) -> Style {
        Style::default()
            .fg(self.system_text)
            .add_modifier(Modifier::DIM)
    }

    /// Style for the status line
    pub fn status_style(&self, is_error: bool) -> Style {
        if is_error {
            Style::default()
                .fg(self.error_text)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent)
        }
    }

    /// Get border style
    pub fn border_style(&self, focused: bool) -> Style {
        Style::default().fg(if focused {
            self.border_focused
        } else {
            self.border
        })
    }

    /// Get panel title style
    pub fn title_style(&self, focused: bool) -> Style {
        let style = Style::default().fg(if focused {
            self.border_focused
        } else {
            self.foreground
        });

        if focused {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}
