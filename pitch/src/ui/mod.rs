//! UI module for the Sales AI Agent TUI

pub mod render;
pub mod theme;
pub mod widgets;

/// Scrollable areas of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// Latest title and email
    #[default]
    Pitch,
    TitleHistory,
    ScriptHistory,
    Research,
}

impl Panel {
    /// The collapsible panels, in screen order.
    pub const HISTORY: [Panel; 3] = [Panel::TitleHistory, Panel::ScriptHistory, Panel::Research];

    pub fn index(self) -> usize {
        match self {
            Panel::Pitch => 0,
            Panel::TitleHistory => 1,
            Panel::ScriptHistory => 2,
            Panel::Research => 3,
        }
    }

    /// Position among the collapsible panels, `None` for the pitch.
    pub fn history_index(self) -> Option<usize> {
        self.index().checked_sub(1)
    }

    pub fn next(self) -> Panel {
        match self {
            Panel::Pitch => Panel::TitleHistory,
            Panel::TitleHistory => Panel::ScriptHistory,
            Panel::ScriptHistory => Panel::Research,
            Panel::Research => Panel::Pitch,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Panel::Pitch => "Pitch",
            Panel::TitleHistory => "Title History",
            Panel::ScriptHistory => "Script History",
            Panel::Research => "Wikipedia Research",
        }
    }

    /// Hotkey that toggles the panel.
    pub fn hotkey(self) -> Option<char> {
        match self {
            Panel::Pitch => None,
            Panel::TitleHistory => Some('1'),
            Panel::ScriptHistory => Some('2'),
            Panel::Research => Some('3'),
        }
    }
}
