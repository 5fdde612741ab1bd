//! Main application state and logic

use std::cell::Cell;
use std::collections::VecDeque;

use pitch_core::{Orchestrator, Session, Submission};
use tracing::warn;

use crate::ui::theme::PitchTheme;
use crate::ui::Panel;

const MAX_HISTORY: usize = 100;

/// Vim-style input modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Normal mode - navigation and hotkeys (default)
    #[default]
    Normal,
    /// Insert mode - typing a topic
    Insert,
}

/// Main application state
pub struct App {
    orchestrator: Orchestrator,
    session: Session,

    // Latest successful submission and the memory sizes it was taken at
    latest: Option<Submission>,
    latest_turns: [usize; 2],

    // UI state
    pub theme: PitchTheme,
    pub focused: Panel,
    expanded: [bool; 3],
    scroll: [usize; 4],
    // Written by the renderer, which knows the wrapped height
    max_scroll: [Cell<usize>; 4],
    show_help: bool,

    // Input state
    pub input_mode: InputMode,
    input_buffer: String,
    cursor_position: usize,
    input_history: VecDeque<String>,
    history_index: Option<usize>,
    saved_input: Option<String>,

    // Status
    status_message: Option<String>,
    pub processing: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(orchestrator: Orchestrator, session: Session) -> Self {
        Self {
            orchestrator,
            session,
            latest: None,
            latest_turns: [0; 2],
            theme: PitchTheme::default(),
            focused: Panel::Pitch,
            expanded: [false; 3],
            scroll: [0; 4],
            max_scroll: Default::default(),
            show_help: false,
            input_mode: InputMode::Insert,
            input_buffer: String::new(),
            cursor_position: 0,
            input_history: VecDeque::with_capacity(MAX_HISTORY),
            history_index: None,
            saved_input: None,
            status_message: Some("Type a topic and press Enter. Esc for normal mode, ? for help".to_string()),
            processing: false,
            should_quit: false,
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Mark a submission as in flight so the next frame shows it.
    pub fn start_processing(&mut self, topic: &str) {
        self.processing = true;
        self.set_status(format!("Generating a pitch about '{topic}'..."));
    }

    /// Run the pipeline for one topic and store the outcome.
    pub async fn process_submission(&mut self, topic: &str) {
        let result = self
            .orchestrator
            .handle_submission(&mut self.session, topic)
            .await;
        self.processing = false;

        match result {
            Ok(submission) => {
                self.latest = Some(submission);
                self.latest_turns = [
                    self.session.title_memory().len(),
                    self.session.script_memory().len(),
                ];
                self.scroll = [0; 4];
                self.set_status("Pitch ready. Press 1/2/3 to toggle history panels");
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.set_status(format!("Error: {e}"));
            }
        }
    }

    /// The latest successful submission.
    pub fn latest(&self) -> Option<&Submission> {
        self.latest.as_ref()
    }

    /// Text shown in a panel, taken from the latest successful submission.
    pub fn panel_text(&self, panel: Panel) -> String {
        let Some(latest) = &self.latest else {
            return String::new();
        };
        match panel {
            Panel::Pitch => format!("{}\n\n{}", latest.title, latest.script),
            Panel::TitleHistory => latest.title_transcript.clone(),
            Panel::ScriptHistory => latest.script_transcript.clone(),
            Panel::Research => latest.wiki_research.clone(),
        }
    }

    /// Turns shown in a history panel.
    pub fn turn_count(&self, panel: Panel) -> usize {
        match panel {
            Panel::TitleHistory => self.latest_turns[0],
            Panel::ScriptHistory => self.latest_turns[1],
            Panel::Pitch | Panel::Research => 0,
        }
    }

    // =========================================================================
    // Panels
    // =========================================================================

    /// Expand or collapse a history panel and focus it when opened.
    pub fn toggle_panel(&mut self, panel: Panel) {
        let Some(index) = panel.history_index() else {
            return;
        };
        self.expanded[index] = !self.expanded[index];
        self.focused = if self.expanded[index] {
            panel
        } else {
            Panel::Pitch
        };
    }

    pub fn is_expanded(&self, panel: Panel) -> bool {
        panel
            .history_index()
            .map(|index| self.expanded[index])
            .unwrap_or(true)
    }

    /// Cycle focus through the pitch and the expanded panels
    pub fn cycle_focus(&mut self) {
        let mut next = self.focused.next();
        while !self.is_expanded(next) {
            next = next.next();
        }
        self.focused = next;
    }

    pub fn scroll(&self, panel: Panel) -> usize {
        self.scroll[panel.index()]
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let scroll = &mut self.scroll[self.focused.index()];
        *scroll = scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let index = self.focused.index();
        let max = self.max_scroll[index].get();
        self.scroll[index] = (self.scroll[index] + lines).min(max);
    }

    /// Record how far a panel can scroll at its current size.
    pub fn set_max_scroll(&self, panel: Panel, max: usize) {
        self.max_scroll[panel.index()].set(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll[self.focused.index()] = 0;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    // =========================================================================
    // Input editing
    // =========================================================================

    /// Submit current input
    pub fn submit_input(&mut self) -> Option<String> {
        if self.input_buffer.trim().is_empty() {
            return None;
        }

        let input = std::mem::take(&mut self.input_buffer);
        self.cursor_position = 0;

        self.input_history.push_front(input.clone());
        if self.input_history.len() > MAX_HISTORY {
            self.input_history.pop_back();
        }
        self.history_index = None;
        self.saved_input = None;

        Some(input)
    }

    /// Handle a typed character (unicode-safe)
    pub fn type_char(&mut self, c: char) {
        let byte_pos = self.byte_index(self.cursor_position);
        self.input_buffer.insert(byte_pos, c);
        self.cursor_position += 1;
    }

    /// Handle backspace (unicode-safe)
    pub fn backspace(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            self.remove_char_at_cursor();
        }
    }

    /// Handle delete (unicode-safe)
    pub fn delete(&mut self) {
        self.remove_char_at_cursor();
    }

    fn remove_char_at_cursor(&mut self) {
        if let Some((byte_pos, ch)) = self.input_buffer.char_indices().nth(self.cursor_position) {
            self.input_buffer
                .replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.input_buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.input_buffer.len())
    }

    pub fn cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input_buffer.chars().count();
        self.cursor_position = (self.cursor_position + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.input_buffer.chars().count();
    }

    /// Navigate to previous input in history
    pub fn history_prev(&mut self) {
        if self.input_history.is_empty() {
            return;
        }

        let next_index = match self.history_index {
            None => {
                self.saved_input = Some(self.input_buffer.clone());
                0
            }
            Some(i) => (i + 1).min(self.input_history.len() - 1),
        };

        self.history_index = Some(next_index);
        if let Some(entry) = self.input_history.get(next_index) {
            self.input_buffer = entry.clone();
            self.cursor_end();
        }
    }

    /// Navigate to next input in history
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                self.input_buffer = self.saved_input.take().unwrap_or_default();
                self.cursor_end();
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                if let Some(entry) = self.input_history.get(i - 1) {
                    self.input_buffer = entry.clone();
                    self.cursor_end();
                }
            }
        }
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Set status message (always overwrites)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Number of completed pitches in this session.
    pub fn submission_count(&self) -> usize {
        self.session.submissions()
    }
}
