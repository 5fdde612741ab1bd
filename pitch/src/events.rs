//! Event handling for the Sales AI Agent TUI

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::{App, InputMode};
use crate::ui::Panel;

/// Result of handling an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    Continue,
    Quit,
    NeedsRedraw,
    /// A topic was entered and should be run through the pipeline
    Submit(String),
}

/// Handle a terminal event
pub fn handle_event(app: &mut App, event: Event) -> EventResult {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key_event(app, key),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse),
        Event::Resize(_, _) => EventResult::NeedsRedraw,
        _ => EventResult::Continue,
    }
}

/// Handle a mouse event
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) -> EventResult {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            app.scroll_up(3);
            EventResult::NeedsRedraw
        }
        MouseEventKind::ScrollDown => {
            app.scroll_down(3);
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}

/// Handle a key event
fn handle_key_event(app: &mut App, key: KeyEvent) -> EventResult {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (key.code, key.modifiers) {
        return EventResult::Quit;
    }

    if app.show_help() {
        return handle_help_key(app, key);
    }

    // Ignore keystrokes while a pitch is being generated
    if app.processing {
        return EventResult::Continue;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Insert => handle_insert_mode(app, key),
    }
}

/// Handle keys in NORMAL mode (vim-style navigation and hotkeys)
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Char('i') => {
            app.input_mode = InputMode::Insert;
            EventResult::NeedsRedraw
        }
        KeyCode::Char('a') => {
            app.input_mode = InputMode::Insert;
            app.cursor_end();
            EventResult::NeedsRedraw
        }

        KeyCode::Char('?') | KeyCode::F(1) => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }

        KeyCode::Char('q') => EventResult::Quit,

        KeyCode::Char(c @ '1'..='3') => {
            if let Some(panel) = Panel::HISTORY.into_iter().find(|p| p.hotkey() == Some(c)) {
                app.toggle_panel(panel);
            }
            EventResult::NeedsRedraw
        }

        KeyCode::Char('j') | KeyCode::Down => {
            app.scroll_down(1);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.scroll_up(1);
            EventResult::NeedsRedraw
        }
        KeyCode::PageDown => {
            app.scroll_down(10);
            EventResult::NeedsRedraw
        }
        KeyCode::PageUp => {
            app.scroll_up(10);
            EventResult::NeedsRedraw
        }
        KeyCode::Char('g') => {
            app.scroll_to_top();
            EventResult::NeedsRedraw
        }

        KeyCode::Tab => {
            app.cycle_focus();
            EventResult::NeedsRedraw
        }

        KeyCode::Esc => {
            app.clear_status();
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys in INSERT mode (topic input)
fn handle_insert_mode(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            EventResult::NeedsRedraw
        }

        KeyCode::Enter => match app.submit_input() {
            Some(topic) => {
                app.input_mode = InputMode::Normal;
                EventResult::Submit(topic)
            }
            None => EventResult::NeedsRedraw,
        },

        KeyCode::Left => {
            app.cursor_left();
            EventResult::NeedsRedraw
        }
        KeyCode::Right => {
            app.cursor_right();
            EventResult::NeedsRedraw
        }
        KeyCode::Home => {
            app.cursor_home();
            EventResult::NeedsRedraw
        }
        KeyCode::End => {
            app.cursor_end();
            EventResult::NeedsRedraw
        }
        KeyCode::Backspace => {
            app.backspace();
            EventResult::NeedsRedraw
        }
        KeyCode::Delete => {
            app.delete();
            EventResult::NeedsRedraw
        }
        KeyCode::Up => {
            app.history_prev();
            EventResult::NeedsRedraw
        }
        KeyCode::Down => {
            app.history_next();
            EventResult::NeedsRedraw
        }

        KeyCode::Char(c) => {
            app.type_char(c);
            EventResult::NeedsRedraw
        }

        _ => EventResult::Continue,
    }
}

/// Handle keys while the help overlay is open
fn handle_help_key(app: &mut App, key: KeyEvent) -> EventResult {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            app.toggle_help();
            EventResult::NeedsRedraw
        }
        _ => EventResult::Continue,
    }
}
