//! Render orchestration for the Sales AI Agent TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::ui::widgets::panel::TextKind;
use crate::ui::widgets::{CollapsedPanelWidget, InputWidget, TextPanelWidget};
use crate::ui::Panel;

const APP_TITLE: &str = "Sales AI Agent";
const INPUT_PROMPT: &str =
    "I can help you create sales pitches. What do you want to write about?";

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let mut constraints = vec![
        Constraint::Length(1), // title bar
        Constraint::Length(3), // input
        Constraint::Fill(2),   // pitch
    ];
    for panel in Panel::HISTORY {
        constraints.push(if app.is_expanded(panel) {
            Constraint::Fill(1)
        } else {
            Constraint::Length(1)
        });
    }
    constraints.push(Constraint::Length(1)); // status bar
    constraints.push(Constraint::Length(1)); // hotkey bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_title_bar(frame, app, chunks[0]);
    render_input(frame, app, chunks[1]);
    render_panel(frame, app, Panel::Pitch, chunks[2]);
    for (offset, panel) in Panel::HISTORY.into_iter().enumerate() {
        render_panel(frame, app, panel, chunks[3 + offset]);
    }
    render_status_bar(frame, app, chunks[6]);
    render_hotkey_bar(frame, app, chunks[7]);

    if app.show_help() {
        render_help_overlay(frame, app, area);
    }
}

/// Render the title bar
fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {APP_TITLE} "),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(latest) = app.latest() {
        spans.push(Span::styled(
            format!("| {} ", latest.topic),
            Style::default().fg(app.theme.accent),
        ));
    }
    spans.push(Span::styled(
        format!("| {} pitches ", app.submission_count()),
        app.theme.system_style(),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the input area
fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let placeholder = if app.processing {
        "Generating..."
    } else {
        "Enter a topic..."
    };

    let input_widget = InputWidget::new(app.input_buffer(), &app.theme)
        .cursor_position(app.cursor_position())
        .title(INPUT_PROMPT)
        .active(app.input_mode == InputMode::Insert)
        .placeholder(placeholder);

    frame.render_widget(input_widget, area);
}

/// Render the pitch or one history panel
fn render_panel(frame: &mut Frame, app: &App, panel: Panel, area: Rect) {
    let text = app.panel_text(panel);

    if !app.is_expanded(panel) {
        let hotkey = panel.hotkey().unwrap_or(' ');
        let detail = match panel {
            Panel::Research if text.is_empty() => String::new(),
            Panel::Research => format!("{} chars", text.chars().count()),
            _ => format!("{} turns", app.turn_count(panel)),
        };
        let widget = CollapsedPanelWidget::new(panel.title(), hotkey, &app.theme).detail(detail);
        frame.render_widget(widget, area);
        return;
    }

    let (kind, hint) = match panel {
        Panel::Pitch => (TextKind::Pitch, "Your pitch title and email will appear here"),
        Panel::TitleHistory | Panel::ScriptHistory => (TextKind::Transcript, "No turns yet"),
        Panel::Research => (TextKind::Plain, "No research yet"),
    };

    let title = match panel.hotkey() {
        Some(key) => format!("▾ {} [{key}]", panel.title()),
        None => panel.title().to_string(),
    };

    let widget = TextPanelWidget::new(title, &text, &app.theme)
        .kind(kind)
        .empty_hint(hint)
        .scroll(app.scroll(panel))
        .focused(app.focused == panel);
    app.set_max_scroll(panel, widget.max_scroll(area));
    frame.render_widget(widget, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        InputMode::Insert => Span::styled(
            " INSERT ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let mut spans = vec![mode, Span::raw(" ")];
    if let Some(message) = app.status_message() {
        let is_error = message.starts_with("Error");
        spans.push(Span::styled(message, app.theme.status_style(is_error)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the hotkey bar
fn render_hotkey_bar(frame: &mut Frame, app: &App, area: Rect) {
    let keys: &[(&str, &str)] = match app.input_mode {
        InputMode::Insert => &[("Enter", "generate"), ("Esc", "normal"), ("↑/↓", "history")],
        InputMode::Normal => &[
            ("i", "topic"),
            ("1/2/3", "panels"),
            ("Tab", "focus"),
            ("j/k", "scroll"),
            ("?", "help"),
            ("q", "quit"),
        ],
    };

    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default()
                .fg(app.theme.accent)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!(" {action} "), app.theme.system_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(52, 19, area);

    frame.render_widget(Clear, popup_area);

    let heading = Style::default().add_modifier(Modifier::UNDERLINED);
    let help_text = vec![
        Line::from(Span::styled(
            format!(" {APP_TITLE} - Help "),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Input Modes:", heading)),
        Line::from("  i        Enter INSERT mode (type a topic)"),
        Line::from("  Enter    Generate title, research and email"),
        Line::from("  Esc      Return to NORMAL mode"),
        Line::from(""),
        Line::from(Span::styled("Panels (NORMAL mode):", heading)),
        Line::from("  1/2/3    Toggle Title/Script History, Research"),
        Line::from("  Tab      Cycle focus between open panels"),
        Line::from("  j/k      Scroll the focused panel"),
        Line::from("  g        Jump to top"),
        Line::from("  Mouse    Scroll the focused panel"),
        Line::from(""),
        Line::from("  q        Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}

/// A rectangle of fixed size centered in `area`, clipped to fit.
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
