use super::app::{Action, App};
use super::help::render_help;
use super::helpers::{highlight_expression, wrap_text};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use eazicalc::format::format_result;
use eazicalc::session::HistoryEntry;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

const MIN_WIDTH: u16 = 30;
const MIN_HEIGHT: u16 = 8;
const WHEEL_LINES: i32 = 3;

fn result_style() -> Style {
    Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|f| draw(f, app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let action = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                key_action(key.code, key.modifiers, app.show_help)
            }
            Event::Mouse(mouse) => wheel_action(mouse.kind, app.show_help),
            _ => None,
        };
        if let Some(action) = action {
            app.apply(action);
        }
    }
    Ok(())
}

/// Maps a key to an action; the help screen only scrolls and closes.
pub fn key_action(code: KeyCode, modifiers: KeyModifiers, help_open: bool) -> Option<Action> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    if help_open {
        return match code {
            KeyCode::Down => Some(Action::ScrollHelp(1)),
            KeyCode::Up => Some(Action::ScrollHelp(-1)),
            KeyCode::PageDown => Some(Action::ScrollHelp(10)),
            KeyCode::PageUp => Some(Action::ScrollHelp(-10)),
            KeyCode::Esc | KeyCode::F(1) => Some(Action::CloseHelp),
            KeyCode::Char('c') if ctrl => Some(Action::Quit),
            _ => None,
        };
    }

    let action = match code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('u') | KeyCode::Char('U') if ctrl => Action::ClearInput,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Delete => Action::Delete,
        KeyCode::Left if ctrl => Action::CursorWord(-1),
        KeyCode::Right if ctrl => Action::CursorWord(1),
        KeyCode::Left => Action::Cursor(-1),
        KeyCode::Right => Action::Cursor(1),
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,
        KeyCode::Up => Action::Recall(-1),
        KeyCode::Down => Action::Recall(1),
        KeyCode::PageUp => Action::RecallPage(-1),
        KeyCode::PageDown => Action::RecallPage(1),
        KeyCode::Enter => Action::Submit,
        KeyCode::F(1) => Action::OpenHelp,
        _ => return None,
    };
    Some(action)
}

fn wheel_action(kind: MouseEventKind, help_open: bool) -> Option<Action> {
    let lines = match kind {
        MouseEventKind::ScrollDown => WHEEL_LINES,
        MouseEventKind::ScrollUp => -WHEEL_LINES,
        _ => return None,
    };
    Some(if help_open {
        Action::ScrollHelp(lines)
    } else {
        Action::ScrollHistory(lines)
    })
}

fn draw(frame: &mut Frame, app: &mut App) {
    if app.show_help {
        render_help(frame, app);
        return;
    }

    let area = frame.size();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let message = Paragraph::new(format!("Window too small ({}x{})", area.width, area.height))
            .style(error_style())
            .alignment(Alignment::Center);
        frame.render_widget(message, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    render_chat(frame, app, layout[0]);
    render_status(frame, app, layout[1]);
    render_input(frame, app, layout[2]);
    app.list_height = layout[0].height as usize;
}

/// One exchange of the chat: what the user typed, then the calculator's answer.
fn chat_lines(entry: &HistoryEntry, width: usize, selected: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let user_style = Style::default().fg(if selected { Color::Yellow } else { Color::Cyan });

    for (idx, part) in wrap_text(&entry.expression, width).into_iter().enumerate() {
        let mut spans = vec![Span::styled(if idx == 0 { "you  " } else { "     " }, dim())];
        spans.extend(highlight_expression(&part, user_style));
        lines.push(Line::from(spans));
    }

    let answer = match &entry.result {
        Ok(value) => Line::from(vec![
            Span::styled("calc ", dim()),
            Span::styled("= ", dim()),
            Span::styled(format_result(*value), result_style()),
        ]),
        Err(e) => Line::from(vec![
            Span::styled("calc ", dim()),
            Span::styled(format!("Error: {}", e), error_style()),
        ]),
    };
    lines.push(answer);

    if entry.detailed_mode && entry.result.is_ok() {
        for (n, step) in entry.detailed_steps.iter().enumerate() {
            lines.push(Line::from(Span::styled(
                format!("       {}. {} = {}", n + 1, step.operation, format_result(step.result)),
                dim(),
            )));
        }
        lines.push(Line::from(Span::styled(
            format!("       took {:.3} ms", entry.duration.as_secs_f64() * 1000.0),
            dim(),
        )));
    }

    lines
}

fn render_chat(frame: &mut Frame, app: &mut App, area: Rect) {
    let history = app.session.history();
    if history.is_empty() {
        let hint = Paragraph::new("Type an expression like 2(3+4) and press Enter")
            .style(dim())
            .alignment(Alignment::Center);
        frame.render_widget(hint, area);
        return;
    }

    let width = (area.width as usize).saturating_sub(5).max(1);
    let mut items = Vec::new();
    app.item_start_indices.clear();

    for (i, entry) in history.iter().enumerate() {
        app.item_start_indices.push(items.len());
        let selected = i == app.cursor_history;
        items.extend(chat_lines(entry, width, selected).into_iter().map(ListItem::new));
        items.push(ListItem::new(""));
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(area.height as usize);
        app.scroll_to_bottom = false;
    }

    let list = List::new(items).highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ListState::default()
        .with_selected(app.item_start_indices.get(app.cursor_history).copied())
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let last = match app.session.last_result() {
        Some(value) => Span::styled(format!(" x = {} ", format_result(value)), result_style()),
        None => Span::styled(" x unset ", dim()),
    };
    let count = app.session.history().len();

    let line = Line::from(vec![
        last,
        Span::styled(format!("| {} calculations | F1 help | Ctrl+C quit", count), dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(dim())
        .title(" Expression ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = (inner.width as usize).saturating_sub(2).max(1);
    app.adjust_input_scroll(visible_width);

    let visible: String = app
        .input
        .chars()
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];
    spans.extend(highlight_expression(&visible, Style::default()));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    let before_cursor: String = visible
        .chars()
        .take(app.cursor_position.saturating_sub(app.input_scroll))
        .collect();
    frame.set_cursor(inner.x + 2 + before_cursor.width() as u16, inner.y);
}
