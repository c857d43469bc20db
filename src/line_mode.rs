use anyhow::{Context, Result};
use eazicalc::help::help_lines;
use eazicalc::format::format_result;
use eazicalc::{HistoryEntry, HistoryStore, Outcome, Session};
use std::io::{stdin, stdout, Stdout, Write};
use termion::{
    clear::CurrentLine as ClearLine,
    cursor::{DetectCursorPos, Goto},
    event::Key,
    input::TermRead,
    raw::{IntoRawMode, RawTerminal},
};

const PROMPT: &str = "Expression: ";

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn run_line(mut session: Session, store: Option<HistoryStore>) -> Result<()> {
    println!("EaziCalc");
    println!("Supports: +, -, * (×), / (÷ :), parentheses, x for the previous result");
    println!("Navigation: ←/→, Backspace/Delete, Home/End, ↑/↓ for history");
    println!("Special commands: 'quit' to exit, 'clear' to reset history, 'help'");
    println!("\rAdd 'details' before expression for step-by-step evaluation\n");

    let mut stdout = stdout().into_raw_mode().context("enabling raw mode")?;

    for entry in session.history() {
        print_entry(&mut stdout, entry)?;
    }

    loop {
        let Some(expression) = read_expression(&mut stdout, &session)? else {
            write!(stdout, "\r\n")?;
            return Ok(());
        };

        match session.submit(&expression) {
            Outcome::Ignored => {}
            Outcome::Quit => {
                write!(stdout, "\r\nGoodbye!\r\n")?;
                return Ok(());
            }
            Outcome::Help => {
                write!(stdout, "\r\n")?;
                for line in help_lines() {
                    write!(stdout, "{}\r\n", line)?;
                }
            }
            Outcome::Cleared => {
                write!(stdout, "\r\nHistory cleared\r\n")?;
                if let Some(store) = &store {
                    store.sync(&session);
                }
            }
            Outcome::Evaluated { index } => {
                write!(stdout, "\r\n")?;
                print_entry(&mut stdout, &session.history()[index])?;
                if let Some(store) = &store {
                    store.sync(&session);
                }
            }
        }
        stdout.flush()?;
    }
}

/// Reads one edited line. `None` when input ends.
fn read_expression(stdout: &mut RawTerminal<Stdout>, session: &Session) -> Result<Option<String>> {
    write!(stdout, "{}{}", ClearLine, PROMPT)?;
    stdout.flush()?;

    let history = session.history();
    let mut history_index = history.len();
    let mut expression = String::new();
    let mut cursor_pos = 0;
    let (_, initial_y) = stdout.cursor_pos()?;

    let stdin = stdin();
    let mut keys = stdin.keys();

    loop {
        write!(stdout, "{}{}{}{}", Goto(1, initial_y), ClearLine, PROMPT, expression)?;
        let prefix_width = PROMPT.len() + expression.chars().take(cursor_pos).count();
        write!(stdout, "{}", Goto((prefix_width + 1) as u16, initial_y))?;
        stdout.flush()?;

        let Some(key) = keys.next() else {
            return Ok(None);
        };
        match key? {
            Key::Char('\n') => return Ok(Some(expression)),
            Key::Ctrl('c') | Key::Ctrl('d') => return Ok(None),
            Key::Char(c) => {
                let byte_idx = char_index_to_byte_index(&expression, cursor_pos);
                expression.insert(byte_idx, c);
                cursor_pos += 1;
            }
            Key::Backspace if cursor_pos > 0 => {
                cursor_pos -= 1;
                remove_char(&mut expression, cursor_pos);
            }
            Key::Delete if cursor_pos < expression.chars().count() => {
                remove_char(&mut expression, cursor_pos);
            }
            Key::Left if cursor_pos > 0 => cursor_pos -= 1,
            Key::Right if cursor_pos < expression.chars().count() => cursor_pos += 1,
            Key::Home => cursor_pos = 0,
            Key::End => cursor_pos = expression.chars().count(),
            Key::Up => {
                if let Some(i) = (0..history_index).rev().find(|&i| session.recall(i).is_some()) {
                    history_index = i;
                    expression = session.recall(i).unwrap_or_default().to_string();
                    cursor_pos = expression.chars().count();
                }
            }
            Key::Down => {
                match (history_index + 1..history.len()).find(|&i| session.recall(i).is_some()) {
                    Some(i) => {
                        history_index = i;
                        expression = session.recall(i).unwrap_or_default().to_string();
                    }
                    None => {
                        history_index = history.len();
                        expression.clear();
                    }
                }
                cursor_pos = expression.chars().count();
            }
            _ => {}
        }
    }
}

fn remove_char(expression: &mut String, char_index: usize) {
    let byte_idx = char_index_to_byte_index(expression, char_index);
    if let Some(c) = expression[byte_idx..].chars().next() {
        expression.drain(byte_idx..byte_idx + c.len_utf8());
    }
}

fn print_entry(stdout: &mut RawTerminal<Stdout>, entry: &HistoryEntry) -> Result<()> {
    match &entry.result {
        Ok(_) => write!(stdout, "  {}\r\n", entry.display_line())?,
        Err(e) => write!(stdout, "  {}\r\n  Error: {}\r\n", entry.display_line(), e)?,
    }

    if entry.detailed_mode && !entry.detailed_steps.is_empty() {
        write!(stdout, "\r\n  Step-by-step evaluation:\r\n")?;
        for (i, step) in entry.detailed_steps.iter().enumerate() {
            write!(
                stdout,
                "  Step {}: {} = {}\r\n",
                i + 1,
                step.operation,
                format_result(step.result)
            )?;
        }
        write!(
            stdout,
            "  Time: {:.6} ms\r\n",
            entry.duration.as_secs_f64() * 1000.0
        )?;
    }
    write!(stdout, "\r\n")?;
    Ok(())
}
