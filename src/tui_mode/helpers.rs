use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec!["".to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }

            let mut chunk = String::new();
            let mut chunk_width = 0;
            for c in word.chars() {
                let char_width = UnicodeWidthChar::width(c).unwrap_or(1);
                if chunk_width + char_width > width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            if !chunk.is_empty() {
                lines.push(chunk);
            }
            continue;
        }

        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Colors numbers, operators and the last-result placeholder.
pub fn highlight_expression(expr: &str, base_style: Style) -> Vec<Span<'static>> {
    let placeholder_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    let operator_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    let number_style = Style::default().fg(Color::LightGreen);

    let mut spans = Vec::new();
    let mut number = String::new();

    for c in expr.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        if !number.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut number), number_style));
        }

        let style = match c {
            '+' | '-' | '*' | '/' | '×' | '÷' | ':' => operator_style,
            'x' => placeholder_style,
            _ => base_style,
        };
        spans.push(Span::styled(c.to_string(), style));
    }

    if !number.is_empty() {
        spans.push(Span::styled(number, number_style));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_words() {
        assert_eq!(wrap_text("1 + 2 + 3", 5), vec!["1 + 2", "+ 3"]);
    }

    #[test]
    fn splits_long_numbers() {
        assert_eq!(wrap_text("1234567", 3), vec!["123", "456", "7"]);
    }

    #[test]
    fn zero_width_gives_one_empty_line() {
        assert_eq!(wrap_text("1 + 2", 0), vec![String::new()]);
    }

    #[test]
    fn highlight_groups_numbers() {
        let spans = highlight_expression("12.5*x", Style::default());
        let parts: Vec<_> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["12.5", "*", "x"]);
    }
}
