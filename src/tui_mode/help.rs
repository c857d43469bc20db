use super::app::App;
use eazicalc::help::HELP_SECTIONS;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const NAVIGATION: (&str, &[&str]) = (
    "Navigation",
    &[
        "  ← → : Move cursor left/right",
        "  Ctrl+←/→ : Move cursor by numbers",
        "  Home/End : Move to start/end of line",
        "  ↑ ↓ : Recall earlier calculations",
        "  PgUp/PgDn : Page through history",
        "  Ctrl+U : Clear current input",
        "  Mouse wheel : Scroll through history",
        "  Esc / F1 : Close this screen",
    ],
);

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" EaziCalc Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED);

    let mut help_text = vec![
        Line::from(Span::styled(
            "EaziCalc - Chat Style Calculator",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    let sections = HELP_SECTIONS.iter().chain(std::iter::once(&NAVIGATION));
    for (title, body) in sections {
        help_text.push(Line::from(Span::styled(format!("{}:", title), heading)));
        help_text.extend(body.iter().map(|line| Line::from(*line)));
        help_text.push(Line::from(""));
    }

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
