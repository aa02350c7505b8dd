//! Session creation form.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::flow::{CreateForm, QuizFlow};

use super::render::{centered_rows, input_line, title_line};

pub fn render(frame: &mut Frame, area: Rect, form: &CreateForm, flow: &QuizFlow) {
    let busy = flow.is_busy();

    let status = if busy {
        Line::from(Span::styled(
            "Creating session and generating questions...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from("")
    };

    let content = vec![
        Line::from(""),
        title_line(),
        Line::from(""),
        Line::from(vec![
            Span::styled("Hosting as ", Style::default().fg(Color::White)),
            Span::styled(flow.player_name(), Style::default().fg(Color::Green).bold()),
        ]),
        Line::from(""),
        input_line("Quiz topic: ", &form.topic, !busy),
        Line::from(vec![
            Span::styled("Max players: ", Style::default().fg(Color::White)),
            Span::styled(
                form.max_players.to_string(),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(""),
        status,
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] create  ·  [Up/Down] players  ·  [Esc] back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, centered_rows(area, 11));
}
