//! Join-by-code form.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::flow::{JoinForm, QuizFlow};

use super::render::{centered_rows, input_line, title_line};

pub fn render(frame: &mut Frame, area: Rect, form: &JoinForm, flow: &QuizFlow) {
    let busy = flow.is_busy();

    let status = if busy {
        Line::from(Span::styled(
            format!("Joining {}...", form.code),
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
            Span::styled("Joining as ", Style::default().fg(Color::White)),
            Span::styled(flow.player_name(), Style::default().fg(Color::Green).bold()),
        ]),
        Line::from(""),
        input_line("Session code: ", &form.code, !busy),
        Line::from(""),
        status,
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] join  ·  [Esc] back",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, centered_rows(area, 10));
}
