//! Name entry and role choice.

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::flow::{Role, RoleForm};

use super::render::{centered_rows, input_line, title_line};

pub fn render(frame: &mut Frame, area: Rect, form: &RoleForm, server: &str) {
    let content = vec![
        Line::from(""),
        title_line(),
        Line::from(""),
        Line::from(Span::styled(
            format!("Server: {}", server),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        input_line("Your name: ", &form.name, true),
        Line::from(""),
        role_line(form.role),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "[Tab] switch  ·  [Enter] continue  ·  [Esc] quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, centered_rows(area, 11));
}

fn role_line(role: Role) -> Line<'static> {
    let option = |label: &'static str, selected: bool| {
        if selected {
            Span::styled(
                format!("> {} <", label),
                Style::default().fg(Color::Yellow).bold(),
            )
        } else {
            Span::styled(format!("  {}  ", label), Style::default().fg(Color::White))
        }
    };

    Line::from(vec![
        option("Create a session", role == Role::Create),
        Span::raw("    "),
        option("Join a session", role == Role::Join),
    ])
}
