//! Main client UI renderer.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::flow::{Mode, Notice, QuizFlow, Severity};

use super::{choose_role, creating, joining, quiz, results};

pub(super) const TITLE: &str = "QUIZLINE";

/// Render the whole screen from the engine state.
pub fn render(frame: &mut Frame, flow: &QuizFlow, server: &str) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let body = chunks[0];

    match flow.mode() {
        Mode::ChooseRole(form) => choose_role::render(frame, body, form, server),
        Mode::Creating(form) => creating::render(frame, body, form, flow),
        Mode::Joining(form) => joining::render(frame, body, form, flow),
        Mode::InQuiz(round) => quiz::render(frame, body, round, flow),
        Mode::Result(board) => results::render(frame, body, board, flow),
    }

    match flow.notice() {
        Some(notice) if notice.severity == Severity::Error => render_notice(frame, area, notice),
        Some(notice) => render_banner(frame, chunks[1], notice),
        None => {}
    }
}

/// Centered block of fixed height used by the form screens.
pub(super) fn centered_rows(area: Rect, height: u16) -> Rect {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    chunks[1]
}

pub(super) fn title_line() -> Line<'static> {
    Line::from(Span::styled(TITLE, Style::default().fg(Color::Cyan).bold()))
}

pub(super) fn input_line<'a>(label: &'a str, value: &'a str, active: bool) -> Line<'a> {
    let cursor = if active { "_" } else { "" };
    Line::from(vec![
        Span::styled(label, Style::default().fg(Color::White)),
        Span::styled(value, Style::default().fg(Color::Yellow)),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ])
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &Notice) {
    let width = area.width.saturating_sub(4).clamp(20, 70).min(area.width);
    let height = 7.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let content = vec![
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error ")
                .title_style(Style::default().fg(Color::Red).bold())
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(Clear, popup);
    frame.render_widget(widget, popup);
}

fn render_banner(frame: &mut Frame, area: Rect, notice: &Notice) {
    let widget = Paragraph::new(format!("! {}", notice.message))
        .alignment(Alignment::Center)
        .fg(Color::Yellow);
    frame.render_widget(widget, area);
}
