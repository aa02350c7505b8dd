//! Results screen for the client.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::flow::{QuizFlow, ResultBoard};
use crate::models::{LeaderboardEntry, SessionStatus};

/// Render the results screen.
pub fn render(frame: &mut Frame, area: Rect, board: &ResultBoard, flow: &QuizFlow) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // Score summary
        Constraint::Min(6),    // Leaderboard
        Constraint::Length(3), // Session status
        Constraint::Length(2), // Controls
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[0], board.score, board.question_count);
    render_leaderboard(frame, chunks[1], board, flow.player_name());
    render_status(frame, chunks[2], board.status.as_ref(), board.loading);
    render_controls(frame, chunks[3]);
}

fn render_score_summary(frame: &mut Frame, area: Rect, score: u32, total: usize) {
    let (verdict, color) = verdict(score, total);

    let summary = Text::from(vec![
        Line::from(""),
        Line::from("Quiz complete").cyan().bold(),
        Line::from(vec![
            Span::raw("You answered "),
            Span::styled(score.to_string(), Style::default().fg(color).bold()),
            Span::raw(format!(" of {} correctly", total)),
        ]),
        Line::from(verdict).fg(color),
    ]);

    let widget = Paragraph::new(summary).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, area);
}

/// Short remark and colour for a final score.
fn verdict(score: u32, total: usize) -> (&'static str, Color) {
    if total == 0 {
        return ("No questions were played", Color::DarkGray);
    }

    // Compare as fractions so no rounding creeps in.
    let score = score as usize * 10;
    if score >= total * 9 {
        ("Outstanding", Color::Green)
    } else if score >= total * 7 {
        ("Well played", Color::Cyan)
    } else if score >= total * 5 {
        ("Not bad", Color::Yellow)
    } else {
        ("Better luck next time", Color::Red)
    }
}

fn render_leaderboard(frame: &mut Frame, area: Rect, board: &ResultBoard, you: &str) {
    let lines: Vec<Line> = match &board.leaderboard {
        None if board.loading => vec![Line::from(Span::styled(
            "Loading results...",
            Style::default().fg(Color::Yellow),
        ))],
        None => vec![Line::from(Span::styled(
            "Results unavailable. Press [r] to retry.",
            Style::default().fg(Color::Red),
        ))],
        Some(entries) if entries.is_empty() => vec![Line::from(Span::styled(
            "No results yet.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(entries) => entries
            .iter()
            .enumerate()
            .map(|(i, entry)| leaderboard_line(i, entry, you))
            .collect(),
    };

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Leaderboard ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((board.scroll as u16, 0));

    frame.render_widget(widget, area);
}

fn leaderboard_line<'a>(index: usize, entry: &'a LeaderboardEntry, you: &str) -> Line<'a> {
    let is_you = entry.player == you;
    let you_marker = if is_you { " <- You" } else { "" };

    Line::from(vec![
        Span::styled(
            format!("  {:2}. ", index + 1),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{:<20}", entry.player),
            if is_you {
                Style::default().fg(Color::Green).bold()
            } else {
                Style::default().fg(Color::White)
            },
        ),
        Span::styled(entry.trait_name.as_str(), Style::default().fg(Color::Yellow)),
        Span::styled(you_marker, Style::default().fg(Color::Green)),
    ])
}

fn render_status(frame: &mut Frame, area: Rect, status: Option<&SessionStatus>, loading: bool) {
    let line = match status {
        Some(status) if status.all_done => Line::from(Span::styled(
            "Everyone has finished.",
            Style::default().fg(Color::Green),
        )),
        Some(status) => {
            let waiting: Vec<&str> = status
                .players
                .iter()
                .filter(|p| !p.completed)
                .map(|p| p.name.as_str())
                .collect();
            Line::from(Span::styled(
                format!(
                    "{} of {} finished. Waiting for {}.",
                    status.completed_count(),
                    status.players.len(),
                    waiting.join(", ")
                ),
                Style::default().fg(Color::Yellow),
            ))
        }
        None if loading => Line::from(""),
        None => Line::from(Span::styled(
            "Session status unavailable.",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let widget = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r refresh  ·  n new game  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
