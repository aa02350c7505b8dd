//! Active question screen.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap};

use crate::flow::{QuizFlow, RoundState};
use crate::models::Question;

/// Render the quiz screen.
pub fn render(frame: &mut Frame, area: Rect, round: &RoundState, flow: &QuizFlow) {
    let Some(question) = flow.current_question() else {
        let waiting = Paragraph::new("Waiting for question...")
            .alignment(Alignment::Center)
            .fg(Color::Yellow);
        frame.render_widget(waiting, area);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(2), // Progress
        Constraint::Length(3), // Countdown
        Constraint::Length(6), // Question text
        Constraint::Min(6),    // Options
        Constraint::Length(2), // Feedback / controls
    ])
    .margin(1)
    .split(area);

    render_progress(frame, chunks[0], round, flow);
    render_countdown(frame, chunks[1], round, flow.settings().round_seconds);
    render_question_text(frame, chunks[2], question.text());
    render_options(frame, chunks[3], question, round);

    if round.feedback_visible {
        render_feedback(frame, chunks[4], question, round);
    } else {
        render_controls(frame, chunks[4]);
    }
}

fn render_progress(frame: &mut Frame, area: Rect, round: &RoundState, flow: &QuizFlow) {
    let code = flow
        .session()
        .map(|session| format!("  ·  Session {}", session.code()))
        .unwrap_or_default();

    let progress_text = format!(
        "Question {} of {}  ·  Score {}{}",
        round.current_index + 1,
        flow.question_count(),
        round.score,
        code
    );

    let widget = Paragraph::new(progress_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan).bold());

    frame.render_widget(widget, area);
}

fn render_countdown(frame: &mut Frame, area: Rect, round: &RoundState, round_seconds: u32) {
    let ratio = if round_seconds > 0 {
        (round.countdown as f64 / round_seconds as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let color = match round.countdown {
        0..=5 => Color::Red,
        6..=10 => Color::Yellow,
        _ => Color::Green,
    };

    let widget = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Time ")
                .title_style(Style::default().fg(Color::Cyan)),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(format!("{}s", round.countdown));

    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .padding(Padding::horizontal(1)),
        );

    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &Question, round: &RoundState) {
    let lines: Vec<Line> = question
        .options()
        .iter()
        .enumerate()
        .map(|(i, opt)| {
            let (prefix, style) = option_style(question, round, i, opt);

            Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(format!("{}) ", i + 1), style),
                Span::styled(opt.clone(), style),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Options ")
            .title_style(Style::default().fg(Color::Cyan))
            .padding(Padding::horizontal(1)),
    );

    frame.render_widget(widget, area);
}

fn option_style(
    question: &Question,
    round: &RoundState,
    index: usize,
    option: &str,
) -> (&'static str, Style) {
    if round.feedback_visible {
        let chosen = round.selected_answer.as_deref() == Some(option);
        if option == question.answer() {
            ("+ ", Style::default().fg(Color::Green).bold())
        } else if chosen {
            ("- ", Style::default().fg(Color::Red).bold())
        } else {
            ("  ", Style::default().fg(Color::DarkGray))
        }
    } else if index == round.highlighted {
        ("> ", Style::default().fg(Color::Yellow).bold())
    } else {
        ("  ", Style::default().fg(Color::White))
    }
}

fn render_feedback(frame: &mut Frame, area: Rect, question: &Question, round: &RoundState) {
    let (text, color) = match round.selected_answer.as_deref() {
        None => (
            format!("Time's up! The answer was {}", question.answer()),
            Color::Yellow,
        ),
        Some(selected) if question.is_correct(Some(selected)) => {
            ("Correct!".to_string(), Color::Green)
        }
        Some(_) => (
            format!("Wrong. The answer was {}", question.answer()),
            Color::Red,
        ),
    };

    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color).bold());

    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k, arrows or 1-9 to select  ·  Enter/Space to submit  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);

    frame.render_widget(widget, area);
}
