//! Terminal loop driving the quiz flow.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::ClientError;
use crate::config::ClientConfig;
use crate::flow::{FlowEvent, Mode, QuizFlow};
use crate::gateway::HttpGateway;
use crate::terminal::{AppTerminal, TerminalSession};

use super::ui;

/// How long to wait for a key before looking at engine events again.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Run the quiz client until the player quits.
pub async fn run(config: &ClientConfig) -> Result<(), ClientError> {
    let gateway = HttpGateway::new(config.server_url.clone(), config.request_timeout)?;
    let server = gateway.base_url().to_string();
    info!(%server, "starting quiz client");

    let (mut flow, mut events) = QuizFlow::new(Arc::new(gateway), config.flow.clone());

    let mut session = TerminalSession::enter()?;
    let result = event_loop(session.terminal(), &mut flow, &mut events, &server);
    drop(session);

    info!("quiz client stopped");
    result
}

fn event_loop(
    terminal: &mut AppTerminal,
    flow: &mut QuizFlow,
    events: &mut UnboundedReceiver<FlowEvent>,
    server: &str,
) -> Result<(), ClientError> {
    loop {
        while let Ok(event) = events.try_recv() {
            flow.handle(event);
        }

        terminal.draw(|frame| ui::render(frame, flow, server))?;

        if event::poll(INPUT_POLL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if handle_input(flow, key) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Returns true if the client should exit.
fn handle_input(flow: &mut QuizFlow, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if flow.notice().is_some_and(|notice| notice.is_blocking()) {
        flow.dismiss_notice();
        return false;
    }

    match flow.mode() {
        Mode::ChooseRole(_) => handle_role_input(flow, key.code),
        Mode::Creating(_) => handle_create_input(flow, key.code),
        Mode::Joining(_) => handle_join_input(flow, key.code),
        Mode::InQuiz(_) => handle_quiz_input(flow, key.code),
        Mode::Result(_) => handle_result_input(flow, key.code),
    }
}

fn confirm(flow: &mut QuizFlow) {
    if let Err(err) = flow.confirm() {
        debug!(error = %err, "confirm rejected");
    }
}

fn handle_role_input(flow: &mut QuizFlow, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right | KeyCode::Up
        | KeyCode::Down => flow.toggle_role(),
        KeyCode::Enter => confirm(flow),
        KeyCode::Backspace => flow.input_backspace(),
        KeyCode::Char(c) => flow.input_char(c),
        _ => {}
    }
    false
}

fn handle_create_input(flow: &mut QuizFlow, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc => flow.back(),
        KeyCode::Enter => confirm(flow),
        KeyCode::Up => flow.adjust_max_players(1),
        KeyCode::Down => flow.adjust_max_players(-1),
        KeyCode::Backspace => flow.input_backspace(),
        KeyCode::Char(c) => flow.input_char(c),
        _ => {}
    }
    false
}

fn handle_join_input(flow: &mut QuizFlow, key: KeyCode) -> bool {
    match key {
        KeyCode::Esc => flow.back(),
        KeyCode::Enter => confirm(flow),
        KeyCode::Backspace => flow.input_backspace(),
        KeyCode::Char(c) => flow.input_char(c),
        _ => {}
    }
    false
}

fn handle_quiz_input(flow: &mut QuizFlow, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => flow.move_highlight(-1),
        KeyCode::Down | KeyCode::Char('j') => flow.move_highlight(1),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                flow.highlight(digit as usize - 1);
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            flow.submit_highlighted();
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

fn handle_result_input(flow: &mut QuizFlow, key: KeyCode) -> bool {
    match key {
        KeyCode::Down | KeyCode::Char('j') => flow.scroll_results(1),
        KeyCode::Up | KeyCode::Char('k') => flow.scroll_results(-1),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if let Err(err) = flow.refresh_results() {
                debug!(error = %err, "refresh rejected");
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => flow.reset(),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
        _ => {}
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::FlowSettings;
    use crate::gateway::MockSessionGateway;

    fn flow() -> QuizFlow {
        let (flow, _events) = QuizFlow::new(
            Arc::new(MockSessionGateway::new()),
            FlowSettings::default(),
        );
        flow
    }

    fn press(flow: &mut QuizFlow, code: KeyCode) -> bool {
        handle_input(flow, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_letters_go_into_the_name_field() {
        let mut flow = flow();
        assert!(!press(&mut flow, KeyCode::Char('q')));
        assert!(!press(&mut flow, KeyCode::Char('j')));

        let Mode::ChooseRole(form) = flow.mode() else {
            panic!("expected the role screen");
        };
        assert_eq!(form.name, "qj");
    }

    #[test]
    fn test_blocking_notice_swallows_next_key() {
        let mut flow = flow();
        press(&mut flow, KeyCode::Enter);
        assert!(flow.notice().is_some());

        assert!(!press(&mut flow, KeyCode::Esc));
        assert!(flow.notice().is_none());
        assert!(press(&mut flow, KeyCode::Esc));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let mut flow = flow();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(handle_input(&mut flow, key));
    }

    #[test]
    fn test_escape_leaves_join_form() {
        let mut flow = flow();
        for c in "Ada".chars() {
            press(&mut flow, KeyCode::Char(c));
        }
        press(&mut flow, KeyCode::Tab);
        press(&mut flow, KeyCode::Enter);
        assert!(matches!(flow.mode(), Mode::Joining(_)));

        assert!(!press(&mut flow, KeyCode::Esc));
        assert!(matches!(flow.mode(), Mode::ChooseRole(_)));
    }
}
