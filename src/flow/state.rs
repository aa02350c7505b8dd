//! Engine modes and the per-mode state they carry.

use std::error::Error;

use crate::models::{LeaderboardEntry, SessionStatus};

/// Longest player name accepted, matching the backend column width.
pub const NAME_MAX_LENGTH: usize = 50;
/// Longest quiz topic accepted.
pub const TOPIC_MAX_LENGTH: usize = 80;
/// Longest session code accepted, matching the backend column width.
pub const CODE_MAX_LENGTH: usize = 8;

/// Whether the player starts a new session or joins an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Create,
    Join,
}

impl Role {
    pub fn toggled(self) -> Self {
        match self {
            Role::Create => Role::Join,
            Role::Join => Role::Create,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleForm {
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub topic: String,
    pub max_players: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinForm {
    pub code: String,
}

/// Progress through the question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    pub current_index: usize,
    /// Seconds left on the current question.
    pub countdown: u32,
    /// What was locked in for the current question; `None` with feedback shown means a timeout.
    pub selected_answer: Option<String>,
    /// True only during the pause after an answer or timeout.
    pub feedback_visible: bool,
    pub score: u32,
    /// Option under the cursor. Display only.
    pub highlighted: usize,
}

impl RoundState {
    pub fn new(round_seconds: u32) -> Self {
        Self {
            current_index: 0,
            countdown: round_seconds,
            selected_answer: None,
            feedback_visible: false,
            score: 0,
            highlighted: 0,
        }
    }

    /// Move to the next question with a fresh countdown.
    pub fn advance(&mut self, round_seconds: u32) {
        self.current_index += 1;
        self.countdown = round_seconds;
        self.selected_answer = None;
        self.feedback_visible = false;
        self.highlighted = 0;
    }
}

/// End-of-game view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBoard {
    pub score: u32,
    pub question_count: usize,
    /// `None` until the results arrived.
    pub leaderboard: Option<Vec<LeaderboardEntry>>,
    pub status: Option<SessionStatus>,
    pub loading: bool,
    pub scroll: usize,
}

impl ResultBoard {
    pub fn new(score: u32, question_count: usize) -> Self {
        Self {
            score,
            question_count,
            leaderboard: None,
            status: None,
            loading: false,
            scroll: 0,
        }
    }
}

/// The screen the engine is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    ChooseRole(RoleForm),
    Creating(CreateForm),
    Joining(JoinForm),
    InQuiz(RoundState),
    Result(ResultBoard),
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::ChooseRole(_) => "choose-role",
            Mode::Creating(_) => "creating",
            Mode::Joining(_) => "joining",
            Mode::InQuiz(_) => "in-quiz",
            Mode::Result(_) => "result",
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::ChooseRole(RoleForm::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks input until dismissed.
    Error,
    /// Shown as a banner; input keeps flowing.
    Warning,
}

/// A message for the player about a failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn error(err: &dyn Error) -> Self {
        Self {
            severity: Severity::Error,
            message: describe(err),
        }
    }

    pub fn warning(err: &dyn Error) -> Self {
        Self {
            severity: Severity::Warning,
            message: describe(err),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Flatten an error and its sources into one line.
fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, RequestError};
    use reqwest::StatusCode;

    #[test]
    fn test_round_advance_resets_the_round() {
        let mut round = RoundState::new(30);
        round.countdown = 4;
        round.selected_answer = Some("Paris".to_string());
        round.feedback_visible = true;
        round.score = 1;
        round.highlighted = 2;

        round.advance(30);

        assert_eq!(round.current_index, 1);
        assert_eq!(round.countdown, 30);
        assert_eq!(round.selected_answer, None);
        assert!(!round.feedback_visible);
        assert_eq!(round.score, 1);
        assert_eq!(round.highlighted, 0);
    }

    #[test]
    fn test_notice_includes_the_cause() {
        let err = GatewayError::SubmissionFailed(RequestError::Status {
            path: "/submit-answer".to_string(),
            status: StatusCode::BAD_REQUEST,
            message: "Invalid player ID".to_string(),
        });

        let notice = Notice::warning(&err);
        assert!(!notice.is_blocking());
        assert_eq!(
            notice.message,
            "could not submit the answer: `/submit-answer` answered 400 Bad Request: Invalid player ID"
        );
    }

    #[test]
    fn test_role_toggle() {
        assert_eq!(Role::Create.toggled(), Role::Join);
        assert_eq!(Role::Join.toggled(), Role::Create);
    }
}
