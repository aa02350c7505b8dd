//! Domain types shared by the gateway, the flow engine and the screens.

mod question;
mod session;

pub use question::{MIN_OPTIONS, Question, QuestionError};
pub use session::{Player, PlayerId, PlayerProgress, Session, SessionCode, SessionStatus};

/// One row of the end-of-game board: a player and the trait the backend assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub player: String,
    pub trait_name: String,
}
