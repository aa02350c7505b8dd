//! Messages posted back to the engine by its timers and network tasks.

use indexmap::IndexMap;

use crate::gateway::GatewayError;
use crate::models::{Player, Question, Session, SessionStatus};

/// Generation stamp attached to every timer and request.
///
/// The engine moves to a new token on each transition that invalidates work
/// in flight, and ignores events carrying any other token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token(u64);

impl Token {
    pub(crate) fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Everything a successful create or join yields.
#[derive(Debug)]
pub struct Lineup {
    pub session: Session,
    pub player: Player,
    pub questions: Vec<Question>,
}

#[derive(Debug)]
pub enum FlowEvent {
    /// One second of the countdown elapsed.
    Tick { token: Token },
    /// Session creation or joining finished.
    SetupFinished {
        token: Token,
        outcome: Result<Lineup, GatewayError>,
    },
    /// The feedback pause elapsed and the answer submission completed.
    RoundClosed {
        token: Token,
        submission: Result<(), GatewayError>,
    },
    /// End-of-game data arrived.
    ResultsFetched {
        token: Token,
        results: Result<IndexMap<String, String>, GatewayError>,
        status: Result<SessionStatus, GatewayError>,
    },
}
