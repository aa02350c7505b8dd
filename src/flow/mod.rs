//! Quiz flow: the client-side state machine and its timer.

mod countdown;
mod engine;
mod event;
mod results;
mod state;

pub use countdown::Countdown;
pub use engine::{FlowError, FlowSettings, MAX_PLAYERS_LIMIT, QuizFlow, ValidationError};
pub use event::{FlowEvent, Lineup, Token};
pub use results::leaderboard;
pub use state::{
    CODE_MAX_LENGTH, CreateForm, JoinForm, Mode, NAME_MAX_LENGTH, Notice, ResultBoard, Role,
    RoleForm, RoundState, Severity, TOPIC_MAX_LENGTH,
};
