//! Session gateway: the calls the quiz client makes against the backend.
//!
//! Every operation is a single request/response exchange. Nothing is
//! retried; a failure is reported to the caller as the matching
//! [`GatewayError`] variant.

mod http;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{PlayerId, Question, QuestionError, SessionCode, SessionStatus};

pub use http::{HttpGateway, SUBMIT_TIMEOUT};

/// Why a quiz payload was rejected even though it decoded.
#[derive(Debug, Error)]
pub enum QuizContentError {
    #[error("the quiz has no questions")]
    Empty,
    #[error("question {} is invalid", .index + 1)]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
}

/// Transport-level cause behind a [`GatewayError`].
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request never got an HTTP response.
    #[error("could not reach `{path}`")]
    Send {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("`{path}` answered {status}: {message}")]
    Status {
        path: String,
        status: StatusCode,
        message: String,
    },
    /// The body was not the JSON shape we expect.
    #[error("could not decode the reply from `{path}`")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The quiz decoded but breaks the question invariants.
    #[error("the quiz served by `{path}` is unusable")]
    InvalidQuiz {
        path: String,
        #[source]
        source: QuizContentError,
    },
}

/// Failures of the gateway operations, one variant per call.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("could not create a session")]
    SessionCreateFailed(#[source] RequestError),
    #[error("could not join session {code}")]
    JoinFailed {
        code: SessionCode,
        #[source]
        source: RequestError,
    },
    #[error("could not generate a quiz about `{topic}`")]
    QuizGenerationFailed {
        topic: String,
        #[source]
        source: RequestError,
    },
    #[error("could not load the quiz of session {code}")]
    QuizFetchFailed {
        code: SessionCode,
        #[source]
        source: RequestError,
    },
    #[error("could not submit the answer")]
    SubmissionFailed(#[source] RequestError),
    #[error("could not load the results of session {code}")]
    ResultsFetchFailed {
        code: SessionCode,
        #[source]
        source: RequestError,
    },
    #[error("could not load the status of session {code}")]
    StatusFetchFailed {
        code: SessionCode,
        #[source]
        source: RequestError,
    },
}

/// The backend operations the flow engine depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionGateway: Send + Sync {
    /// `POST /create-session`, returning the new session code.
    async fn create_session(&self, max_players: u8) -> Result<SessionCode, GatewayError>;

    /// `POST /join-session`, returning the id the backend assigned to the player.
    async fn join_session(
        &self,
        name: &str,
        code: &SessionCode,
    ) -> Result<PlayerId, GatewayError>;

    /// `POST /generate-quiz`.
    async fn generate_quiz(&self, topic: &str) -> Result<Vec<Question>, GatewayError>;

    /// `GET /get-quiz/{code}`.
    async fn fetch_quiz(&self, code: &SessionCode) -> Result<Vec<Question>, GatewayError>;

    /// `POST /submit-answer`. `None` records a timeout.
    async fn submit_answer(
        &self,
        player: &PlayerId,
        answer: Option<String>,
    ) -> Result<(), GatewayError>;

    /// `GET /results/{code}`: player name to trait, in backend order.
    async fn fetch_results(
        &self,
        code: &SessionCode,
    ) -> Result<IndexMap<String, String>, GatewayError>;

    /// `GET /session-status/{code}`.
    async fn fetch_session_status(
        &self,
        code: &SessionCode,
    ) -> Result<SessionStatus, GatewayError>;
}
