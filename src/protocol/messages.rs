//! Request and response bodies of the quiz backend's HTTP API.
//!
//! All bodies are JSON. Field names follow the backend exactly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::{PlayerId, PlayerProgress, Question, QuestionError, SessionCode, SessionStatus};

/// Label the backend itself uses for a player with no recorded answers.
pub const UNKNOWN_TRAIT: &str = "unknown";

/// Body of `POST /create-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub max_players: u8,
}

/// Reply to `POST /create-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_code: SessionCode,
}

/// Body of `POST /join-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSessionRequest {
    pub name: String,
    pub session_code: SessionCode,
}

/// Reply to `POST /join-session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSessionResponse {
    pub player_id: PlayerId,
}

/// Body of `POST /generate-quiz`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizRequest {
    pub topic: String,
}

/// One question as served by `/generate-quiz` and `/get-quiz/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl TryFrom<WireQuestion> for Question {
    type Error = QuestionError;

    fn try_from(value: WireQuestion) -> Result<Self, Self::Error> {
        Question::new(value.question, value.options, value.answer)
    }
}

/// Body of `POST /submit-answer`. A `null` answer means the player timed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub player_id: PlayerId,
    pub answer: Option<String>,
}

/// Reply to `POST /submit-answer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Reply to `GET /results/{code}`: player name to trait, in document order.
pub type ResultsResponse = IndexMap<String, Option<String>>;

/// Replace `null` traits with the backend's own fallback label.
pub fn resolve_traits(raw: ResultsResponse) -> IndexMap<String, String> {
    raw.into_iter()
        .map(|(player, trait_name)| {
            (
                player,
                trait_name.unwrap_or_else(|| UNKNOWN_TRAIT.to_string()),
            )
        })
        .collect()
}

/// Per-player entry of `GET /session-status/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePlayerStatus {
    pub name: String,
    pub completed: bool,
}

/// Reply to `GET /session-status/{code}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatusResponse {
    pub players: Vec<WirePlayerStatus>,
    pub all_done: bool,
}

impl From<SessionStatusResponse> for SessionStatus {
    fn from(value: SessionStatusResponse) -> Self {
        Self {
            players: value
                .players
                .into_iter()
                .map(|p| PlayerProgress {
                    name: p.name,
                    completed: p.completed,
                })
                .collect(),
            all_done: value.all_done,
        }
    }
}

/// Error body the backend returns alongside non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_answer_timeout_serializes_null() {
        let body = SubmitAnswerRequest {
            player_id: PlayerId::Number(3),
            answer: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"player_id":3,"answer":null}"#);
    }

    #[test]
    fn test_results_keep_document_order() {
        let raw: ResultsResponse =
            serde_json::from_str(r#"{"zoe":"Paris","adam":null,"mia":"Rome"}"#).unwrap();
        let resolved = resolve_traits(raw);

        let players: Vec<_> = resolved.keys().map(String::as_str).collect();
        assert_eq!(players, ["zoe", "adam", "mia"]);
        assert_eq!(resolved["adam"], UNKNOWN_TRAIT);
    }

    #[test]
    fn test_wire_question_is_validated() {
        let wire = WireQuestion {
            question: "Largest planet?".to_string(),
            options: vec!["Mars".to_string(), "Jupiter".to_string()],
            answer: "Saturn".to_string(),
        };
        assert!(Question::try_from(wire).is_err());
    }

    #[test]
    fn test_join_response_accepts_backend_shape() {
        let reply: JoinSessionResponse =
            serde_json::from_str(r#"{"player_id": 7, "session_id": 2}"#).unwrap();
        assert_eq!(reply.player_id, PlayerId::Number(7));

        let reply: JoinSessionResponse =
            serde_json::from_str(r#"{"player_id": "p-7"}"#).unwrap();
        assert_eq!(reply.player_id, PlayerId::Text("p-7".to_string()));
    }
}
