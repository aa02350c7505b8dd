use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque player identifier handed out by the backend.
///
/// The backend uses integer row ids today; strings are accepted too and are
/// echoed back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlayerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Number(id) => write!(f, "{}", id),
            PlayerId::Text(id) => f.write_str(id),
        }
    }
}

/// Short code identifying one quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionCode(String);

impl SessionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The local player, known once a join succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

/// A created or joined session. There are no setters: the code never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    code: SessionCode,
    max_players: Option<u8>,
}

impl Session {
    /// A session this client created, so the player limit is known.
    pub fn created(code: SessionCode, max_players: u8) -> Self {
        Self {
            code,
            max_players: Some(max_players),
        }
    }

    /// A session joined by code; the limit was chosen by someone else.
    pub fn joined(code: SessionCode) -> Self {
        Self {
            code,
            max_players: None,
        }
    }

    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    pub fn max_players(&self) -> Option<u8> {
        self.max_players
    }
}

/// Completion flag for one player, as reported by the session status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProgress {
    pub name: String,
    pub completed: bool,
}

/// Who in the session has finished answering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub players: Vec<PlayerProgress>,
    pub all_done: bool,
}

impl SessionStatus {
    pub fn completed_count(&self) -> usize {
        self.players.iter().filter(|p| p.completed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_keeps_wire_shape() {
        let numeric: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, PlayerId::Number(42));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");

        let text: PlayerId = serde_json::from_str("\"p-7\"").unwrap();
        assert_eq!(text, PlayerId::Text("p-7".to_string()));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"p-7\"");
        assert_eq!(text.to_string(), "p-7");
    }

    #[test]
    fn test_completed_count() {
        let status = SessionStatus {
            players: vec![
                PlayerProgress {
                    name: "Ada".to_string(),
                    completed: true,
                },
                PlayerProgress {
                    name: "Linus".to_string(),
                    completed: false,
                },
            ],
            all_done: false,
        };
        assert_eq!(status.completed_count(), 1);
    }
}
