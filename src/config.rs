//! Runtime configuration of the client.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::flow::{FlowSettings, MAX_PLAYERS_LIMIT};

/// Backend address used when none is given.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";
/// Environment variable that overrides [`DEFAULT_SERVER_URL`].
pub const SERVER_URL_ENV: &str = "QUIZ_SERVER_URL";
/// Environment variable naming the log file.
pub const LOG_FILE_ENV: &str = "QUIZ_LOG_FILE";
/// Request timeout used when none is given. Quiz generation goes through an
/// LLM on the backend and routinely takes tens of seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 90;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server address `{url}`")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server address `{0}` must be an http or https URL")]
    UnsupportedScheme(String),
    #[error("max players must be between 1 and {MAX_PLAYERS_LIMIT}, got {0}")]
    MaxPlayers(u8),
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
}

/// Validated settings for one client run.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: Url,
    pub request_timeout: Duration,
    pub flow: FlowSettings,
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(server: &str, max_players: u8, timeout_secs: u64) -> Result<Self, ConfigError> {
        let server_url = parse_server_url(server)?;

        if !(1..=MAX_PLAYERS_LIMIT).contains(&max_players) {
            return Err(ConfigError::MaxPlayers(max_players));
        }
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(Self {
            server_url,
            request_timeout: Duration::from_secs(timeout_secs),
            flow: FlowSettings {
                max_players,
                ..FlowSettings::default()
            },
            log_file: None,
        })
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path.filter(|p| !p.as_os_str().is_empty());
        self
    }
}

fn parse_server_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_backend() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL, 2, DEFAULT_TIMEOUT_SECS).unwrap();
        assert_eq!(config.server_url.as_str(), "http://localhost:5000/");
        assert_eq!(config.flow.max_players, 2);
        assert_eq!(config.flow.round_seconds, 30);
        assert_eq!(config.flow.feedback_pause, Duration::from_millis(1500));
    }

    #[test]
    fn test_new_validates_inputs() {
        let config = ClientConfig::new("https://quiz.example/api/", 4, 30).unwrap();
        assert_eq!(config.flow.max_players, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(30));

        assert!(matches!(
            ClientConfig::new("not a url", 2, 30),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://quiz.example", 2, 30),
            Err(ConfigError::UnsupportedScheme(_))
        ));
        assert!(matches!(
            ClientConfig::new(DEFAULT_SERVER_URL, 0, 30),
            Err(ConfigError::MaxPlayers(0))
        ));
        assert!(matches!(
            ClientConfig::new(DEFAULT_SERVER_URL, MAX_PLAYERS_LIMIT + 1, 30),
            Err(ConfigError::MaxPlayers(_))
        ));
        assert!(matches!(
            ClientConfig::new(DEFAULT_SERVER_URL, 2, 0),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn test_empty_log_path_is_ignored() {
        let config = ClientConfig::new(DEFAULT_SERVER_URL, 2, DEFAULT_TIMEOUT_SECS)
            .unwrap()
            .with_log_file(Some(PathBuf::new()));
        assert!(config.log_file.is_none());
    }
}
