//! # quizline
//!
//! A terminal client for a multiplayer timed quiz.
//!
//! Players create or join a session on the quiz backend, answer the same
//! timed multiple-choice questions and finish on a shared leaderboard.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quizline::{ClientConfig, QuizClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:5000", 2, 90)?;
//!
//!     // Take over the terminal until the player quits
//!     QuizClient::new(config).run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! The [`flow::QuizFlow`] engine does not touch the terminal and can be
//! driven directly against any [`gateway::SessionGateway`].

mod client;
pub mod config;
pub mod flow;
pub mod gateway;
pub mod models;
pub mod protocol;
pub mod terminal;

use std::io;

use thiserror::Error;

pub use config::{ClientConfig, ConfigError};
pub use flow::{FlowError, QuizFlow};
pub use gateway::{GatewayError, HttpGateway, SessionGateway};
pub use models::{LeaderboardEntry, Player, PlayerId, Question, Session, SessionCode};

/// Error type for a terminal client run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Terminal setup, drawing or input failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A quiz client that can be run in the terminal.
pub struct QuizClient {
    config: ClientConfig,
}

impl QuizClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run the client in the terminal.
    ///
    /// This takes over the terminal, shows the quiz screens and returns when
    /// the player quits.
    pub async fn run(self) -> Result<(), ClientError> {
        client::run(&self.config).await
    }
}
