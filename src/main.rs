use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use quizline::config::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_SECS, LOG_FILE_ENV, SERVER_URL_ENV};
use quizline::{ClientConfig, QuizClient};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base address of the quiz backend
    #[arg(short, long, env = SERVER_URL_ENV, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Player limit proposed when creating a session (1-8)
    #[arg(short, long, default_value_t = 2)]
    max_players: u8,

    /// Request timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Write logs to this file (the terminal is taken by the UI)
    #[arg(short, long, env = LOG_FILE_ENV)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ClientConfig::new(&args.server, args.max_players, args.timeout)
        .context("invalid configuration")?
        .with_log_file(args.log_file);

    if let Some(path) = &config.log_file {
        init_tracing(path)?;
    }

    QuizClient::new(config)
        .run()
        .await
        .context("quiz client failed")?;

    Ok(())
}
