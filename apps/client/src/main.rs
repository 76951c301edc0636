mod api_client;
mod auth;
mod cli;
mod commands;
mod config;
mod errors;
mod generation;
mod models;
mod profile;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env()?;

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(
        "tailor v{} using backend {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let state = AppState::build(config)?;
    commands::run(&state, cli.command).await
}
