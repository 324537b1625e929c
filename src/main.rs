// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance console entry point.

use attendance_console::{
    cli::Cli,
    commands,
    config::Config,
    services::FileSessionStore,
    AppState,
};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url);
    }
    if let Some(path) = &cli.session_file {
        config.session_file = path.clone();
    }
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let sessions = Box::new(FileSessionStore::new(&config.session_file));
    let mut state = AppState::load(config, sessions)?;

    if let Err(e) = commands::dispatch(&mut state, cli.command).await {
        tracing::debug!(error = %e, kind = ?e.kind(), "Command failed");
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

/// Initialize logging on stderr; JSON when requested.
fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("attendance_console=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
