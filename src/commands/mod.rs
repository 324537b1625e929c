// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command handlers, one module per command group.

pub mod attendance;
pub mod events;
pub mod qr;
pub mod report;
pub mod scan;
pub mod session;

use crate::cli::Commands;
use crate::error::Result;
use crate::AppState;

/// Run one parsed command.
pub async fn dispatch(state: &mut AppState, command: Commands) -> Result<()> {
    match command {
        Commands::Login {
            token,
            refresh_token,
            profile,
        } => session::login(state, token, refresh_token, &profile),
        Commands::Logout => session::logout(state),
        Commands::Whoami => session::whoami(state),
        Commands::Events(cmd) => events::handle(state, cmd).await,
        Commands::Attendance(cmd) => attendance::handle(state, cmd).await,
        Commands::Qr(cmd) => qr::handle(state, cmd).await,
        Commands::Scan { url } => scan::handle(state, &url).await,
        Commands::Report { json } => report::handle(state, json).await,
    }
}
