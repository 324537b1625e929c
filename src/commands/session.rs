//! `login`, `logout` and `whoami`.

use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::Session;
use crate::AppState;
use std::fs;
use std::path::Path;

/// Persist credentials together with the profile read from `profile_path`.
pub fn login(
    state: &mut AppState,
    token: String,
    refresh_token: String,
    profile_path: &Path,
) -> Result<()> {
    let data = fs::read_to_string(profile_path).map_err(|e| {
        AppError::InvalidInput(format!("cannot read {}: {}", profile_path.display(), e))
    })?;
    let user: User = serde_json::from_str(&data)
        .map_err(|e| AppError::InvalidInput(format!("invalid user profile: {}", e)))?;

    if token.trim().is_empty() {
        return Err(AppError::InvalidInput("token must not be empty".to_string()));
    }

    let session = Session {
        token: token.trim().to_string(),
        refresh_token: refresh_token.trim().to_string(),
        user,
    };
    state.sessions.save(&session)?;
    tracing::info!(user_id = session.user.id, "Logged in");
    println!("Logged in as {} <{}>", session.user.display_name(), session.user.email);
    state.session = Some(session);
    Ok(())
}

pub fn logout(state: &mut AppState) -> Result<()> {
    state.sessions.clear()?;
    state.session = None;
    tracing::info!("Logged out");
    println!("Logged out");
    Ok(())
}

pub fn whoami(state: &AppState) -> Result<()> {
    let session = state.session.as_ref().ok_or(AppError::Unauthorized)?;
    let user = &session.user;
    println!("{} <{}>", user.display_name(), user.email);
    println!("  id:   {}", user.id);
    println!("  role: {:?}", user.role);
    Ok(())
}
