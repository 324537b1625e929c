//! `scan <url>`.

use crate::error::{AppError, Result};
use crate::services::scan::{handle_scan, token_from_url, ScanOutcome};
use crate::AppState;

pub async fn handle(state: &AppState, url: &str) -> Result<()> {
    // No token: report it without touching the network (or the session).
    if token_from_url(url).is_none() {
        return Err(AppError::InvalidInput("No QR token found in URL".to_string()));
    }

    let api = state.api()?;
    match handle_scan(&api, url).await {
        ScanOutcome::Confirmed => {
            println!("Attendance recorded!");
            println!("Your attendance has been successfully marked for this session.");
            Ok(())
        }
        ScanOutcome::NoToken => Err(AppError::InvalidInput(
            "No QR token found in URL".to_string(),
        )),
        ScanOutcome::Failed(message) => Err(AppError::Operation(message)),
    }
}
