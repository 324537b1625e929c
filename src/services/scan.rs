// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Check-in landing flow.
//!
//! A scanned QR code is a URL of the form `{frontend}/attendance?token=...`.
//! The token is extracted and presented to `POST /attendance/mark`.

use crate::error::{AppError, Result};
use crate::services::api::ApiClient;
use qrcode::render::unicode::Dense1x2;
use qrcode::QrCode as QrMatrix;
use reqwest::Url;

/// Result of handling a scanned URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Attendance recorded.
    Confirmed,
    /// The URL carried no token; nothing was sent.
    NoToken,
    /// The server rejected the check-in or could not be reached.
    Failed(String),
}

/// Build the check-in URL encoded into a QR image.
pub fn scan_url(frontend_url: &str, token: &str) -> String {
    format!(
        "{}/attendance?token={}",
        frontend_url.trim_end_matches('/'),
        urlencoding::encode(token)
    )
}

/// Render `url` as a QR code drawn with half-block characters, two modules
/// per character row, light-on-dark so it scans from a dark terminal.
pub fn render_terminal_qr(url: &str) -> Result<String> {
    let matrix = QrMatrix::new(url.as_bytes()).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("Failed to encode QR code: {}", e))
    })?;

    Ok(matrix
        .render::<Dense1x2>()
        .dark_color(Dense1x2::Light)
        .light_color(Dense1x2::Dark)
        .quiet_zone(true)
        .build())
}

/// Extract a non-empty `token` query parameter from a scanned URL.
///
/// Bare query strings (`?token=...` or `token=...`) are accepted too.
pub fn token_from_url(scanned: &str) -> Option<String> {
    let scanned = scanned.trim();
    let url = Url::parse(scanned).or_else(|_| {
        let query = scanned.trim_start_matches('?');
        Url::parse(&format!("http://scan.invalid/?{}", query))
    });

    url.ok()?
        .query_pairs()
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Handle a scanned URL: mark attendance when it carries a token.
pub async fn handle_scan(api: &ApiClient, scanned: &str) -> ScanOutcome {
    let Some(token) = token_from_url(scanned) else {
        tracing::info!("Scanned URL has no QR token");
        return ScanOutcome::NoToken;
    };

    match api.mark_attendance(&token).await {
        Ok(()) => {
            tracing::info!("Attendance marked from QR scan");
            ScanOutcome::Confirmed
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to mark attendance");
            let message = match e {
                AppError::Transport(_) | AppError::Decode(_) | AppError::Internal(_) => {
                    "Failed to mark attendance".to_string()
                }
                other => other.user_message(),
            };
            ScanOutcome::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_full_url() {
        let url = "http://localhost:5173/attendance?token=abc123";
        assert_eq!(token_from_url(url).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_token_from_bare_query() {
        assert_eq!(token_from_url("?token=xyz").as_deref(), Some("xyz"));
        assert_eq!(token_from_url("foo=1&token=xyz").as_deref(), Some("xyz"));
    }

    #[test]
    fn test_missing_or_empty_token() {
        assert_eq!(token_from_url("http://localhost:5173/attendance"), None);
        assert_eq!(token_from_url("http://localhost:5173/attendance?token="), None);
        assert_eq!(token_from_url("http://localhost:5173/attendance?tok=1"), None);
    }

    #[test]
    fn test_scan_url_encodes_token() {
        let url = scan_url("https://checkin.example.com/", "a+b/c=");
        assert_eq!(url, "https://checkin.example.com/attendance?token=a%2Bb%2Fc%3D");
        assert_eq!(token_from_url(&url).as_deref(), Some("a+b/c="));
    }

    #[test]
    fn test_render_terminal_qr_is_square_block() {
        let url = scan_url("http://localhost:5173", "4f0c2a9e-7d1b-4f7e-9a55-1c2d3e4f5a6b");
        let image = render_terminal_qr(&url).unwrap();

        let lines: Vec<&str> = image.lines().collect();
        let width = lines[0].chars().count();
        assert!(lines.len() > 10);
        assert!(lines.iter().all(|l| l.chars().count() == width));
        // Two modules per row: roughly half as many lines as columns.
        assert!(lines.len() * 2 >= width && lines.len() * 2 <= width + 2);
    }

    #[test]
    fn test_render_terminal_qr_changes_with_token() {
        let a = render_terminal_qr(&scan_url("http://localhost:5173", "token-a")).unwrap();
        let b = render_terminal_qr(&scan_url("http://localhost:5173", "token-b")).unwrap();
        assert_ne!(a, b);
    }
}
