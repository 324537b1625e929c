// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Console configuration loaded from the environment (and `.env`).
//!
//! Command-line flags override individual values after loading.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";
const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Console configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the attendance REST API (no trailing slash)
    pub api_url: String,
    /// Origin the check-in page is served from; QR codes point here
    pub frontend_url: String,
    /// Where the persisted session lives
    pub session_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Backstop poll of the active QR while the live view is open
    pub qr_resync_interval: Duration,
    /// Minimum delay between automatic regeneration attempts after a failure
    pub qr_retry_delay: Duration,
    /// Attendance lists fetched in parallel when building a report
    pub report_concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            session_file: default_session_file(),
            http_timeout: Duration::from_secs(15),
            qr_resync_interval: Duration::from_secs(60),
            qr_retry_delay: Duration::from_secs(5),
            report_concurrency: 8,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            api_url: env::var("ATTENDANCE_API_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or(defaults.api_url),
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| trim_base_url(&v))
                .unwrap_or(defaults.frontend_url),
            session_file: env::var("ATTENDANCE_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            http_timeout: secs_var("HTTP_TIMEOUT_SECS")?.unwrap_or(defaults.http_timeout),
            qr_resync_interval: secs_var("QR_RESYNC_SECS")?
                .unwrap_or(defaults.qr_resync_interval),
            qr_retry_delay: secs_var("QR_RETRY_SECS")?.unwrap_or(defaults.qr_retry_delay),
            report_concurrency: match env::var("REPORT_CONCURRENCY") {
                Ok(v) => parse_positive("REPORT_CONCURRENCY", &v)? as usize,
                Err(_) => defaults.report_concurrency,
            },
        })
    }

    /// Override the API base URL.
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = trim_base_url(url);
        self
    }
}

/// Default session location under the per-user config directory.
fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("attendance-console")
        .join("session.json")
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn secs_var(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    match env::var(name) {
        Ok(v) => Ok(Some(Duration::from_secs(parse_positive(name, &v)?))),
        Err(_) => Ok(None),
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} (expected a positive integer)")]
    Invalid { name: &'static str, value: String },
}
