// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance console: administration and check-in client for the
//! attendance-tracking API.
//!
//! This crate provides the live rotating check-in QR code, manual attendance
//! entry, event management and attendance reports on top of the REST API.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::{AppError, Result};
use services::{ApiClient, Session, SessionStore};

/// Shared state handed to every command.
pub struct AppState {
    pub config: Config,
    pub sessions: Box<dyn SessionStore>,
    /// Session restored at startup
    pub session: Option<Session>,
}

impl AppState {
    /// Restore the persisted session from `sessions`.
    pub fn load(config: Config, sessions: Box<dyn SessionStore>) -> Result<Self> {
        let session = sessions.load()?;
        match &session {
            Some(s) => tracing::debug!(user_id = s.user.id, "Session restored"),
            None => tracing::debug!("No stored session"),
        }
        Ok(Self {
            config,
            sessions,
            session,
        })
    }

    /// API client authenticated with the current session.
    ///
    /// Fails with [`AppError::Unauthorized`] when nobody is logged in.
    pub fn api(&self) -> Result<ApiClient> {
        let session = self.session.as_ref().ok_or(AppError::Unauthorized)?;
        ApiClient::new(&self.config, Some(session))
    }
}
