// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted login session.
//!
//! The session (access token, refresh token and user profile) is established
//! by `login`, read once at startup and removed by `logout`. Storage is
//! behind [`SessionStore`] so commands receive it explicitly.

use crate::models::User;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Credentials and profile of the logged-in operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub refresh_token: String,
    pub user: User,
}

/// Load/save/clear contract for session persistence.
pub trait SessionStore: Send + Sync {
    /// Read the stored session, if any.
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Replace the stored session.
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove the stored session. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), SessionError>;
}

/// Session stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e.to_string())),
        };

        match serde_json::from_str(&data) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // An unreadable session is treated as logged out.
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                Ok(None)
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::Io(e.to_string()))?;
        }
        let data = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Serialize(e.to_string()))?;
        fs::write(&self.path, data).map_err(|e| SessionError::Io(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e.to_string())),
        }
    }
}

/// In-memory store, for tests and one-shot invocations.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemorySessionStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>, SessionError> {
        self.session
            .lock()
            .map_err(|_| SessionError::Io("session lock poisoned".to_string()))
    }
}

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to access session file: {0}")]
    Io(String),

    #[error("Failed to serialize session: {0}")]
    Serialize(String),
}

impl From<SessionError> for crate::error::AppError {
    fn from(e: SessionError) -> Self {
        crate::error::AppError::Session(e.to_string())
    }
}
