// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.
//!
//! Every failure coming out of the REST boundary is normalized into
//! [`AppError`] by the API client, so callers match on [`ErrorKind`]
//! instead of probing response shapes.

/// Application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Not permitted: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Operation(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Coarse classification used by the console to decide how a failure is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested thing does not exist right now (e.g. no active QR).
    /// Expected; rendered as a state, not an error.
    NoActiveResource,
    /// Network or server failure. Logged, shown as a message, retryable.
    RequestFailure,
    /// Rejected input, either client-side or by the server.
    InvalidInput,
}

impl AppError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NoActiveResource,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
            AppError::Api { status, .. } if matches!(status, 400 | 422) => ErrorKind::InvalidInput,
            _ => ErrorKind::RequestFailure,
        }
    }

    /// Message suitable for showing to the operator.
    ///
    /// Server-provided messages are passed through; transport details are not.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api { message, .. } if !message.is_empty() => message.clone(),
            AppError::Forbidden(msg)
            | AppError::InvalidInput(msg)
            | AppError::Operation(msg)
            | AppError::Session(msg) => msg.clone(),
            AppError::Unauthorized => "Not logged in or session expired".to_string(),
            AppError::NotFound(what) => format!("{} not found", what),
            _ => "Request failed, please retry".to_string(),
        }
    }
}

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, AppError>;
