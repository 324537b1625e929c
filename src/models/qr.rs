// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! QR check-in tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Id;

/// A short-lived check-in token issued by the server for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub qr_token: String,
    pub event_id: Id,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// Response of `POST /qr/deactivate`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeactivateResponse {
    #[serde(default)]
    pub message: String,
    pub event_id: Id,
}
