// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! QR token lifecycle state machine.
//!
//! [`QrController`] holds the token currently on display for one event and
//! decides when it must be rotated. It performs no I/O: callers issue the
//! request a `begin_*` method asks for and feed the outcome back through the
//! matching `apply_*` method. Request ids make it possible to drop responses
//! that were overtaken by a newer generate/deactivate.

use crate::error::{AppError, Result};
use crate::models::{Id, QrCode};
use chrono::{DateTime, Duration, Utc};

/// Identifier of a generate/deactivate request issued by the controller.
pub type RequestId = u64;

/// Marker for an in-progress `fetch_active` resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    issued_after: RequestId,
}

/// What applying a response did to the controller.
#[derive(Debug)]
pub enum Applied {
    /// State now reflects the response.
    Updated,
    /// Response was overtaken by a newer request and ignored.
    Stale,
    /// The request failed; state is unchanged. Surface to the operator.
    Failed(AppError),
}

/// Display state for one event's check-in code.
#[derive(Debug, Clone)]
pub struct QrController {
    event_id: Id,
    token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    seconds_remaining: i64,

    last_request: RequestId,
    /// Most recent generate or deactivate; only its response is applied.
    latest_mutation: RequestId,
    generate_in_flight: Option<RequestId>,

    retry_delay: Duration,
    retry_not_before: Option<DateTime<Utc>>,
}

impl QrController {
    /// Create an inactive controller.
    ///
    /// `retry_delay` is the minimum wait before an automatic regeneration is
    /// retried after it failed.
    pub fn new(event_id: Id, retry_delay: std::time::Duration) -> Self {
        Self {
            event_id,
            token: None,
            expires_at: None,
            active: false,
            seconds_remaining: 0,
            last_request: 0,
            latest_mutation: 0,
            generate_in_flight: None,
            retry_delay: Duration::from_std(retry_delay).unwrap_or_else(|_| Duration::seconds(5)),
            retry_not_before: None,
        }
    }

    pub fn event_id(&self) -> Id {
        self.event_id
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn seconds_remaining(&self) -> i64 {
        self.seconds_remaining
    }

    /// Whether a generate request is outstanding.
    pub fn is_generating(&self) -> bool {
        self.generate_in_flight.is_some()
    }

    // ─── fetch_active ────────────────────────────────────────────────────────

    /// Start a resync against the server's active code.
    pub fn begin_fetch_active(&self) -> FetchTicket {
        FetchTicket {
            issued_after: self.latest_mutation,
        }
    }

    /// Apply the result of `GET /qr/active`.
    ///
    /// Any failure, including "no active code", leaves the controller
    /// inactive. The result is dropped if a generate/deactivate was issued
    /// after the fetch started or is still pending, since the server state
    /// it describes is already out of date.
    pub fn apply_fetch_active(
        &mut self,
        ticket: FetchTicket,
        result: Result<QrCode>,
        now: DateTime<Utc>,
    ) -> Applied {
        if ticket.issued_after != self.latest_mutation || self.generate_in_flight.is_some() {
            return Applied::Stale;
        }

        match result {
            Ok(code) if code.is_active => {
                self.show(code, now);
            }
            Ok(_) => {
                tracing::debug!(event_id = self.event_id, "Server returned an inactive QR code");
                self.hide();
            }
            Err(e) => {
                tracing::debug!(event_id = self.event_id, error = %e, "No active QR code");
                self.hide();
            }
        }
        Applied::Updated
    }

    // ─── generate ────────────────────────────────────────────────────────────

    /// Start a generate request, unless one is already in flight.
    pub fn begin_generate(&mut self) -> Option<RequestId> {
        if self.generate_in_flight.is_some() {
            tracing::debug!(event_id = self.event_id, "Generate already in flight, skipping");
            return None;
        }
        let id = self.next_request_id();
        self.latest_mutation = id;
        self.generate_in_flight = Some(id);
        Some(id)
    }

    /// Apply the result of `POST /qr/generate`.
    pub fn apply_generate(
        &mut self,
        id: RequestId,
        result: Result<QrCode>,
        now: DateTime<Utc>,
    ) -> Applied {
        if self.generate_in_flight == Some(id) {
            self.generate_in_flight = None;
        }
        if id != self.latest_mutation {
            tracing::debug!(event_id = self.event_id, request = id, "Dropping stale generate response");
            return Applied::Stale;
        }

        match result {
            Ok(code) => {
                // A code that is already lapsed (clock skew) paces the next
                // rotation like a failure would.
                self.retry_not_before = if code.expires_at <= now {
                    tracing::warn!(
                        event_id = self.event_id,
                        expires_at = %code.expires_at,
                        "Server issued an already expired QR code"
                    );
                    Some(now + self.retry_delay)
                } else {
                    None
                };
                self.show(code, now);
                tracing::info!(
                    event_id = self.event_id,
                    expires_at = %self.expires_at.unwrap_or(now),
                    "QR code issued"
                );
                Applied::Updated
            }
            Err(e) => {
                self.retry_not_before = Some(now + self.retry_delay);
                tracing::warn!(event_id = self.event_id, error = %e, "Failed to generate QR code");
                Applied::Failed(e)
            }
        }
    }

    // ─── deactivate ──────────────────────────────────────────────────────────

    /// Start a deactivate request. Supersedes any pending generate.
    pub fn begin_deactivate(&mut self) -> RequestId {
        let id = self.next_request_id();
        self.latest_mutation = id;
        // The superseded generate's response will be dropped as stale.
        self.generate_in_flight = None;
        id
    }

    /// Apply the result of `POST /qr/deactivate`.
    pub fn apply_deactivate(&mut self, id: RequestId, result: Result<()>) -> Applied {
        if id != self.latest_mutation {
            return Applied::Stale;
        }

        match result {
            Ok(()) => {
                self.hide();
                self.retry_not_before = None;
                tracing::info!(event_id = self.event_id, "QR code deactivated");
                Applied::Updated
            }
            Err(e) => {
                tracing::warn!(event_id = self.event_id, error = %e, "Failed to deactivate QR code");
                Applied::Failed(e)
            }
        }
    }

    // ─── tick ────────────────────────────────────────────────────────────────

    /// Recompute the countdown. Returns a request id when the displayed code
    /// has lapsed and a replacement must be generated.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<RequestId> {
        self.recompute(now);

        if !self.active || self.expires_at.is_none() || self.seconds_remaining > 0 {
            return None;
        }
        if let Some(not_before) = self.retry_not_before {
            if now < not_before {
                return None;
            }
        }

        let id = self.begin_generate()?;
        tracing::debug!(event_id = self.event_id, request = id, "QR code lapsed, rotating");
        Some(id)
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        self.seconds_remaining = match (self.active, self.expires_at) {
            (true, Some(expires_at)) => seconds_until(expires_at, now),
            _ => 0,
        };
    }

    fn show(&mut self, code: QrCode, now: DateTime<Utc>) {
        self.token = Some(code.qr_token);
        self.expires_at = Some(code.expires_at);
        self.active = true;
        self.recompute(now);
    }

    fn hide(&mut self) {
        self.token = None;
        self.expires_at = None;
        self.active = false;
        self.seconds_remaining = 0;
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request += 1;
        self.last_request
    }
}

/// Whole seconds from `now` until `expires_at`, floored, never negative.
pub fn seconds_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expires_at - now).num_milliseconds().div_euclid(1000).max(0)
}
