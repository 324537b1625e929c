// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance REST API client.
//!
//! Handles:
//! - Event listing, lookup and creation
//! - Attendance lists, manual entries and QR check-ins
//! - QR issuance, lookup and deactivation
//! - Normalizing every failure into [`AppError`]

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    AttendanceRecord, DeactivateResponse, Event, Id, ManualAttendanceRequest, NewEvent, QrCode,
    User, UserPage,
};
use crate::services::session::Session;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Users fetched for reports in one request.
const USER_PAGE_LIMIT: u32 = 1000;

/// Longest raw body echoed back in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Attendance API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ApiClient {
    /// Create a client for the configured API, authenticated with `session`
    /// when one is present.
    pub fn new(config: &Config, session: Option<&Session>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            access_token: session.map(|s| s.token.clone()),
        })
    }

    /// Whether requests carry a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    // ─── Events ──────────────────────────────────────────────────────────────

    /// `GET /events`
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.send_json(self.request(Method::GET, "/events"), "Events")
            .await
    }

    /// Get a single event.
    ///
    /// Not every deployment exposes `GET /events/:id`; on 404 this falls back
    /// to listing all events and picking the matching one.
    pub async fn get_event(&self, event_id: Id) -> Result<Event> {
        let path = format!("/events/{}", event_id);
        match self
            .send_json::<Event>(self.request(Method::GET, &path), "Event")
            .await
        {
            Ok(event) => Ok(event),
            Err(AppError::NotFound(_)) => {
                tracing::debug!(event_id, "Single-event endpoint missing, filtering event list");
                self.list_events()
                    .await?
                    .into_iter()
                    .find(|e| e.id == event_id)
                    .ok_or_else(|| AppError::NotFound(format!("Event {}", event_id)))
            }
            Err(e) => Err(e),
        }
    }

    /// `POST /events`, after client-side validation.
    pub async fn create_event(&self, event: &NewEvent) -> Result<Event> {
        event
            .validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let created: Event = self
            .send_json(self.request(Method::POST, "/events").json(event), "Event")
            .await?;
        tracing::info!(event_id = created.id, title = %created.title, "Event created");
        Ok(created)
    }

    // ─── Attendance ──────────────────────────────────────────────────────────

    /// `GET /events/:id/attendance`
    pub async fn event_attendance(&self, event_id: Id) -> Result<Vec<AttendanceRecord>> {
        let path = format!("/events/{}/attendance", event_id);
        self.send_json(self.request(Method::GET, &path), "Attendance")
            .await
    }

    /// `POST /events/:id/attendance/manual`
    pub async fn mark_manual_attendance(
        &self,
        event_id: Id,
        entry: &ManualAttendanceRequest,
    ) -> Result<AttendanceRecord> {
        let path = format!("/events/{}/attendance/manual", event_id);
        let record: AttendanceRecord = self
            .send_json(self.request(Method::POST, &path).json(entry), "Event")
            .await?;
        tracing::info!(event_id, user_id = entry.user_id, "Manual attendance recorded");
        Ok(record)
    }

    /// `POST /attendance/mark` with a scanned token.
    pub async fn mark_attendance(&self, qr_token: &str) -> Result<()> {
        let body = serde_json::json!({ "qrToken": qr_token });
        let response = self
            .request(Method::POST, "/attendance/mark")
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        check_response(response, "QR token").await?;
        Ok(())
    }

    // ─── QR Codes ────────────────────────────────────────────────────────────

    /// `GET /qr/active?event_id=`; 404 means no active code.
    pub async fn active_qr(&self, event_id: Id) -> Result<QrCode> {
        let request = self
            .request(Method::GET, "/qr/active")
            .query(&[("event_id", event_id.to_string())]);
        self.send_json(request, "Active QR code").await
    }

    /// `POST /qr/generate`
    pub async fn generate_qr(&self, event_id: Id) -> Result<QrCode> {
        let body = serde_json::json!({ "event_id": event_id });
        self.send_json(
            self.request(Method::POST, "/qr/generate").json(&body),
            "Event",
        )
        .await
    }

    /// `POST /qr/deactivate`
    pub async fn deactivate_qr(&self, event_id: Id) -> Result<DeactivateResponse> {
        let body = serde_json::json!({ "event_id": event_id });
        self.send_json(
            self.request(Method::POST, "/qr/deactivate").json(&body),
            "Active QR code",
        )
        .await
    }

    // ─── Users ───────────────────────────────────────────────────────────────

    /// `GET /users?limit=1000`, unwrapping the `{data: [...]}` envelope.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        let request = self
            .request(Method::GET, "/users")
            .query(&[("limit", USER_PAGE_LIMIT)]);
        let page: UserPage = self.send_json(request, "Users").await?;
        Ok(page.data)
    }

    // ─── Plumbing ────────────────────────────────────────────────────────────

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and parse a JSON body. `what` names the resource in
    /// not-found errors.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T> {
        let response = request.send().await.map_err(transport_error)?;
        let response = check_response(response, what).await?;

        response
            .json()
            .await
            .map_err(|e| AppError::Decode(format!("JSON parse error: {}", e)))
    }
}

fn transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Transport("request timed out".to_string())
    } else {
        AppError::Transport(e.to_string())
    }
}

/// Check response status and map failures to [`AppError`].
async fn check_response(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_message(&body);

    match status.as_u16() {
        401 => Err(AppError::Unauthorized),
        403 => Err(AppError::Forbidden(
            message.unwrap_or_else(|| "operation not permitted".to_string()),
        )),
        404 => Err(AppError::NotFound(what.to_string())),
        code => {
            if status.is_server_error() {
                tracing::warn!(status = code, "API server error");
            }
            Err(AppError::Api {
                status: code,
                message: message
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string()),
            })
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}` or `{"error": ..}` JSON, otherwise a short
/// prefix of the raw text.
pub(crate) fn extract_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return Some(msg.to_string());
            }
        }
        return None;
    }

    Some(body.chars().take(MAX_ERROR_BODY).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_prefers_message_field() {
        let body = r#"{"message": "QR code expired", "error": "bad_request"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("QR code expired"));
    }

    #[test]
    fn test_extract_message_falls_back_to_error_field() {
        let body = r#"{"error": "already checked in"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("already checked in"));
    }

    #[test]
    fn test_extract_message_plain_text_and_empty() {
        assert_eq!(extract_message("Bad Gateway").as_deref(), Some("Bad Gateway"));
        assert_eq!(extract_message("   "), None);
        assert_eq!(extract_message(r#"{"code": 7}"#), None);
    }

    #[test]
    fn test_extract_message_truncates_long_text() {
        let body = "x".repeat(1000);
        assert_eq!(extract_message(&body).unwrap().len(), MAX_ERROR_BODY);
    }
}
