// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process mock of the attendance REST API.

#![allow(dead_code)]

use attendance_console::config::Config;
use attendance_console::models::User;
use attendance_console::services::{ApiClient, Session};
use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Recorded requests and canned data served by the mock.
#[derive(Default)]
pub struct MockState {
    /// "METHOD /path" per request, in arrival order
    pub requests: Mutex<Vec<String>>,
    /// Authorization header per request
    pub auth_headers: Mutex<Vec<Option<String>>>,
    /// Raw query string per request
    pub queries: Mutex<Vec<Option<String>>>,
    /// Last JSON body received by a POST handler
    pub last_body: Mutex<Option<Value>>,

    pub users: Mutex<Vec<Value>>,
    pub events: Mutex<Vec<Value>>,
    pub attendance: Mutex<HashMap<i64, Vec<Value>>>,
    pub active_qr: Mutex<Option<Value>>,

    /// Event ids whose attendance endpoint fails with 500
    pub failing_attendance: Mutex<HashSet<i64>>,
    /// Serve `GET /events/{id}`; otherwise it 404s like a deployment without it
    pub single_event_endpoint: AtomicBool,
    /// Error returned by `POST /attendance/mark`
    pub mark_error: Mutex<Option<(u16, Value)>>,

    qr_counter: AtomicU64,
}

impl MockState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Running mock server. Aborted on drop.
pub struct MockApi {
    pub base_url: String,
    pub state: Arc<MockState>,
    task: JoinHandle<()>,
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl MockApi {
    /// Start a mock API on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock API");
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
            task,
        }
    }

    pub fn config(&self) -> Config {
        Config::default().with_api_url(&self.base_url)
    }

    /// Client authenticated with [`test_session`].
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config(), Some(&test_session())).unwrap()
    }
}

fn router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event))
        .route("/events/{id}/attendance", get(event_attendance))
        .route("/events/{id}/attendance/manual", post(manual_attendance))
        .route("/qr/active", get(active_qr))
        .route("/qr/generate", post(generate_qr))
        .route("/qr/deactivate", post(deactivate_qr))
        .route("/attendance/mark", post(mark_attendance))
        .route("/users", get(list_users))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    state
        .requests
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    state.auth_headers.lock().unwrap().push(
        request
            .headers()
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string),
    );
    state
        .queries
        .lock()
        .unwrap()
        .push(request.uri().query().map(str::to_string));
    next.run(request).await
}

async fn list_events(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(Value::Array(state.events.lock().unwrap().clone()))
}

async fn create_event(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    *state.last_body.lock().unwrap() = Some(body.clone());
    Json(json!({
        "id": 99,
        "title": body["title"],
        "description": body["description"],
        "start_time": body["start_time"],
        "end_time": body["end_time"],
        "is_active": true,
        "created_at": "2025-12-01T00:00:00Z",
    }))
}

async fn get_event(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if !state.single_event_endpoint.load(Ordering::SeqCst) {
        return not_found("Cannot GET /events/:id");
    }
    let event = state
        .events
        .lock()
        .unwrap()
        .iter()
        .find(|e| e["id"] == id)
        .cloned();
    match event {
        Some(event) => Json(event).into_response(),
        None => not_found("Event not found"),
    }
}

async fn event_attendance(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    if state.failing_attendance.lock().unwrap().contains(&id) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        )
            .into_response();
    }
    let records = state
        .attendance
        .lock()
        .unwrap()
        .get(&id)
        .cloned()
        .unwrap_or_default();
    Json(Value::Array(records)).into_response()
}

async fn manual_attendance(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    *state.last_body.lock().unwrap() = Some(body.clone());
    let record = record_json(500, id, body["user_id"].as_i64().unwrap_or(0));
    state
        .attendance
        .lock()
        .unwrap()
        .entry(id)
        .or_default()
        .push(record.clone());
    Json(record)
}

async fn active_qr(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let active = state.active_qr.lock().unwrap().clone();
    match active {
        Some(code) if code["event_id"].to_string() == query.get("event_id").cloned().unwrap_or_default() => {
            Json(code).into_response()
        }
        _ => not_found("No active QR code"),
    }
}

async fn generate_qr(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    let n = state.qr_counter.fetch_add(1, Ordering::SeqCst) + 1;
    let now = Utc::now();
    let code = json!({
        "qr_token": format!("tok-{}", n),
        "event_id": body["event_id"],
        "expires_at": (now + Duration::seconds(90)).to_rfc3339(),
        "created_at": now.to_rfc3339(),
        "is_active": true,
    });
    *state.active_qr.lock().unwrap() = Some(code.clone());
    Json(code)
}

async fn deactivate_qr(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    *state.active_qr.lock().unwrap() = None;
    Json(json!({ "message": "QR code deactivated", "event_id": body["event_id"] }))
}

async fn mark_attendance(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    *state.last_body.lock().unwrap() = Some(body);
    let error = state.mark_error.lock().unwrap().clone();
    match error {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            Json(body),
        )
            .into_response(),
        None => Json(json!({ "message": "Attendance recorded" })).into_response(),
    }
}

async fn list_users(State(state): State<Arc<MockState>>) -> Json<Value> {
    Json(json!({ "data": state.users.lock().unwrap().clone() }))
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

// ─── Fixtures ────────────────────────────────────────────────────────────────

pub fn user_json(id: i64) -> Value {
    json!({
        "id": id,
        "email": format!("user{}@example.com", id),
        "first_name": format!("User{}", id),
        "last_name": "Test",
        "role": "employee",
        "department_id": null,
        "is_active": true,
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z",
    })
}

pub fn event_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "start_time": "2025-12-05T10:00:00Z",
        "end_time": "2025-12-05T13:00:00Z",
        "is_active": true,
        "created_at": "2025-12-01T00:00:00Z",
    })
}

pub fn record_json(id: i64, event_id: i64, user_id: i64) -> Value {
    json!({
        "id": id,
        "user_id": user_id,
        "event_id": event_id,
        "check_in": "2025-12-05T10:05:00Z",
        "status": "present",
        "location": "",
        "notes": "",
    })
}

/// Session used by authenticated test clients.
pub fn test_session() -> Session {
    let user: User = serde_json::from_value(user_json(1)).unwrap();
    Session {
        token: "test-access-token".to_string(),
        refresh_token: "test-refresh-token".to_string(),
        user,
    }
}
