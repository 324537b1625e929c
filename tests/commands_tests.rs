// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command dispatch against the mock API.

mod common;

use attendance_console::cli::{AttendanceCommand, Commands};
use attendance_console::commands::dispatch;
use attendance_console::error::{AppError, ErrorKind};
use attendance_console::services::{MemorySessionStore, SessionStore};
use attendance_console::AppState;
use common::{user_json, MockApi};
use tempfile::TempDir;

fn logged_in(mock: &MockApi) -> AppState {
    let store = MemorySessionStore::with_session(common::test_session());
    AppState::load(mock.config(), Box::new(store)).unwrap()
}

#[tokio::test]
async fn test_login_persists_session_and_logout_clears_it() {
    let mock = MockApi::start().await;
    let dir = TempDir::new().unwrap();
    let profile = dir.path().join("profile.json");
    std::fs::write(&profile, user_json(7).to_string()).unwrap();

    let mut state = AppState::load(mock.config(), Box::new(MemorySessionStore::default())).unwrap();
    dispatch(
        &mut state,
        Commands::Login {
            token: " access ".to_string(),
            refresh_token: "refresh".to_string(),
            profile,
        },
    )
    .await
    .unwrap();

    let session = state.sessions.load().unwrap().unwrap();
    assert_eq!(session.token, "access");
    assert_eq!(session.user.id, 7);
    assert!(dispatch(&mut state, Commands::Whoami).await.is_ok());

    dispatch(&mut state, Commands::Logout).await.unwrap();
    assert_eq!(state.sessions.load().unwrap(), None);
    assert!(matches!(
        dispatch(&mut state, Commands::Whoami).await,
        Err(AppError::Unauthorized)
    ));
}

#[tokio::test]
async fn test_login_rejects_bad_profile() {
    let mock = MockApi::start().await;
    let dir = TempDir::new().unwrap();
    let profile = dir.path().join("profile.json");
    std::fs::write(&profile, "{}").unwrap();

    let mut state = AppState::load(mock.config(), Box::new(MemorySessionStore::default())).unwrap();
    let err = dispatch(
        &mut state,
        Commands::Login {
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            profile,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(state.session.is_none());
}

#[tokio::test]
async fn test_manual_entry_with_bad_user_id_sends_nothing() {
    let mock = MockApi::start().await;
    let mut state = logged_in(&mock);

    let err = dispatch(
        &mut state,
        Commands::Attendance(AttendanceCommand::Add {
            event: 4,
            user: "abc".to_string(),
            notes: None,
        }),
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(mock.state.request_count(), 0);
}

#[tokio::test]
async fn test_manual_entry_refreshes_list() {
    let mock = MockApi::start().await;
    let mut state = logged_in(&mock);

    dispatch(
        &mut state,
        Commands::Attendance(AttendanceCommand::Add {
            event: 4,
            user: "101".to_string(),
            notes: Some("No phone".to_string()),
        }),
    )
    .await
    .unwrap();

    assert_eq!(
        mock.state.requests(),
        vec!["POST /events/4/attendance/manual", "GET /events/4/attendance"]
    );
}

#[tokio::test]
async fn test_scan_without_token_needs_no_session() {
    let mock = MockApi::start().await;
    let mut state = AppState::load(mock.config(), Box::new(MemorySessionStore::default())).unwrap();

    let err = dispatch(
        &mut state,
        Commands::Scan {
            url: "http://localhost:5173/attendance".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.user_message(), "No QR token found in URL");
    assert_eq!(mock.state.request_count(), 0);
}

#[tokio::test]
async fn test_report_failure_is_generic() {
    let mock = MockApi::start().await;
    *mock.state.events.lock().unwrap() = vec![common::event_json(1, "Kickoff")];
    mock.state.failing_attendance.lock().unwrap().insert(1);
    let mut state = logged_in(&mock);

    let err = dispatch(&mut state, Commands::Report { json: true })
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Failed to load report data");
}
