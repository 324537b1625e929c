// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `qr status | start | stop | live`.

use crate::cli::QrCommand;
use crate::error::{ErrorKind, Result};
use crate::models::{Id, QrCode};
use crate::services::live_qr::{LiveQrHandle, LiveQrOptions, QrSnapshot};
use crate::services::qr::seconds_until;
use crate::services::scan::{render_terminal_qr, scan_url};
use crate::time_utils::{format_countdown, format_utc_rfc3339};
use crate::AppState;
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn handle(state: &AppState, command: QrCommand) -> Result<()> {
    match command {
        QrCommand::Status { event } => status(state, event).await,
        QrCommand::Start { event } => start(state, event).await,
        QrCommand::Stop { event } => stop(state, event).await,
        QrCommand::Live { event } => live(state, event).await,
    }
}

async fn status(state: &AppState, event_id: Id) -> Result<()> {
    match state.api()?.active_qr(event_id).await {
        Ok(code) => print_code(state, &code),
        Err(e) if e.kind() == ErrorKind::NoActiveResource => {
            println!("QR code for event {} is currently inactive.", event_id);
            println!("Run `attendance-console qr start {}` to show one.", event_id);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

async fn start(state: &AppState, event_id: Id) -> Result<()> {
    let code = state.api()?.generate_qr(event_id).await?;
    print_code(state, &code);
    Ok(())
}

async fn stop(state: &AppState, event_id: Id) -> Result<()> {
    let response = state.api()?.deactivate_qr(event_id).await?;
    if response.message.is_empty() {
        println!("QR code for event {} deactivated", response.event_id);
    } else {
        println!("{}", response.message);
    }
    Ok(())
}

fn print_code(state: &AppState, code: &QrCode) {
    let url = scan_url(&state.config.frontend_url, &code.qr_token);
    print_qr(&url);
    println!("Token:      {}", code.qr_token);
    println!("Check-in:   {}", url);
    println!(
        "Expires in: {} ({})",
        format_countdown(seconds_until(code.expires_at, Utc::now())),
        format_utc_rfc3339(code.expires_at)
    );
}

/// Run the live view until the operator quits or presses Ctrl-C.
async fn live(state: &AppState, event_id: Id) -> Result<()> {
    let api = Arc::new(state.api()?);
    let event = api.get_event(event_id).await?;

    println!("Live check-in QR for \"{}\" (#{})", event.title, event.id);
    println!("Commands: r = start / force refresh, s = stop, q = quit");

    let handle = LiveQrHandle::spawn(api, event_id, LiveQrOptions::from_config(&state.config));
    let mut snapshots = handle.subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;
    let mut last: Option<QrSnapshot> = None;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot, last.as_ref());
                last = Some(snapshot);
            }
            line = input.next_line(), if input_open => match line {
                Ok(Some(line)) => match line.trim() {
                    "r" => handle.refresh().await,
                    "s" => handle.stop().await,
                    "q" => break,
                    "" => {}
                    other => println!("Unknown command {:?} (r, s or q)", other),
                },
                Ok(None) => input_open = false,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read operator input");
                    input_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
    }

    handle.shutdown().await;
    println!();
    Ok(())
}

fn render(snapshot: &QrSnapshot, last: Option<&QrSnapshot>) {
    let changed = last.map_or(true, |l| {
        l.token != snapshot.token || l.active != snapshot.active || l.notice != snapshot.notice
    });

    if changed {
        println!();
        match (&snapshot.scan_url, snapshot.active) {
            (Some(url), true) => {
                print_qr(url);
                println!("Check-in URL: {}", url);
            }
            _ => println!("QR code is currently inactive. Press r to start."),
        }
        if let Some(notice) = &snapshot.notice {
            println!("! {}", notice);
        }
    }

    if snapshot.active {
        print!(
            "\r  Refreshes in {}{}   ",
            format_countdown(snapshot.seconds_remaining),
            if snapshot.generating { " (refreshing…)" } else { "" }
        );
        let _ = std::io::stdout().flush();
    }
}

fn print_qr(url: &str) {
    match render_terminal_qr(url) {
        Ok(image) => println!("{}", image),
        Err(e) => tracing::warn!(error = %e, "Cannot draw QR code, showing URL only"),
    }
}
