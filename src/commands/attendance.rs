// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `attendance list | add`.

use crate::cli::AttendanceCommand;
use crate::error::Result;
use crate::models::{AttendanceRecord, Id, ManualAttendanceRequest};
use crate::time_utils::format_local;
use crate::AppState;

pub async fn handle(state: &AppState, command: AttendanceCommand) -> Result<()> {
    match command {
        AttendanceCommand::List { event } => list(state, event).await,
        AttendanceCommand::Add { event, user, notes } => {
            add(state, event, &user, notes.as_deref()).await
        }
    }
}

async fn list(state: &AppState, event_id: Id) -> Result<()> {
    let attendance = state.api()?.event_attendance(event_id).await?;
    print_attendance(&attendance);
    Ok(())
}

async fn add(state: &AppState, event_id: Id, user: &str, notes: Option<&str>) -> Result<()> {
    // Validated before any request is made.
    let entry = ManualAttendanceRequest::parse(user, notes)?;
    let api = state.api()?;

    api.mark_manual_attendance(event_id, &entry).await?;
    println!("User {} added to event {}", entry.user_id, event_id);

    let attendance = api.event_attendance(event_id).await?;
    println!();
    print_attendance(&attendance);
    Ok(())
}

/// Print an attendance list as a table.
pub(crate) fn print_attendance(attendance: &[AttendanceRecord]) {
    println!("Attendance (total: {})", attendance.len());
    if attendance.is_empty() {
        println!("  No attendance records yet.");
        return;
    }

    for record in attendance {
        let who = match &record.user {
            Some(user) => format!("{} <{}>", user.display_name(), user.email),
            None => format!("ID: {}", record.user_id),
        };
        println!(
            "  {:<40} {:<17} {:<8} {}",
            who,
            format_local(record.check_in),
            record.status,
            record.notes
        );
    }
}
