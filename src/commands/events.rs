// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `events list | show | create`.

use crate::cli::{CreateEventArgs, EventsCommand};
use crate::commands::attendance::print_attendance;
use crate::error::Result;
use crate::models::{Event, Id, NewEvent};
use crate::time_utils::format_local;
use crate::AppState;
use chrono::Utc;

pub async fn handle(state: &AppState, command: EventsCommand) -> Result<()> {
    match command {
        EventsCommand::List => list(state).await,
        EventsCommand::Show { id } => show(state, id).await,
        EventsCommand::Create(args) => create(state, args).await,
    }
}

async fn list(state: &AppState) -> Result<()> {
    let events = state.api()?.list_events().await?;
    if events.is_empty() {
        println!("No events yet.");
        return Ok(());
    }

    println!("{:>6}  {:<32} {:<17} {:<17} {}", "ID", "TITLE", "START", "END", "ACTIVE");
    for event in &events {
        print_event_row(event);
    }
    Ok(())
}

fn print_event_row(event: &Event) {
    println!(
        "{:>6}  {:<32} {:<17} {:<17} {}",
        event.id,
        truncate(&event.title, 32),
        format_local(event.start_time),
        format_local(event.end_time),
        if event.is_active { "yes" } else { "no" }
    );
}

async fn show(state: &AppState, id: Id) -> Result<()> {
    let api = state.api()?;
    let event = api.get_event(id).await?;
    let attendance = api.event_attendance(id).await?;

    println!("{} (#{})", event.title, event.id);
    if !event.description.is_empty() {
        println!("{}", event.description);
    }
    println!(
        "{} - {}",
        format_local(event.start_time),
        format_local(event.end_time)
    );
    println!();
    print_attendance(&attendance);
    Ok(())
}

async fn create(state: &AppState, args: CreateEventArgs) -> Result<()> {
    let new_event = NewEvent::new(
        &args.title,
        &args.description,
        args.start,
        args.end,
        Utc::now(),
    );
    let event = state.api()?.create_event(&new_event).await?;
    println!("Created event #{}: {}", event.id, event.title);
    Ok(())
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
