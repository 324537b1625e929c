// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `report`.

use crate::commands::events::truncate;
use crate::error::{AppError, Result};
use crate::models::AttendanceReport;
use crate::services::ReportLoader;
use crate::AppState;

/// Members above this percentage are counted as regular attendees.
const REGULAR_THRESHOLD: f64 = 50.0;
const TOP_ATTENDEES: usize = 5;

pub async fn handle(state: &AppState, json: bool) -> Result<()> {
    let api = state.api()?;
    let mut loader = ReportLoader::new(state.config.report_concurrency);

    let report = loader
        .refresh(&api)
        .await
        .map_err(|_| AppError::Operation("Failed to load report data".to_string()))?;

    if json {
        let out = serde_json::to_string_pretty(report)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize report: {}", e)))?;
        println!("{}", out);
    } else {
        print_report(report);
    }
    Ok(())
}

fn print_report(report: &AttendanceReport) {
    println!("Total events:        {}", report.total_events);
    println!("Total users:         {}", report.total_users);
    println!("Average attendance:  {:.0}%", report.average_event_rate());
    println!(
        "Regular attendees:   {} members > {:.0}%",
        report.members_above(REGULAR_THRESHOLD),
        REGULAR_THRESHOLD
    );

    println!();
    println!("Top attendees");
    for (rank, member) in report.top_attendees(TOP_ATTENDEES).iter().enumerate() {
        println!(
            "  {}. {:<32} {:>4}",
            rank + 1,
            truncate(&member.user.display_name(), 32),
            member.count
        );
    }

    println!();
    println!("Attendance per event");
    println!("  {:<32} {:>9} {:>7}", "EVENT", "ATTENDEES", "RATE");
    for item in &report.attendees_per_event {
        println!(
            "  {:<32} {:>9} {:>6.1}%",
            truncate(&item.event.title, 32),
            item.count,
            item.rate
        );
    }

    println!();
    println!("Attendance per member");
    println!("  {:<32} {:>6} {:>7}", "MEMBER", "EVENTS", "PCT");
    for member in &report.attendance_per_member {
        println!(
            "  {:<32} {:>6} {:>6.1}%",
            truncate(&member.user.display_name(), 32),
            member.count,
            member.percentage
        );
    }
}
