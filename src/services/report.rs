// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance report aggregation.
//!
//! [`aggregate`] is a pure function of a users/events/attendance snapshot.
//! [`ReportLoader`] fetches that snapshot and keeps the last good report
//! when a fetch fails.

use crate::error::Result;
use crate::models::{
    AttendanceRecord, AttendanceReport, Event, EventAttendance, Id, MemberAttendance, User,
};
use crate::services::api::ApiClient;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::collections::HashMap;

/// Attendance lists keyed by event id.
pub type AttendanceByEvent = HashMap<Id, Vec<AttendanceRecord>>;

/// Compute per-member and per-event statistics.
///
/// Only attendance lists of events in `events` are counted. Events missing
/// from `attendance_by_event` count as having no attendees.
pub fn aggregate(
    users: &[User],
    events: &[Event],
    attendance_by_event: &AttendanceByEvent,
) -> AttendanceReport {
    let total_events = events.len() as u32;
    let total_users = users.len() as u32;

    let mut counts: HashMap<Id, u32> = HashMap::with_capacity(users.len());
    for event in events {
        for record in attendance_by_event.get(&event.id).into_iter().flatten() {
            *counts.entry(record.user_id).or_insert(0) += 1;
        }
    }

    let attendance_per_member: Vec<MemberAttendance> = users
        .iter()
        .map(|user| {
            let count = counts.get(&user.id).copied().unwrap_or(0);
            MemberAttendance {
                user: user.clone(),
                count,
                percentage: percent(count, total_events),
            }
        })
        .collect();

    // Stable: equal counts keep user-list order.
    let mut attendance_ranking = attendance_per_member.clone();
    attendance_ranking.sort_by(|a, b| b.count.cmp(&a.count));

    let attendees_per_event = events
        .iter()
        .map(|event| {
            let count = attendance_by_event
                .get(&event.id)
                .map(|records| records.len() as u32)
                .unwrap_or(0);
            EventAttendance {
                event: event.clone(),
                count,
                rate: percent(count, total_users),
            }
        })
        .collect();

    AttendanceReport {
        total_events,
        total_users,
        attendance_per_member,
        attendance_ranking,
        attendees_per_event,
    }
}

/// `part / whole * 100`, or 0 when `whole` is 0.
fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Fetches report inputs and remembers the last successful report.
#[derive(Debug, Clone)]
pub struct ReportLoader {
    concurrency: usize,
    current: Option<AttendanceReport>,
}

impl ReportLoader {
    /// `concurrency` bounds the attendance lists fetched at once.
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
            current: None,
        }
    }

    /// Last successfully built report.
    pub fn current(&self) -> Option<&AttendanceReport> {
        self.current.as_ref()
    }

    /// Fetch a fresh snapshot and rebuild the report.
    ///
    /// If any fetch fails nothing is aggregated and the previous report is
    /// kept.
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<&AttendanceReport> {
        let (users, events, attendance) = match fetch_snapshot(api, self.concurrency).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching report data");
                return Err(e);
            }
        };

        let report = aggregate(&users, &events, &attendance);
        tracing::info!(
            users = report.total_users,
            events = report.total_events,
            "Attendance report built"
        );
        Ok(&*self.current.insert(report))
    }
}

/// Fetch users, events and every event's attendance list.
///
/// Users and events are fetched concurrently, then attendance lists with at
/// most `concurrency` requests in flight.
pub async fn fetch_snapshot(
    api: &ApiClient,
    concurrency: usize,
) -> Result<(Vec<User>, Vec<Event>, AttendanceByEvent)> {
    let (users, events) = tokio::try_join!(api.list_users(), api.list_events())?;

    let attendance: AttendanceByEvent = stream::iter(events.iter().map(|e| e.id))
        .map(|event_id| async move {
            api.event_attendance(event_id)
                .await
                .map(|records| (event_id, records))
        })
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    Ok((users, events, attendance))
}
