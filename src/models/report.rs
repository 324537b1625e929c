// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Attendance report view-model.
//!
//! Produced by [`crate::services::report::aggregate`] from a snapshot of
//! users, events and attendance lists.

use serde::Serialize;

use super::{Event, User};

/// Attendance of one member across all events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberAttendance {
    pub user: User,
    /// Number of attendance records for this user
    pub count: u32,
    /// `count / total_events * 100`, 0 when there are no events
    pub percentage: f64,
}

/// Attendance of one event across all members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAttendance {
    pub event: Event,
    /// Size of the event's attendance list
    pub count: u32,
    /// `count / total_users * 100`, 0 when there are no users
    pub rate: f64,
}

/// Complete attendance report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceReport {
    pub total_events: u32,
    pub total_users: u32,
    /// One entry per user, in user-list order
    pub attendance_per_member: Vec<MemberAttendance>,
    /// `attendance_per_member` by count descending, ties in user-list order
    pub attendance_ranking: Vec<MemberAttendance>,
    /// One entry per event, in event-list order
    pub attendees_per_event: Vec<EventAttendance>,
}

impl Default for AttendanceReport {
    fn default() -> Self {
        Self {
            total_events: 0,
            total_users: 0,
            attendance_per_member: Vec::new(),
            attendance_ranking: Vec::new(),
            attendees_per_event: Vec::new(),
        }
    }
}

impl AttendanceReport {
    /// Mean attendance rate over all events, 0 when there are none.
    pub fn average_event_rate(&self) -> f64 {
        if self.total_events == 0 {
            return 0.0;
        }
        let sum: f64 = self.attendees_per_event.iter().map(|e| e.rate).sum();
        sum / self.total_events as f64
    }

    /// Members whose attendance percentage is strictly above `threshold`.
    pub fn members_above(&self, threshold: f64) -> usize {
        self.attendance_per_member
            .iter()
            .filter(|m| m.percentage > threshold)
            .count()
    }

    /// The `n` best-attending members.
    pub fn top_attendees(&self, n: usize) -> &[MemberAttendance] {
        &self.attendance_ranking[..n.min(self.attendance_ranking.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn member(id: i64, count: u32, percentage: f64) -> MemberAttendance {
        MemberAttendance {
            user: User {
                id,
                email: format!("user{}@example.com", id),
                first_name: format!("User{}", id),
                last_name: String::new(),
                role: Role::Employee,
                department_id: None,
                is_active: true,
                created_at: String::new(),
                updated_at: String::new(),
            },
            count,
            percentage,
        }
    }

    #[test]
    fn test_empty_report_helpers() {
        let report = AttendanceReport::default();
        assert_eq!(report.average_event_rate(), 0.0);
        assert_eq!(report.members_above(0.0), 0);
        assert!(report.top_attendees(5).is_empty());
    }

    #[test]
    fn test_members_above_is_strict() {
        let members = vec![member(1, 2, 100.0), member(2, 1, 50.0), member(3, 0, 0.0)];
        let report = AttendanceReport {
            total_events: 2,
            total_users: 3,
            attendance_ranking: members.clone(),
            attendance_per_member: members,
            attendees_per_event: Vec::new(),
        };

        assert_eq!(report.members_above(50.0), 1);
        assert_eq!(report.members_above(49.9), 2);
        assert_eq!(report.top_attendees(2).len(), 2);
        assert_eq!(report.top_attendees(10).len(), 3);
        assert_eq!(report.top_attendees(1)[0].user.id, 1);
    }
}
