//! Attendance records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Id, User};
use crate::error::AppError;

/// Check-in status recorded by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
        };
        f.write_str(s)
    }
}

/// A single check-in. Created by the server, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Id,
    pub user_id: Id,
    /// Embedded user snapshot, when the server includes one
    #[serde(default)]
    pub user: Option<User>,
    pub event_id: Id,
    pub check_in: DateTime<Utc>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
    /// Token the check-in was made with (absent for manual entries)
    #[serde(default)]
    pub qr_token: Option<String>,
}

/// Body of `POST /events/:id/attendance/manual`.
#[derive(Debug, Clone, Serialize)]
pub struct ManualAttendanceRequest {
    pub user_id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ManualAttendanceRequest {
    /// Build a request from operator input, rejecting a non-numeric or
    /// non-positive user id before anything is sent.
    pub fn parse(user_id: &str, notes: Option<&str>) -> Result<Self, AppError> {
        let trimmed = user_id.trim();
        let user_id: Id = trimmed
            .parse()
            .map_err(|_| AppError::InvalidInput(format!("user id must be a number, got {:?}", trimmed)))?;
        if user_id <= 0 {
            return Err(AppError::InvalidInput(format!(
                "user id must be positive, got {}",
                user_id
            )));
        }

        let notes = notes
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self { user_id, notes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_manual_entry() {
        let req = ManualAttendanceRequest::parse(" 101 ", Some("No phone")).unwrap();
        assert_eq!(req.user_id, 101);
        assert_eq!(req.notes.as_deref(), Some("No phone"));
    }

    #[test]
    fn test_blank_notes_are_omitted() {
        let req = ManualAttendanceRequest::parse("7", Some("  ")).unwrap();
        assert_eq!(req.notes, None);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "user_id": 7 }));
    }

    #[test]
    fn test_non_numeric_user_id_is_invalid_input() {
        let err = ManualAttendanceRequest::parse("abc", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let err = ManualAttendanceRequest::parse("-3", None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_status_deserializes_lowercase() {
        let status: AttendanceStatus = serde_json::from_str("\"late\"").unwrap();
        assert_eq!(status, AttendanceStatus::Late);
        assert_eq!(status.to_string(), "late");
    }
}
