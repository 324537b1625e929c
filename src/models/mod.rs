// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the attendance API.

pub mod attendance;
pub mod event;
pub mod qr;
pub mod report;
pub mod user;

pub use attendance::{AttendanceRecord, AttendanceStatus, ManualAttendanceRequest};
pub use event::{Event, NewEvent};
pub use qr::{DeactivateResponse, QrCode};
pub use report::{AttendanceReport, EventAttendance, MemberAttendance};
pub use user::{Role, User, UserPage};

/// Numeric identifier used by the API for users, events and records.
pub type Id = i64;
