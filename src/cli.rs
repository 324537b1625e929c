// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line interface definition.

use crate::models::Id;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Administration console for the attendance-tracking API
#[derive(Parser, Debug)]
#[command(
    name = "attendance-console",
    version = env!("CARGO_PKG_VERSION"),
    about = "Manage events, live check-in QR codes and attendance reports",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the attendance API
    #[arg(global = true, long, env = "ATTENDANCE_API_URL")]
    pub api_url: Option<String>,

    /// Override where the login session is stored
    #[arg(global = true, long, env = "ATTENDANCE_SESSION_FILE")]
    pub session_file: Option<PathBuf>,

    /// Emit JSON logs on stderr
    #[arg(global = true, long, env = "JSON_LOGS")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store credentials issued by the API
    Login {
        /// Access token
        #[arg(long)]
        token: String,

        /// Refresh token
        #[arg(long = "refresh-token")]
        refresh_token: String,

        /// JSON file with the user profile returned at login
        #[arg(long)]
        profile: PathBuf,
    },

    /// Forget the stored credentials
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List, show or create events
    #[command(subcommand)]
    Events(EventsCommand),

    /// List or add attendance records
    #[command(subcommand)]
    Attendance(AttendanceCommand),

    /// Manage an event's check-in QR code
    #[command(subcommand)]
    Qr(QrCommand),

    /// Check in with a scanned QR URL
    Scan {
        /// URL encoded in the QR code (must contain ?token=...)
        url: String,
    },

    /// Attendance statistics across all events and users
    Report {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// List all events
    List,

    /// Show one event with its attendance
    Show { id: Id },

    /// Create an event
    Create(CreateEventArgs),
}

#[derive(Args, Debug)]
pub struct CreateEventArgs {
    /// Event title
    #[arg(long)]
    pub title: String,

    /// Event description
    #[arg(long, default_value = "")]
    pub description: String,

    /// Start (RFC3339 or local YYYY-MM-DDTHH:MM); defaults to now
    #[arg(long, value_parser = crate::time_utils::parse_datetime_arg)]
    pub start: Option<DateTime<Utc>>,

    /// End (RFC3339 or local YYYY-MM-DDTHH:MM); defaults to start + 3h
    #[arg(long, value_parser = crate::time_utils::parse_datetime_arg)]
    pub end: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum AttendanceCommand {
    /// List attendance for an event
    List { event: Id },

    /// Record attendance manually
    Add {
        event: Id,

        /// User ID to mark present
        #[arg(long)]
        user: String,

        /// Reason for the manual entry
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum QrCommand {
    /// Show the event's active code, if any
    Status { event: Id },

    /// Issue a new code (replaces the current one)
    Start { event: Id },

    /// Deactivate the current code
    Stop { event: Id },

    /// Display a self-rotating code until interrupted
    Live { event: Id },
}
