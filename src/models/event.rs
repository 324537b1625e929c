// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event model and the payload used to create one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::Id;

/// Default length of a newly created event.
const DEFAULT_EVENT_HOURS: i64 = 3;

/// An event attendance can be recorded for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: String,
}

/// Body of `POST /events`.
#[derive(Debug, Clone, Serialize, Validate)]
#[validate(schema(function = "validate_time_range"))]
pub struct NewEvent {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl NewEvent {
    /// Build a new event, defaulting to a three hour slot starting at `now`.
    pub fn new(
        title: &str,
        description: &str,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let start_time = start_time.unwrap_or(now);
        let end_time = end_time.unwrap_or(start_time + Duration::hours(DEFAULT_EVENT_HOURS));
        Self {
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            start_time,
            end_time,
        }
    }
}

fn validate_time_range(event: &NewEvent) -> Result<(), ValidationError> {
    if event.end_time <= event.start_time {
        return Err(ValidationError::new("time_range")
            .with_message("end time must be after start time".into()));
    }
    Ok(())
}
