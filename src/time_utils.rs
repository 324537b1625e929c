// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format a timestamp in the operator's local time zone.
pub fn format_local(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format a countdown as `m:ss`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Parse a date/time given on the command line.
///
/// Accepts RFC3339 (`2025-12-05T10:00:00Z`) or a local `YYYY-MM-DDTHH:MM`
/// / `YYYY-MM-DD HH:MM`, which is interpreted in the local time zone.
pub fn parse_datetime_arg(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| format!("{} does not exist in the local time zone", input));
        }
    }

    Err(format!(
        "invalid date/time {:?} (expected RFC3339 or YYYY-MM-DDTHH:MM)",
        input
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(0), "0:00");
        assert_eq!(format_countdown(9), "0:09");
        assert_eq!(format_countdown(90), "1:30");
        assert_eq!(format_countdown(-4), "0:00");
    }

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_datetime_arg("2025-12-05T10:00:00Z").unwrap();
        assert_eq!(format_utc_rfc3339(dt), "2025-12-05T10:00:00Z");
    }

    #[test]
    fn test_parse_local_form() {
        assert!(parse_datetime_arg("2025-12-05T10:00").is_ok());
        assert!(parse_datetime_arg("2025-12-05 10:00").is_ok());
        assert!(parse_datetime_arg("tomorrow").is_err());
    }
}
