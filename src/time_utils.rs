// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time in the format stored in the database.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Whether a stored RFC3339 timestamp lies in the past.
///
/// Unparsable values count as expired.
pub fn is_past(timestamp: &str) -> bool {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|t| t.with_timezone(&Utc) <= Utc::now())
        .unwrap_or(true)
}
