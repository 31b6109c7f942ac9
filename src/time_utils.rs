// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Local, SecondsFormat, TimeZone, Utc};
use std::fmt::Display;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Human-readable date as shown on journal cards, e.g. `October 16, 2026`,
/// on the calendar of `date`'s own timezone.
///
/// Not sortable; `entryDate` carries the canonical timestamp.
pub fn display_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%B %-d, %Y").to_string()
}

/// Display date of `instant` on the device's local calendar.
pub fn local_display_date(instant: DateTime<Utc>) -> String {
    display_date(&instant.with_timezone(&Local))
}
