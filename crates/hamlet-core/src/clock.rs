//! Wall-clock abstraction and timestamp formatting.
//!
//! All expiry computation is wall-clock based: the engine reads time from a
//! single [`Clock`] it owns, which makes every temporal operation testable
//! with a manual clock. System clock adjustments can skew expiry; this is
//! accepted, not mitigated.

use chrono::{Duration, Local, NaiveDateTime};

/// Timestamp format used in save files, e.g. `2026-08-24T13:45:00`.
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// ---------------------------------------------------------------------------
// Clock trait
// ---------------------------------------------------------------------------

/// Source of the current wall-clock instant.
///
/// The engine holds exactly one boxed clock. Production code uses
/// [`SystemClock`]; tests inject a manual clock they can advance.
pub trait Clock: std::fmt::Debug {
    /// The current local instant, second precision is sufficient.
    fn now(&self) -> NaiveDateTime;
}

/// The real local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

// ---------------------------------------------------------------------------
// Timestamp parse/format
// ---------------------------------------------------------------------------

/// Format an instant for the save file.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format(TIME_FORMAT).to_string()
}

/// Parse a save-file timestamp. Returns `None` for anything malformed.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIME_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Duration display
// ---------------------------------------------------------------------------

/// Render a duration for countdown labels: `1d 2h 3m 4s`, omitting leading
/// zero components. Negative durations render as `0s`.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds().max(0);
    let days = total / 86_400;
    let hours = total / 3_600 % 24;
    let minutes = total / 60 % 60;
    let seconds = total % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));
    parts.join(" ")
}
