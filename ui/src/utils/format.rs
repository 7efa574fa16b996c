//! Display formatting helpers.

use chrono::{DateTime, Utc};

/// Formats a record creation time for table display, e.g. "Mar 1, 2026".
///
/// Times are rendered in UTC so two admins looking at the same record see
/// the same date.
pub fn format_created_at(created_at: &DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}
