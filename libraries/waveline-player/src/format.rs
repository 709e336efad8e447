//! Display formatting helpers

use chrono::DateTime;

/// Format a track offset as `mm:ss`
///
/// The offset is treated as milliseconds past the Unix epoch and rendered in
/// UTC, so minutes wrap at the hour and fractional seconds are truncated.
/// Negative or non-finite offsets render as `00:00`.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "00:00".to_string();
    }

    let millis = (seconds * 1000.0) as i64;
    match DateTime::from_timestamp_millis(millis) {
        Some(instant) => instant.format("%M:%S").to_string(),
        None => "00:00".to_string(),
    }
}
