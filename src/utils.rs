/// Utility functions for rounding and formatting
use time::{format_description, OffsetDateTime};

/// Round to a fixed number of decimal places (halves away from zero)
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .ok()
        .and_then(|format| dt.format(&format).ok())
        .unwrap_or_else(|| dt.to_string())
}

/// Format the Unix time reported by the station, if it is a valid one
pub fn format_epoch(epoch: i64) -> Option<String> {
    if epoch <= 0 {
        return None;
    }
    OffsetDateTime::from_unix_timestamp(epoch)
        .ok()
        .map(|dt| format_datetime(&dt))
}

/// Convert a time::Duration to seconds as u64
///
/// Negative durations count as zero.
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds().max(0) as u64
}
