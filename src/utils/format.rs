//! Formatting utilities for sizes, durations, and dates.

/// Format a document size for display (e.g., "1.2K", "3.4M").
pub fn format_size(size: Option<u64>) -> String {
    match size {
        None => "-".to_string(),
        Some(bytes) if bytes >= 1_000_000 => format!("{:.1}M", bytes as f64 / 1_000_000.0),
        Some(bytes) if bytes >= 1_000 => format!("{:.1}K", bytes as f64 / 1_000.0),
        Some(bytes) => format!("{}B", bytes),
    }
}

/// Format accumulated reading time: "45s" under a minute, "12m" under an
/// hour, "1h 5m" beyond.
pub fn format_reading_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

/// Date part of an ISO-8601 timestamp ("2024-03-01T10:00:00Z" -> "2024-03-01").
///
/// Anything that does not start with a `YYYY-MM-DD` date is returned as is.
pub fn format_date(timestamp: &str) -> &str {
    let date = timestamp.get(..10).unwrap_or(timestamp);
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if well_formed { date } else { timestamp }
}
