//! Time parsing and formatting utilities

use crate::domain::errors::DomainError;

/// Parse a time string to seconds.
///
/// Accepted formats: plain seconds (`123.45`), `MM:SS[.ms]`, `HH:MM:SS[.ms]`.
pub fn parse_time(time_str: &str) -> Result<f64, DomainError> {
    let trimmed = time_str.trim();

    // Try parsing as seconds (float)
    if let Ok(seconds) = trimmed.parse::<f64>() {
        if seconds < 0.0 {
            return Err(DomainError::BadArgs("Time cannot be negative".to_string()));
        }
        return Ok(seconds);
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    match parts.len() {
        2 => {
            let minutes = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
            let seconds = parse_seconds_field(parts[1])?;
            Ok(minutes as f64 * 60.0 + seconds)
        }
        3 => {
            let hours = parts[0]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid hours format".to_string()))?;
            let minutes = parts[1]
                .parse::<u32>()
                .map_err(|_| DomainError::BadArgs("Invalid minutes format".to_string()))?;
            if minutes >= 60 {
                return Err(DomainError::BadArgs(
                    "Minutes must be less than 60".to_string(),
                ));
            }
            let seconds = parse_seconds_field(parts[2])?;
            Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
        }
        _ => Err(DomainError::BadArgs(format!(
            "Invalid time format: {}. Expected seconds, MM:SS.ms, or HH:MM:SS.ms",
            trimmed
        ))),
    }
}

fn parse_seconds_field(field: &str) -> Result<f64, DomainError> {
    let seconds = field
        .parse::<f64>()
        .map_err(|_| DomainError::BadArgs("Invalid seconds format".to_string()))?;
    if !(0.0..60.0).contains(&seconds) {
        return Err(DomainError::BadArgs(
            "Seconds must be less than 60".to_string(),
        ));
    }
    Ok(seconds)
}

/// Format seconds as `MM:SS` (or `HH:MM:SS` past one hour)
pub fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format seconds as `MM:SS.mmm` (or `HH:MM:SS.mmm` past one hour)
pub fn format_clock_millis(seconds: f64) -> String {
    let clamped = seconds.max(0.0);
    let total = clamped as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    let millis = (clamped.fract() * 1000.0) as u64;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    }
}

/// Format a byte count for display
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
