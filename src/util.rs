//! Small formatting helpers shared by the console output and the summary table.

use std::time::Duration;

/// What: Format a byte count using decimal units with two decimal places.
///
/// Inputs:
/// - `value`: Raw byte count
///
/// Output:
/// - Size string such as "1.50 GB" or "512 B".
///
/// Details:
/// - Uses 1000-based units, matching how download sizes are usually advertised.
#[must_use]
pub fn format_size(value: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    #[allow(clippy::cast_precision_loss)]
    let mut size = value as f64;
    let mut unit_index = 0usize;
    while size >= 1000.0 && unit_index < UNITS.len() - 1 {
        size /= 1000.0;
        unit_index += 1;
    }
    if unit_index == 0 {
        format!("{value} {}", UNITS[unit_index])
    } else {
        format!("{size:.2} {}", UNITS[unit_index])
    }
}

/// What: Format an elapsed duration for progress lines.
///
/// Inputs:
/// - `elapsed`: Time taken
///
/// Output:
/// - "hh:mm:ss" when at least an hour, "mm:ss" otherwise, "0.45s" under a second.
#[must_use]
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    if total == 0 {
        return format!("{:.2}s", elapsed.as_secs_f64());
    }
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

/// What: Compute and format the average transfer rate.
///
/// Inputs:
/// - `bytes`: Bytes transferred
/// - `elapsed`: Time the transfer took
///
/// Output:
/// - Rate such as "845.20 Mbit/s" or "1.20 Gbit/s".
///
/// Details:
/// - A zero duration yields "0.00 Mbit/s" instead of dividing by zero.
#[must_use]
pub fn format_bitrate(bytes: u64, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs <= f64::EPSILON {
        return "0.00 Mbit/s".to_string();
    }
    #[allow(clippy::cast_precision_loss)]
    let megabits = (bytes as f64 * 8.0) / 1_000_000.0 / secs;
    if megabits >= 1000.0 {
        format!("{:.2} Gbit/s", megabits / 1000.0)
    } else {
        format!("{megabits:.2} Mbit/s")
    }
}

/// What: Split user-supplied id arguments on commas and whitespace.
///
/// Inputs:
/// - `raw`: Values as received from the command line
///
/// Output:
/// - Individual non-empty ids in input order.
pub fn parse_app_ids(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|chunk| chunk.split([',', ' ']))
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
