//! Duration parsing for scenario steps
//!
//! Supports human-readable durations like "1 hour", "7 days", "90s".
//! Used by `expires_in`, `expires_ago` and `advance` steps.

/// Parse human-readable duration to seconds.
///
/// Supports:
/// - "0" → 0 seconds
/// - Human-readable formats via humantime crate (e.g., "1 hour", "7 days", "1h", "7d")
///
/// # Examples
/// ```
/// use votebook::scenario::duration_parse::parse_duration_to_secs;
///
/// assert_eq!(parse_duration_to_secs("0").unwrap(), 0);
/// assert_eq!(parse_duration_to_secs("1 hour").unwrap(), 3600);
/// assert_eq!(parse_duration_to_secs("1h 1s").unwrap(), 3601);
/// assert_eq!(parse_duration_to_secs("7d").unwrap(), 604800);
/// ```
pub fn parse_duration_to_secs(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input == "0" {
        return Ok(0);
    }

    humantime::parse_duration(input)
        .map(|d| d.as_secs())
        .map_err(|e| format!("Invalid duration '{}': {}", input, e))
}
