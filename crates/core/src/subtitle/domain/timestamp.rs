//! SubRip timestamps (`HH:MM:SS,mmm`).
//!
//! Fractional milliseconds are truncated, not rounded. A tolerance of
//! one nanosecond is added before truncation so that decimal inputs
//! such as `1.001` do not lose a millisecond to binary representation.

const TRUNCATION_TOLERANCE_MS: f64 = 1e-6;

/// Whole milliseconds in `seconds`, truncated.
pub fn to_millis(seconds: f64) -> u64 {
    debug_assert!(
        !(seconds < 0.0),
        "timestamp must be non-negative, got {seconds}"
    );
    let seconds = if seconds.is_finite() {
        seconds.max(0.0)
    } else {
        0.0
    };
    (seconds * 1000.0 + TRUNCATION_TOLERANCE_MS).floor() as u64
}

/// Formats a non-negative offset in seconds as `HH:MM:SS,mmm`.
///
/// Hours are zero-padded to two digits but never truncated, so offsets
/// of 100 hours or more render with three or more hour digits.
pub fn format_timestamp(seconds: f64) -> String {
    let ms = to_millis(seconds);
    let hours = ms / 3_600_000;
    let mins = (ms % 3_600_000) / 60_000;
    let secs = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}

/// Parses `H+:MM:SS,mmm` back into seconds. Returns `None` for anything
/// that does not match the format.
pub fn parse_timestamp(s: &str) -> Option<f64> {
    let (clock, millis) = s.trim().split_once(',')?;
    let mut parts = clock.split(':');
    let hours = parse_digits(parts.next()?, 1, usize::MAX)?;
    let mins = parse_digits(parts.next()?, 2, 2)?;
    let secs = parse_digits(parts.next()?, 2, 2)?;
    if parts.next().is_some() || mins >= 60 || secs >= 60 {
        return None;
    }
    let millis = parse_digits(millis, 3, 3)?;

    let total_ms = ((hours * 60 + mins) * 60 + secs) * 1000 + millis;
    Some(total_ms as f64 / 1000.0)
}

fn parse_digits(s: &str, min_len: usize, max_len: usize) -> Option<u64> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
