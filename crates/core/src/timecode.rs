//! Human-readable media time formatting.

use crate::types::Seconds;

/// Format a media time as `HH:MM:SS`, truncating fractional seconds.
///
/// Negative and non-finite inputs format as `00:00:00`. Hours are not
/// wrapped, so times past 99 hours print with more digits.
pub fn format_hms(seconds: Seconds) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}
