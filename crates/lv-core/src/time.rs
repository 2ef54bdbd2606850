//! Duration parsing and formatting for simulation exports.
//!
//! Exports write every duration and time of day as `HH:MM:SS`.  Hours are
//! not bounded by 23: a trip departing after midnight of the simulated day
//! reads `25:10:00`, and a very long leg may read `104:00:00`.  All values
//! are converted to whole seconds on read.

use crate::{CoreError, CoreResult};

pub const SECS_PER_MIN:  u64 = 60;
pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_DAY:  u64 = 86_400;

/// Parse `HH:MM:SS` (hours unbounded) into seconds.
///
/// Minutes and seconds must be below 60.  A bare integer is accepted as a
/// number of seconds, which some exports use for `euclidean_distance`-style
/// numeric columns.
pub fn parse_hms(s: &str) -> CoreResult<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(CoreError::Parse("empty duration".into()));
    }

    let parts: Vec<&str> = s.split(':').collect();
    let field = |p: &str| -> CoreResult<u64> {
        p.parse::<u64>()
            .map_err(|_| CoreError::Parse(format!("invalid duration `{s}`")))
    };

    match parts.as_slice() {
        [secs] => field(secs),
        [h, m, sec] => {
            let (h, m, sec) = (field(h)?, field(m)?, field(sec)?);
            if m >= 60 || sec >= 60 {
                return Err(CoreError::Parse(format!("invalid duration `{s}`")));
            }
            h.checked_mul(SECS_PER_HOUR)
                .and_then(|t| t.checked_add(m * SECS_PER_MIN + sec))
                .ok_or_else(|| CoreError::Parse(format!("duration `{s}` out of range")))
        }
        _ => Err(CoreError::Parse(format!("invalid duration `{s}`"))),
    }
}

/// Format seconds as `HH:MM:SS`; hours may exceed 23.
///
/// Fractional input is truncated toward zero; negative input formats as
/// `00:00:00`.
pub fn format_hms(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 { secs as u64 } else { 0 };
    let h = total / SECS_PER_HOUR;
    let m = (total % SECS_PER_HOUR) / SECS_PER_MIN;
    let s = total % SECS_PER_MIN;
    format!("{h:02}:{m:02}:{s:02}")
}

/// Start label (`"HH:MM"`) of the departure interval containing `secs`.
///
/// Intervals are `width_mins` long and aligned to midnight.  Times past
/// 24:00 wrap onto the same clock day, so `25:10:00` falls in `01:00` for a
/// 15-minute width.
pub fn interval_label(secs: u64, width_mins: u32) -> String {
    let width = u64::from(width_mins.max(1)) * SECS_PER_MIN;
    let start = ((secs % SECS_PER_DAY) / width) * width;
    format!("{:02}:{:02}", start / SECS_PER_HOUR, (start % SECS_PER_HOUR) / SECS_PER_MIN)
}

/// Every interval label of one clock day in ascending order.
///
/// Histograms use this to emit zero-count buckets.
pub fn day_intervals(width_mins: u32) -> Vec<String> {
    let width = u64::from(width_mins.max(1)) * SECS_PER_MIN;
    (0..SECS_PER_DAY)
        .step_by(width as usize)
        .map(|t| interval_label(t, width_mins))
        .collect()
}
