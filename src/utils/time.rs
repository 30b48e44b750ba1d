//! Time formatting utilities

/// Tolerance used when comparing clip boundaries against a probed duration
pub const BOUNDARY_EPSILON: f64 = 1e-3;

/// Format seconds as an ffmpeg time argument with microsecond precision,
/// trimming trailing zeros (`35`, `34.5`, `0.04`)
pub fn format_ffmpeg_seconds(seconds: f64) -> String {
    let formatted = format!("{:.6}", seconds.max(0.0));
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Number of segments of `interval` seconds needed to cover `duration`.
/// A remainder no longer than `BOUNDARY_EPSILON` seconds does not start a segment.
pub fn segment_count(duration: f64, interval: f64) -> u32 {
    if duration <= 0.0 || interval <= 0.0 {
        return 0;
    }
    let whole = (duration / interval).floor();
    let remainder = duration - whole * interval;
    let count = if remainder > BOUNDARY_EPSILON {
        whole + 1.0
    } else {
        whole
    };
    count.max(1.0) as u32
}
