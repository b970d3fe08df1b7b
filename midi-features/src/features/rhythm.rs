use crate::{error::FeatureError, performance::Performance};

/// Window length used by [`note_density`] when none is configured, in seconds.
pub const DEFAULT_DENSITY_INTERVAL: f64 = 5.0;

/// Number of notes in the performance, across all instruments including drums.
pub fn num_notes(perf: &Performance) -> usize {
    perf.note_count()
}

/// Average number of note onsets per window of `interval_seconds`.
///
/// Windows start at 0 and step by `interval_seconds` while the start is before
/// the performance's end time; the last window may run past the end. A note
/// counts towards the window `[start, start + interval)` containing its onset.
pub fn note_density(perf: &Performance, interval_seconds: f64) -> Result<f64, FeatureError> {
    if !(interval_seconds.is_finite() && interval_seconds > 0.0) {
        return Err(FeatureError::InvalidArgument(format!(
            "note density interval must be a positive number of seconds, got {interval_seconds}"
        )));
    }

    let window_count = (perf.end_time() / interval_seconds).ceil();
    if window_count <= 0.0 {
        return Err(FeatureError::EmptyPerformance {
            statistic: "note density",
        });
    }

    // The windows tile [0, horizon) without gaps, so the summed window counts
    // are just the onsets before the horizon
    let horizon = window_count * interval_seconds;
    let counted = perf.onsets().partition_point(|&t| t < horizon);

    Ok(counted as f64 / window_count)
}

/// Mean time between consecutive note onsets, in seconds.
///
/// Fails with [`FeatureError::InsufficientData`] with fewer than two onsets.
pub fn avg_ioi(perf: &Performance) -> Result<f64, FeatureError> {
    let onsets = perf.onsets();
    if onsets.len() < 2 {
        return Err(FeatureError::InsufficientData {
            statistic: "average inter-onset interval",
            required: 2,
            found: onsets.len(),
        });
    }

    let total: f64 = onsets.windows(2).map(|w| w[1] - w[0]).sum();
    Ok(total / (onsets.len() - 1) as f64)
}
