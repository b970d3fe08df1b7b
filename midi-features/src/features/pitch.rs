use crate::{
    error::FeatureError,
    performance::Performance,
    piano_roll::{PIANO_ROLL_FS, PITCH_COUNT, SUSTAIN_PEDAL_THRESHOLD},
};

/// Per-pitch piano roll activation of the performance's first instrument.
///
/// Only the first instrument is looked at, other tracks are ignored. A
/// performance without instruments has no activation at all.
pub fn first_instrument_pitch_totals(perf: &Performance) -> [f64; PITCH_COUNT] {
    match perf.first_instrument() {
        Some(instrument) => instrument
            .render_piano_roll(PIANO_ROLL_FS, Some(SUSTAIN_PEDAL_THRESHOLD))
            .pitch_totals(),
        None => [0.0; PITCH_COUNT],
    }
}

fn count_used(totals: &[f64; PITCH_COUNT]) -> usize {
    totals.iter().filter(|&&t| t > 0.0).count()
}

/// Number of distinct MIDI pitches sounding in the first instrument (0..=128).
pub fn used_pitch(perf: &Performance) -> usize {
    count_used(&first_instrument_pitch_totals(perf))
}

/// Number of distinct MIDI pitches sounding in the first instrument of any of
/// the given performances.
pub fn used_pitch_multiple<'a>(perfs: impl IntoIterator<Item = &'a Performance>) -> usize {
    let mut totals = [0.0; PITCH_COUNT];
    for perf in perfs {
        let perf_totals = first_instrument_pitch_totals(perf);
        for (total, add) in totals.iter_mut().zip(perf_totals.iter()) {
            *total += add;
        }
    }
    count_used(&totals)
}

/// Duration and velocity weighted distribution of the first instrument over the
/// 12 pitch classes. Sums to 1.
///
/// Fails with [`FeatureError::EmptyPerformance`] if nothing sounds.
pub fn pitch_class_histogram(perf: &Performance) -> Result<[f64; 12], FeatureError> {
    let totals = first_instrument_pitch_totals(perf);

    let mut histogram = [0.0; 12];
    for (key, total) in totals.iter().enumerate() {
        histogram[key % 12] += total;
    }

    let sum: f64 = histogram.iter().sum();
    if sum <= 0.0 {
        return Err(FeatureError::EmptyPerformance {
            statistic: "pitch class histogram",
        });
    }

    for bin in histogram.iter_mut() {
        *bin /= sum;
    }
    Ok(histogram)
}
