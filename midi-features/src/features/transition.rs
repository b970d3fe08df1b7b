use crate::{notes::MIDINote, performance::Instrument, performance::Performance};

/// Two notes form a transition when the first ends within this many seconds of
/// the second starting.
pub const TRANSITION_TIME_THRESHOLD: f64 = 0.05;

pub type TransitionMatrix = [[f64; 12]; 12];

/// How [`pitch_class_transition_matrix`] scales its counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionNormalization {
    /// Raw transition counts.
    #[default]
    None,
    /// Each row sums to 1. Rows without transitions stay zero.
    Row,
    /// The whole matrix sums to 1. An empty matrix stays zero.
    Total,
}

impl TransitionNormalization {
    /// Maps the numeric modes `0`, `1` and `2`. Anything else falls back to
    /// [`TransitionNormalization::None`] with a warning.
    pub fn from_mode(mode: i64) -> Self {
        match mode {
            0 => TransitionNormalization::None,
            1 => TransitionNormalization::Row,
            2 => TransitionNormalization::Total,
            other => {
                log::warn!(
                    "Unknown transition matrix normalization mode {}, returning raw counts",
                    other
                );
                TransitionNormalization::None
            }
        }
    }
}

fn add_instrument_transitions(instrument: &Instrument, matrix: &mut TransitionMatrix) {
    let notes = &instrument.notes;
    if notes.len() < 2 {
        return;
    }

    for from in notes.iter() {
        for to in notes.iter() {
            if (from.end - to.start).abs() < TRANSITION_TIME_THRESHOLD {
                matrix[from.pitch_class()][to.pitch_class()] += 1.0;
            }
        }
    }
}

/// Counts pitch class transitions over every non-drum instrument, then applies
/// `normalization`.
pub fn pitch_class_transition_matrix(
    perf: &Performance,
    normalization: TransitionNormalization,
) -> TransitionMatrix {
    let mut matrix = [[0.0; 12]; 12];
    for instrument in perf.instruments().iter().filter(|i| !i.is_drum) {
        add_instrument_transitions(instrument, &mut matrix);
    }

    match normalization {
        TransitionNormalization::None => {}
        TransitionNormalization::Row => {
            for row in matrix.iter_mut() {
                let sum: f64 = row.iter().sum();
                let divisor = if sum == 0.0 { 1.0 } else { sum };
                for cell in row.iter_mut() {
                    *cell /= divisor;
                }
            }
        }
        TransitionNormalization::Total => {
            let total: f64 = matrix.iter().flatten().sum();
            if total > 0.0 {
                for cell in matrix.iter_mut().flatten() {
                    *cell /= total;
                }
            }
        }
    }

    matrix
}

/// [`pitch_class_transition_matrix`] with the mode given as `0` (raw), `1` (row)
/// or `2` (total).
pub fn pitch_class_transition_matrix_mode(perf: &Performance, mode: i64) -> TransitionMatrix {
    pitch_class_transition_matrix(perf, TransitionNormalization::from_mode(mode))
}

#[cfg(test)]
mod tests {
    use crate::{
        notes::Note,
        performance::DRUM_CHANNEL,
        test_util::{approx_eq, perf_from_notes},
    };

    use super::*;

    fn note(key: u8, start: f64, end: f64) -> Note<f64> {
        Note {
            start,
            end,
            key,
            channel: 0,
            velocity: 90,
        }
    }

    /// C D E, played legato, then E again after a rest.
    fn melody() -> Performance {
        perf_from_notes(vec![
            note(60, 0.0, 1.0),
            note(62, 1.0, 2.0),
            note(64, 2.02, 3.0),
            note(76, 4.0, 5.0),
        ])
    }

    #[test]
    fn counts_legato_transitions() {
        let matrix = pitch_class_transition_matrix(&melody(), TransitionNormalization::None);
        assert_eq!(matrix[0][2], 1.0);
        assert_eq!(matrix[2][4], 1.0);
        assert_eq!(matrix.iter().flatten().sum::<f64>(), 2.0);
    }

    #[test]
    fn chords_transition_into_every_member() {
        let perf = perf_from_notes(vec![
            note(60, 0.0, 1.0),
            note(64, 1.0, 2.0),
            note(67, 1.0, 2.0),
        ]);
        let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::None);
        assert_eq!(matrix[0][4], 1.0);
        assert_eq!(matrix[0][7], 1.0);
        assert_eq!(matrix.iter().flatten().sum::<f64>(), 2.0);
    }

    #[test]
    fn row_normalization_gives_distributions() {
        let perf = perf_from_notes(vec![
            note(60, 0.0, 1.0),
            note(62, 1.0, 2.0),
            note(64, 1.0, 2.0),
            note(67, 1.0, 2.0),
            note(60, 2.0, 3.0),
        ]);
        let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::Row);
        for row in matrix.iter() {
            let sum: f64 = row.iter().sum();
            assert!(sum == 0.0 || approx_eq(sum, 1.0), "row sums to {sum}");
        }
        assert!(approx_eq(matrix[0][2], 1.0 / 3.0));
        assert_eq!(matrix[11], [0.0; 12]);
    }

    #[test]
    fn total_normalization_sums_to_one() {
        let matrix = pitch_class_transition_matrix(&melody(), TransitionNormalization::Total);
        assert!(approx_eq(matrix.iter().flatten().sum::<f64>(), 1.0));
        assert_eq!(matrix[0][2], 0.5);
    }

    #[test]
    fn total_normalization_of_nothing_stays_zero() {
        let perf = perf_from_notes(vec![note(60, 0.0, 1.0)]);
        let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::Total);
        assert_eq!(matrix, [[0.0; 12]; 12]);
    }

    #[test]
    fn drums_are_ignored() {
        let mut drums = Instrument::new(0, DRUM_CHANNEL, 0);
        drums.notes = vec![note(36, 0.0, 0.5), note(38, 0.5, 1.0)];
        let perf = Performance::new(vec![drums]);

        let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::None);
        assert_eq!(matrix, [[0.0; 12]; 12]);
    }

    #[test]
    fn instruments_are_summed_separately() {
        // The second instrument's note would follow the first's, but they are
        // never paired across instruments
        let a = Instrument::from_notes(vec![note(60, 0.0, 1.0), note(62, 1.0, 2.0)]);
        let b = Instrument::from_notes(vec![note(65, 2.0, 3.0), note(67, 3.0, 4.0)]);
        let perf = Performance::new(vec![a, b]);

        let matrix = pitch_class_transition_matrix(&perf, TransitionNormalization::None);
        assert_eq!(matrix[0][2], 1.0);
        assert_eq!(matrix[5][7], 1.0);
        assert_eq!(matrix[2][5], 0.0);
    }

    #[test]
    fn numeric_modes() {
        assert_eq!(TransitionNormalization::from_mode(0), TransitionNormalization::None);
        assert_eq!(TransitionNormalization::from_mode(1), TransitionNormalization::Row);
        assert_eq!(TransitionNormalization::from_mode(2), TransitionNormalization::Total);
        assert_eq!(TransitionNormalization::from_mode(7), TransitionNormalization::None);
        assert_eq!(TransitionNormalization::from_mode(-1), TransitionNormalization::None);
        assert_eq!(TransitionNormalization::default(), TransitionNormalization::None);

        let perf = melody();
        assert_eq!(
            pitch_class_transition_matrix_mode(&perf, 5),
            pitch_class_transition_matrix(&perf, TransitionNormalization::None)
        );
        assert_eq!(
            pitch_class_transition_matrix_mode(&perf, 1),
            pitch_class_transition_matrix(&perf, TransitionNormalization::Row)
        );
    }
}
