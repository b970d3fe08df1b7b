//! Dense pitch x time projection of an instrument

use crate::{error::FeatureError, performance::Instrument};

/// Frames per second used by every piano roll based statistic.
pub const PIANO_ROLL_FS: f64 = 100.0;

/// Sustain pedal controller number.
pub const SUSTAIN_PEDAL_CONTROLLER: u8 = 64;

/// Pedal values at or above this count as "down".
pub const SUSTAIN_PEDAL_THRESHOLD: u8 = 64;

pub const PITCH_COUNT: usize = 128;

/// A `128 x frames` matrix of summed note velocities.
#[derive(Debug, Clone, PartialEq)]
pub struct PianoRoll {
    frames: usize,
    data: Vec<f64>,
}

impl PianoRoll {
    fn zeros(frames: usize) -> Self {
        Self {
            frames,
            data: vec![0.0; PITCH_COUNT * frames],
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn get(&self, key: u8, frame: usize) -> f64 {
        self.row(key)[frame]
    }

    pub fn row(&self, key: u8) -> &[f64] {
        let start = key as usize * self.frames;
        &self.data[start..start + self.frames]
    }

    fn row_mut(&mut self, key: u8) -> &mut [f64] {
        let start = key as usize * self.frames;
        &mut self.data[start..start + self.frames]
    }

    /// Activation summed over time for each MIDI pitch.
    pub fn pitch_totals(&self) -> [f64; PITCH_COUNT] {
        let mut totals = [0.0; PITCH_COUNT];
        for (key, total) in totals.iter_mut().enumerate() {
            *total = self.row(key as u8).iter().sum();
        }
        totals
    }

    /// Extends sounding pitches through the frames `[from, to)` by taking the
    /// running maximum of each row.
    fn sustain(&mut self, from: usize, to: usize) {
        let to = to.min(self.frames);
        if from >= to {
            return;
        }
        for key in 0..PITCH_COUNT as u8 {
            let row = &mut self.row_mut(key)[from..to];
            for i in 1..row.len() {
                if row[i] < row[i - 1] {
                    row[i] = row[i - 1];
                }
            }
        }
    }
}

#[inline(always)]
fn frame_of(time: f64, fs: f64) -> usize {
    (time * fs) as usize
}

impl Instrument {
    /// Builds the piano roll at `fs` frames per second, applying the sustain pedal.
    ///
    /// The roll spans `floor(fs * end_time)` frames. Each note adds its velocity to
    /// the frames `[floor(start * fs), floor(end * fs))` of its key, so notes
    /// shorter than a frame may not show up at all.
    pub fn piano_roll(&self, fs: f64) -> Result<PianoRoll, FeatureError> {
        self.piano_roll_with_pedal(fs, Some(SUSTAIN_PEDAL_THRESHOLD))
    }

    /// Like [`piano_roll`](Instrument::piano_roll), with a custom pedal threshold
    /// (`None` ignores the pedal).
    pub fn piano_roll_with_pedal(
        &self,
        fs: f64,
        pedal_threshold: Option<u8>,
    ) -> Result<PianoRoll, FeatureError> {
        if !(fs.is_finite() && fs > 0.0) {
            return Err(FeatureError::InvalidArgument(format!(
                "piano roll sampling rate must be positive, got {fs}"
            )));
        }
        Ok(self.render_piano_roll(fs, pedal_threshold))
    }

    /// `fs` must be positive and finite.
    pub(crate) fn render_piano_roll(&self, fs: f64, pedal_threshold: Option<u8>) -> PianoRoll {
        if self.notes.is_empty() {
            return PianoRoll::zeros(0);
        }

        let mut roll = PianoRoll::zeros(frame_of(self.end_time(), fs));
        let frames = roll.frames;

        for note in self.notes.iter() {
            let start = frame_of(note.start, fs).min(frames);
            let end = frame_of(note.end, fs).min(frames);
            let velocity = note.velocity as f64;
            for cell in roll.row_mut(note.key)[start.min(end)..end].iter_mut() {
                *cell += velocity;
            }
        }

        if let Some(threshold) = pedal_threshold {
            let mut pedal_down_at = None;
            for cc in self
                .control_changes
                .iter()
                .filter(|cc| cc.controller == SUSTAIN_PEDAL_CONTROLLER)
            {
                let now = frame_of(cc.time, fs);
                let down = cc.value >= threshold;
                match pedal_down_at {
                    None if down => pedal_down_at = Some(now),
                    Some(from) if !down => {
                        roll.sustain(from, now);
                        pedal_down_at = None;
                    }
                    _ => {}
                }
            }
        }

        roll
    }
}
