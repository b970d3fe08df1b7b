/// Tempo assumed until the first tempo event, in microseconds per quarter note (120 BPM).
pub const DEFAULT_TEMPO: u32 = 500000;

/// The time division from the file header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timebase {
    /// Ticks per quarter note; seconds depend on the tempo.
    Metrical { ppq: u16 },
    /// Absolute timing; tempo events have no effect.
    Timecode { frames_per_second: f64, ticks_per_frame: u8 },
}

impl Timebase {
    /// Decodes the 16 bit division field of an `MThd` chunk.
    pub fn from_division(division: u16) -> Option<Self> {
        if division & 0x8000 == 0 {
            if division == 0 {
                return None;
            }
            return Some(Timebase::Metrical { ppq: division });
        }

        let fps = -((division >> 8) as u8 as i8) as i16;
        let ticks_per_frame = (division & 0xFF) as u8;
        let frames_per_second = match fps {
            24 => 24.0,
            25 => 25.0,
            29 => 29.97,
            30 => 30.0,
            _ => return None,
        };
        if ticks_per_frame == 0 {
            return None;
        }

        Some(Timebase::Timecode {
            frames_per_second,
            ticks_per_frame,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct TempoSegment {
    tick: u64,
    seconds: f64,
    tempo: u32,
}

/// Maps absolute tick positions to seconds.
#[derive(Debug, Clone)]
pub struct TempoMap {
    timebase: Timebase,
    segments: Vec<TempoSegment>,
}

impl TempoMap {
    /// Builds the map from `(absolute tick, tempo)` pairs sorted by tick.
    pub fn new(timebase: Timebase, tempos: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let mut segments = Vec::new();
        let mut current = TempoSegment {
            tick: 0,
            seconds: 0.0,
            tempo: DEFAULT_TEMPO,
        };

        if let Timebase::Metrical { ppq } = timebase {
            for (tick, tempo) in tempos {
                // A later tempo on the same tick replaces the earlier one
                if tick == current.tick {
                    current.tempo = tempo;
                    continue;
                }
                let seconds =
                    current.seconds + segment_seconds(tick - current.tick, current.tempo, ppq);
                segments.push(current);
                current = TempoSegment {
                    tick,
                    seconds,
                    tempo,
                };
            }
        }
        segments.push(current);

        Self { timebase, segments }
    }

    /// Number of tempo regions, including the implicit default one at tick 0.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn ticks_to_seconds(&self, tick: u64) -> f64 {
        match self.timebase {
            Timebase::Timecode {
                frames_per_second,
                ticks_per_frame,
            } => tick as f64 / (frames_per_second * ticks_per_frame as f64),
            Timebase::Metrical { ppq } => {
                let index = self.segments.partition_point(|s| s.tick <= tick) - 1;
                let segment = &self.segments[index];
                segment.seconds + segment_seconds(tick - segment.tick, segment.tempo, ppq)
            }
        }
    }
}

#[inline(always)]
fn segment_seconds(ticks: u64, tempo: u32, ppq: u16) -> f64 {
    (ticks as f64 * tempo as f64) / (ppq as f64 * 1000000.0)
}
