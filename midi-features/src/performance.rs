//! The parsed, time-resolved view of a MIDI file that every statistic consumes

use std::{collections::HashMap, io::Cursor, path::Path};

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::{
    error::{FeatureError, PerformanceLoadError},
    io::{MIDIFile, MIDILoadError, RAMReader, ReadSeek},
    notes::Note,
    sequence::{
        conversion::{events_to_track_contents, TrackContents, TrackItem},
        event::{TempoMap, Timebase},
    },
};

/// MIDI channel 10, reserved for percussion.
pub const DRUM_CHANNEL: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlChange {
    pub time: f64,
    pub controller: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchBend {
    pub time: f64,
    pub pitch: i16,
}

/// The notes and controller data of one `(track, channel, program)` combination.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    pub program: u8,
    pub channel: u8,
    pub track: u32,
    pub is_drum: bool,
    pub notes: Vec<Note<f64>>,
    pub control_changes: Vec<ControlChange>,
    pub pitch_bends: Vec<PitchBend>,
}

impl Instrument {
    pub fn new(program: u8, channel: u8, track: u32) -> Self {
        Self {
            program,
            channel,
            track,
            is_drum: channel == DRUM_CHANNEL,
            notes: Vec::new(),
            control_changes: Vec::new(),
            pitch_bends: Vec::new(),
        }
    }

    /// A piano (program 0, channel 0) holding `notes`.
    pub fn from_notes(notes: Vec<Note<f64>>) -> Self {
        Self {
            notes,
            ..Self::new(0, 0, 0)
        }
    }

    /// Latest note end, control change or pitch bend, 0 if there are none.
    pub fn end_time(&self) -> f64 {
        let note_ends = self.notes.iter().map(|n| n.end);
        let controls = self.control_changes.iter().map(|c| c.time);
        let bends = self.pitch_bends.iter().map(|b| b.time);
        note_ends.chain(controls).chain(bends).fold(0.0, f64::max)
    }

    pub fn onsets(&self) -> impl Iterator<Item = f64> + '_ {
        self.notes.iter().map(|n| n.start)
    }
}

/// A fully loaded MIDI performance. Read-only once built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Performance {
    instruments: Vec<Instrument>,
    end_time: f64,
}

impl Performance {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        let end_time = instruments
            .iter()
            .map(|i| i.end_time())
            .fold(0.0, f64::max);
        Self {
            instruments,
            end_time,
        }
    }

    /// Pushes the end time out to `time` if it is later than the current end.
    pub fn with_end_time_at_least(mut self, time: f64) -> Self {
        self.end_time = self.end_time.max(time);
        self
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// The track the piano roll statistics look at.
    pub fn first_instrument(&self) -> Option<&Instrument> {
        self.instruments.first()
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn notes(&self) -> impl Iterator<Item = &Note<f64>> {
        self.instruments.iter().flat_map(|i| i.notes.iter())
    }

    pub fn note_count(&self) -> usize {
        self.instruments.iter().map(|i| i.notes.len()).sum()
    }

    /// Every note start in the performance, drums included, sorted ascending.
    pub fn onsets(&self) -> Vec<f64> {
        let mut onsets: Vec<f64> = self.instruments.iter().flat_map(|i| i.onsets()).collect();
        onsets.sort_by(f64::total_cmp);
        onsets
    }

    pub fn from_midi_file(file: &MIDIFile<RAMReader>) -> Result<Self, PerformanceLoadError> {
        let timebase = Timebase::from_division(file.division())
            .ok_or(MIDILoadError::UnsupportedDivision(file.division()))?;

        let tracks = (0..file.track_count() as u32)
            .into_par_iter()
            .map(|i| events_to_track_contents(file.iter_track(i)))
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!(
            "Parsed {} tracks (format {}, division {:#06x})",
            tracks.len(),
            file.format(),
            file.division()
        );

        // Only the first track's tempo events are honoured
        let tempos = tracks
            .first()
            .map(|t| t.tempos.clone())
            .unwrap_or_default();
        let last_tempo = tempos.last().map(|&(tick, _)| tick);
        let tempo_map = TempoMap::new(timebase, tempos);

        let perf = Self::from_track_contents(tracks, &tempo_map);
        Ok(match last_tempo {
            Some(tick) => perf.with_end_time_at_least(tempo_map.ticks_to_seconds(tick)),
            None => perf,
        })
    }

    fn from_track_contents(tracks: Vec<TrackContents<u64>>, tempo_map: &TempoMap) -> Self {
        let mut instruments: Vec<Instrument> = Vec::new();
        let mut lookup: HashMap<(u32, u8, u8), usize> = HashMap::new();
        let mut last_meta = 0.0f64;
        let seconds = |tick: u64| tempo_map.ticks_to_seconds(tick);

        for (track, contents) in tracks.into_iter().enumerate() {
            let track = track as u32;
            if contents.dangling_notes > 0 {
                log::debug!(
                    "Dropped {} unterminated notes on track {}",
                    contents.dangling_notes,
                    track
                );
            }
            if let Some(t) = contents.last_meta_time {
                last_meta = last_meta.max(seconds(t));
            }

            for (program, item) in contents.items {
                let channel = item.channel();
                let index = *lookup.entry((track, channel, program)).or_insert_with(|| {
                    instruments.push(Instrument::new(program, channel, track));
                    instruments.len() - 1
                });
                let instrument = &mut instruments[index];

                match item {
                    TrackItem::Note(note) => instrument.notes.push(note.map_time(seconds)),
                    TrackItem::ControlChange {
                        time,
                        controller,
                        value,
                        ..
                    } => instrument.control_changes.push(ControlChange {
                        time: seconds(time),
                        controller,
                        value,
                    }),
                    TrackItem::PitchBend { time, pitch, .. } => {
                        instrument.pitch_bends.push(PitchBend {
                            time: seconds(time),
                            pitch,
                        })
                    }
                }
            }
        }

        Performance::new(instruments).with_end_time_at_least(last_meta)
    }

    pub fn from_reader<T: ReadSeek>(reader: T) -> Result<Self, PerformanceLoadError> {
        let file = MIDIFile::open_from_stream_in_ram(reader, None)?;
        Self::from_midi_file(&file)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PerformanceLoadError> {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Reads and parses the MIDI file at `path`.
///
/// Fails with [`FeatureError::Parse`] if the file is missing, unreadable or not
/// a valid format 0/1 Standard MIDI File.
pub fn load(path: impl AsRef<Path>) -> Result<Performance, FeatureError> {
    let path = path.as_ref();
    let file = MIDIFile::open_in_ram(path, None).map_err(|e| FeatureError::parse(path, e))?;
    Performance::from_midi_file(&file).map_err(|e| FeatureError::parse(path, e))
}

/// Loads every path in order, stopping at the first failure.
pub fn load_many<P: AsRef<Path>>(
    paths: impl IntoIterator<Item = P>,
) -> Result<Vec<Performance>, FeatureError> {
    paths.into_iter().map(load).collect()
}
