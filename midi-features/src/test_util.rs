//! In-memory Standard MIDI File construction for tests

use crate::{
    notes::Note,
    performance::{Instrument, Performance},
};

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

/// One second long notes on `key`, starting at each of `starts`.
pub fn notes_at(key: u8, starts: &[f64]) -> Vec<Note<f64>> {
    starts
        .iter()
        .map(|&start| Note {
            start,
            end: start + 1.0,
            key,
            channel: 0,
            velocity: 100,
        })
        .collect()
}

/// A performance with a single piano instrument.
pub fn perf_from_notes(notes: Vec<Note<f64>>) -> Performance {
    Performance::new(vec![Instrument::from_notes(notes)])
}

pub fn encode_var_length_value(mut val: u64) -> Vec<u8> {
    let mut vec = Vec::new();
    let mut added = 0x00u8;
    loop {
        let v = (val & 0x7F) as u8 | added;
        vec.push(v);
        val >>= 7;
        added = 0x80;
        if val == 0 {
            break;
        }
    }
    vec.reverse();
    vec
}

struct PendingEvent {
    tick: u64,
    // Note offs sort before anything else on the same tick
    rank: u8,
    bytes: Vec<u8>,
}

/// Collects events at absolute ticks and serializes them as an `MTrk` chunk.
#[derive(Default)]
pub struct TrackBuilder {
    events: Vec<PendingEvent>,
}

impl TrackBuilder {
    fn push(mut self, tick: u64, rank: u8, bytes: Vec<u8>) -> Self {
        self.events.push(PendingEvent { tick, rank, bytes });
        self
    }

    /// Event bytes written as-is after the delta time.
    pub fn raw(self, tick: u64, bytes: &[u8]) -> Self {
        self.push(tick, 1, bytes.to_vec())
    }

    /// A note on at `tick` and its note off `len` ticks later.
    pub fn note(self, tick: u64, channel: u8, key: u8, velocity: u8, len: u64) -> Self {
        self.push(tick, 1, vec![0x90 | channel, key, velocity])
            .push(tick + len, 0, vec![0x80 | channel, key, 0x40])
    }

    pub fn tempo(self, tick: u64, tempo: u32) -> Self {
        let [_, a, b, c] = tempo.to_be_bytes();
        self.push(tick, 1, vec![0xFF, 0x51, 0x03, a, b, c])
    }

    pub fn program(self, tick: u64, channel: u8, program: u8) -> Self {
        self.push(tick, 1, vec![0xC0 | channel, program])
    }

    pub fn control(self, tick: u64, channel: u8, controller: u8, value: u8) -> Self {
        self.push(tick, 1, vec![0xB0 | channel, controller, value])
    }

    pub fn text(self, tick: u64) -> Self {
        self.push(tick, 1, vec![0xFF, 0x01, 0x01, b'T'])
    }

    pub fn lyric(self, tick: u64) -> Self {
        self.push(tick, 1, vec![0xFF, 0x05, 0x01, b'L'])
    }

    pub fn marker(self, tick: u64) -> Self {
        self.push(tick, 1, vec![0xFF, 0x06, 0x01, b'M'])
    }

    fn into_chunk(mut self) -> Vec<u8> {
        // Stable, so same-rank events keep insertion order
        self.events.sort_by_key(|e| (e.tick, e.rank));

        let mut data = Vec::new();
        let mut time = 0;
        for event in self.events.iter() {
            data.extend(encode_var_length_value(event.tick - time));
            data.extend_from_slice(&event.bytes);
            time = event.tick;
        }
        data.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        let mut chunk = b"MTrk".to_vec();
        chunk.extend_from_slice(&(data.len() as u32).to_be_bytes());
        chunk.extend(data);
        chunk
    }
}

pub struct SmfBuilder {
    format: u16,
    division: u16,
    tracks: Vec<Vec<u8>>,
}

impl SmfBuilder {
    pub fn new(format: u16, division: u16) -> Self {
        Self {
            format,
            division,
            tracks: Vec::new(),
        }
    }

    pub fn track(mut self, build: impl FnOnce(TrackBuilder) -> TrackBuilder) -> Self {
        self.tracks.push(Self::track_chunk(build));
        self
    }

    /// A standalone `MTrk` chunk.
    pub fn track_chunk(build: impl FnOnce(TrackBuilder) -> TrackBuilder) -> Vec<u8> {
        build(TrackBuilder::default()).into_chunk()
    }

    pub fn build(self) -> Vec<u8> {
        let mut bytes = b"MThd".to_vec();
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&self.format.to_be_bytes());
        bytes.extend_from_slice(&(self.tracks.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&self.division.to_be_bytes());
        for track in self.tracks {
            bytes.extend(track);
        }
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_writes_sorted_deltas() {
        let chunk = SmfBuilder::track_chunk(|t| t.note(0, 0, 60, 100, 200).program(200, 0, 5));
        assert_eq!(
            chunk,
            vec![
                b'M', b'T', b'r', b'k', 0, 0, 0, 16, //
                0x00, 0x90, 60, 100, //
                0x81, 0x48, 0x80, 60, 0x40, //
                0x00, 0xC0, 5, //
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }
}
