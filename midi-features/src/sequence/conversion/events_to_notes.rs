use crate::{
    events::{Event, MIDIEvent},
    notes::Note,
    num::MIDINum,
    sequence::event::{to_absolute_times, Delta},
};

// ==============
// Helper structs
// ==============

#[derive(Debug, Clone, Copy)]
struct OpenNote<T: MIDINum> {
    start: T,
    velocity: u8,
}

/// Notes that have started but not yet ended, per channel and key.
struct NoteQueue<T: MIDINum> {
    keys: Vec<Vec<OpenNote<T>>>,
}

impl<T: MIDINum> NoteQueue<T> {
    fn new() -> Self {
        let mut keys = Vec::new();
        for _ in 0..(128 * 16) {
            keys.push(Vec::new());
        }

        Self { keys }
    }

    #[inline(always)]
    fn get_queue(&mut self, key: u8, channel: u8) -> &mut Vec<OpenNote<T>> {
        &mut self.keys[(key & 0x7F) as usize * 16 + (channel & 0x0F) as usize]
    }

    #[inline(always)]
    fn push(&mut self, key: u8, channel: u8, start: T, velocity: u8) {
        self.get_queue(key, channel)
            .push(OpenNote { start, velocity });
    }

    /// Ends every open note on this key that started before `end`.
    ///
    /// Notes that started exactly at `end` stay open if at least one earlier
    /// note was closed, otherwise they are discarded along with the off event.
    fn end_all_before(&mut self, key: u8, channel: u8, end: T, mut emit: impl FnMut(Note<T>)) {
        let queue = self.get_queue(key, channel);
        if queue.is_empty() {
            return;
        }

        let mut keep = Vec::new();
        let mut closed_any = false;
        for open in queue.drain(..) {
            if open.start != end {
                closed_any = true;
                emit(Note {
                    start: open.start,
                    end,
                    key,
                    channel,
                    velocity: open.velocity,
                });
            } else {
                keep.push(open);
            }
        }

        if closed_any {
            *queue = keep;
        }
    }

    fn open_count(&self) -> usize {
        self.keys.iter().map(|k| k.len()).sum()
    }
}

// ==============
// Track contents
// ==============

/// A channel-level item of a track, in the order it completed.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackItem<T: MIDINum> {
    Note(Note<T>),
    ControlChange {
        time: T,
        channel: u8,
        controller: u8,
        value: u8,
    },
    PitchBend {
        time: T,
        channel: u8,
        pitch: i16,
    },
}

impl<T: MIDINum> TrackItem<T> {
    pub fn channel(&self) -> u8 {
        match self {
            TrackItem::Note(n) => n.channel,
            TrackItem::ControlChange { channel, .. } => *channel,
            TrackItem::PitchBend { channel, .. } => *channel,
        }
    }
}

/// Everything the feature extractor needs from one track, with absolute times.
#[derive(Debug, Clone)]
pub struct TrackContents<T: MIDINum> {
    /// Items paired with the program in force on their channel when they completed.
    pub items: Vec<(u8, TrackItem<T>)>,
    /// Absolute time and tempo of each tempo event, in order.
    pub tempos: Vec<(T, u32)>,
    /// Time of the last text, time signature or key signature event.
    pub last_meta_time: Option<T>,
    /// Notes that were never ended before the track finished.
    pub dangling_notes: usize,
}

/// Walks a track's events and pairs note on/off events into notes.
///
/// A note off (or a note on with zero velocity) ends every open note on the
/// same channel and key that started earlier. Notes still sounding when the
/// track ends are dropped and counted in `dangling_notes`.
pub fn events_to_track_contents<D: MIDINum, Err>(
    iter: impl Iterator<Item = Result<Delta<D, Event>, Err>>,
) -> Result<TrackContents<D>, Err> {
    let mut note_queue = NoteQueue::<D>::new();
    let mut programs = [0u8; 16];

    let mut items = Vec::new();
    let mut tempos = Vec::new();
    let mut last_meta_time = None;

    for e in to_absolute_times(iter) {
        let (time, event) = e?;
        let channel = event.channel().unwrap_or(0) & 0x0F;
        match &event {
            Event::NoteOn(e) => note_queue.push(e.key, e.channel, time, e.velocity),
            Event::NoteOff(e) => {
                let program = programs[channel as usize];
                note_queue.end_all_before(e.key, e.channel, time, |note| {
                    items.push((program, TrackItem::Note(note)))
                });
            }
            Event::ProgramChange(e) => programs[channel as usize] = e.program,
            Event::ControlChange(e) => items.push((
                programs[channel as usize],
                TrackItem::ControlChange {
                    time,
                    channel,
                    controller: e.controller,
                    value: e.value,
                },
            )),
            Event::PitchWheelChange(e) => items.push((
                programs[channel as usize],
                TrackItem::PitchBend {
                    time,
                    channel,
                    pitch: e.pitch,
                },
            )),
            Event::Tempo(e) => tempos.push((time, e.tempo)),
            e if e.is_timed_meta() => last_meta_time = Some(time),
            _ => {}
        }
    }

    Ok(TrackContents {
        items,
        tempos,
        last_meta_time,
        dangling_notes: note_queue.open_count(),
    })
}
