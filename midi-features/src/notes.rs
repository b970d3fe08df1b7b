use crate::num::{MIDINum, MIDINumInto};

pub trait MIDINote<T: MIDINum> {
    fn start(&self) -> T;
    fn end(&self) -> T;

    fn key(&self) -> u8;
    fn channel(&self) -> u8;
    fn velocity(&self) -> u8;

    #[inline(always)]
    fn len(&self) -> T {
        self.end() - self.start()
    }

    /// Pitch class of the key, 0 = C through 11 = B
    #[inline(always)]
    fn pitch_class(&self) -> usize {
        self.key() as usize % 12
    }
}

/// A single sounded note. `key` is the MIDI pitch number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note<T: MIDINum> {
    pub start: T,
    pub end: T,
    pub key: u8,
    pub channel: u8,
    pub velocity: u8,
}

impl<T: MIDINum> Note<T> {
    /// Converts the note's times with `convert`, e.g. from ticks to seconds.
    pub fn map_time<ND: MIDINum>(&self, mut convert: impl FnMut(T) -> ND) -> Note<ND> {
        Note {
            start: convert(self.start),
            end: convert(self.end),
            key: self.key,
            channel: self.channel,
            velocity: self.velocity,
        }
    }

    pub fn cast<ND: MIDINum>(&self) -> Note<ND>
    where
        T: MIDINumInto<ND>,
    {
        self.map_time(|t| t.midi_num_into())
    }
}

impl<T: MIDINum> MIDINote<T> for Note<T> {
    #[inline(always)]
    fn start(&self) -> T {
        self.start
    }

    #[inline(always)]
    fn end(&self) -> T {
        self.end
    }

    #[inline(always)]
    fn key(&self) -> u8 {
        self.key
    }

    #[inline(always)]
    fn channel(&self) -> u8 {
        self.channel
    }

    #[inline(always)]
    fn velocity(&self) -> u8 {
        self.velocity
    }
}
