use super::{ChannelEvent, KeyEvent};

#[derive(Debug, Clone, PartialEq, Copy)]
pub enum TextEventKind {
    TextEvent = 1,
    CopyrightNotice = 2,
    TrackName = 3,
    InstrumentName = 4,
    Lyric = 5,
    Marker = 6,
    CuePoint = 7,
    ProgramName = 8,
    DeviceName = 9,
    Undefined = 10,
    MetaEvent = 0x7F,
}

impl TextEventKind {
    pub fn from_val(val: u8) -> Option<TextEventKind> {
        match val {
            1 => Some(TextEventKind::TextEvent),
            2 => Some(TextEventKind::CopyrightNotice),
            3 => Some(TextEventKind::TrackName),
            4 => Some(TextEventKind::InstrumentName),
            5 => Some(TextEventKind::Lyric),
            6 => Some(TextEventKind::Marker),
            7 => Some(TextEventKind::CuePoint),
            8 => Some(TextEventKind::ProgramName),
            9 => Some(TextEventKind::DeviceName),
            10 => Some(TextEventKind::Undefined),
            0x7F => Some(TextEventKind::MetaEvent),
            _ => None,
        }
    }
}

macro_rules! impl_channel_event {
    ($name:ident) => {
        impl ChannelEvent for $name {
            #[inline(always)]
            fn channel(&self) -> u8 {
                self.channel
            }
        }
    };
}

macro_rules! impl_key_event {
    ($name:ident) => {
        impl_channel_event!($name);

        impl KeyEvent for $name {
            #[inline(always)]
            fn key(&self) -> u8 {
                self.key
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteOnEvent {
    pub channel: u8,
    pub key: u8,
    pub velocity: u8,
}
impl_key_event!(NoteOnEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct NoteOffEvent {
    pub channel: u8,
    pub key: u8,
}
impl_key_event!(NoteOffEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct PolyphonicKeyPressureEvent {
    pub channel: u8,
    pub key: u8,
    pub velocity: u8,
}
impl_key_event!(PolyphonicKeyPressureEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct ControlChangeEvent {
    pub channel: u8,
    pub controller: u8,
    pub value: u8,
}
impl_channel_event!(ControlChangeEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramChangeEvent {
    pub channel: u8,
    pub program: u8,
}
impl_channel_event!(ProgramChangeEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelPressureEvent {
    pub channel: u8,
    pub pressure: u8,
}
impl_channel_event!(ChannelPressureEvent);

/// Pitch wheel position, centered on 0 (range -8192..=8191).
#[derive(Debug, Clone, PartialEq)]
pub struct PitchWheelChangeEvent {
    pub channel: u8,
    pub pitch: i16,
}
impl_channel_event!(PitchWheelChangeEvent);

#[derive(Debug, Clone, PartialEq)]
pub struct SystemExclusiveMessageEvent {
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub kind: TextEventKind,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnknownMetaEvent {
    pub kind: u8,
    pub bytes: Vec<u8>,
}

/// Microseconds per quarter note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempoEvent {
    pub tempo: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSignatureEvent {
    pub numerator: u8,
    pub denominator: u8,
    pub ticks_per_click: u8,
    pub bb: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeySignatureEvent {
    pub sf: u8,
    pub tonality: u8,
}
