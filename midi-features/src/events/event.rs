use super::events::*;
use super::{ChannelEvent, KeyEvent, MIDIEvent};
use crate::sequence::event::Delta;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    NoteOn(NoteOnEvent),
    NoteOff(NoteOffEvent),
    PolyphonicKeyPressure(Box<PolyphonicKeyPressureEvent>),
    ControlChange(Box<ControlChangeEvent>),
    ProgramChange(Box<ProgramChangeEvent>),
    ChannelPressure(Box<ChannelPressureEvent>),
    PitchWheelChange(Box<PitchWheelChangeEvent>),
    SystemExclusiveMessage(Box<SystemExclusiveMessageEvent>),
    Text(Box<TextEvent>),
    UnknownMeta(Box<UnknownMetaEvent>),
    Tempo(Box<TempoEvent>),
    TimeSignature(Box<TimeSignatureEvent>),
    KeySignature(Box<KeySignatureEvent>),
}

macro_rules! channel_event_ref {
    ($self:ident, $e:ident => $body:expr, $default:expr) => {
        match $self {
            Event::NoteOn($e) => $body,
            Event::NoteOff($e) => $body,
            Event::PolyphonicKeyPressure($e) => $body,
            Event::ControlChange($e) => $body,
            Event::ProgramChange($e) => $body,
            Event::ChannelPressure($e) => $body,
            Event::PitchWheelChange($e) => $body,
            _ => $default,
        }
    };
}

impl MIDIEvent for Event {
    fn key(&self) -> Option<u8> {
        match self {
            Event::NoteOn(e) => Some(e.key()),
            Event::NoteOff(e) => Some(e.key()),
            Event::PolyphonicKeyPressure(e) => Some(e.key()),
            _ => None,
        }
    }

    fn channel(&self) -> Option<u8> {
        channel_event_ref!(self, e => Some(e.channel()), None)
    }
}

impl Event {
    /// Meta events whose position counts towards a performance's end time:
    /// plain text, lyrics, time signatures and key signatures. Tempo changes
    /// also count, but only from the first track, so they are handled by the
    /// loader.
    pub fn is_timed_meta(&self) -> bool {
        match self {
            Event::Text(e) => matches!(e.kind, TextEventKind::TextEvent | TextEventKind::Lyric),
            Event::TimeSignature(_) | Event::KeySignature(_) => true,
            _ => false,
        }
    }

    pub fn new_delta_note_on_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        key: u8,
        velocity: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::NoteOn(NoteOnEvent {
                channel,
                key,
                velocity,
            }),
        )
    }

    pub fn new_delta_note_off_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        key: u8,
    ) -> Delta<D, Event> {
        Delta::new(delta, Event::NoteOff(NoteOffEvent { channel, key }))
    }

    pub fn new_delta_polyphonic_key_pressure_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        key: u8,
        velocity: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::PolyphonicKeyPressure(Box::new(PolyphonicKeyPressureEvent {
                channel,
                key,
                velocity,
            })),
        )
    }

    pub fn new_delta_control_change_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        controller: u8,
        value: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::ControlChange(Box::new(ControlChangeEvent {
                channel,
                controller,
                value,
            })),
        )
    }

    pub fn new_delta_program_change_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        program: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::ProgramChange(Box::new(ProgramChangeEvent { channel, program })),
        )
    }

    pub fn new_delta_channel_pressure_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        pressure: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::ChannelPressure(Box::new(ChannelPressureEvent { channel, pressure })),
        )
    }

    pub fn new_delta_pitch_wheel_change_event<D: crate::num::MIDINum>(
        delta: D,
        channel: u8,
        pitch: i16,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::PitchWheelChange(Box::new(PitchWheelChangeEvent { channel, pitch })),
        )
    }

    pub fn new_delta_system_exclusive_message_event<D: crate::num::MIDINum>(
        delta: D,
        data: Vec<u8>,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::SystemExclusiveMessage(Box::new(SystemExclusiveMessageEvent { data })),
        )
    }

    pub fn new_delta_text_event<D: crate::num::MIDINum>(
        delta: D,
        kind: TextEventKind,
        bytes: Vec<u8>,
    ) -> Delta<D, Event> {
        Delta::new(delta, Event::Text(Box::new(TextEvent { kind, bytes })))
    }

    pub fn new_delta_unknown_meta_event<D: crate::num::MIDINum>(
        delta: D,
        kind: u8,
        bytes: Vec<u8>,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::UnknownMeta(Box::new(UnknownMetaEvent { kind, bytes })),
        )
    }

    pub fn new_delta_tempo_event<D: crate::num::MIDINum>(delta: D, tempo: u32) -> Delta<D, Event> {
        Delta::new(delta, Event::Tempo(Box::new(TempoEvent { tempo })))
    }

    pub fn new_delta_time_signature_event<D: crate::num::MIDINum>(
        delta: D,
        numerator: u8,
        denominator: u8,
        ticks_per_click: u8,
        bb: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::TimeSignature(Box::new(TimeSignatureEvent {
                numerator,
                denominator,
                ticks_per_click,
                bb,
            })),
        )
    }

    pub fn new_delta_key_signature_event<D: crate::num::MIDINum>(
        delta: D,
        sf: u8,
        tonality: u8,
    ) -> Delta<D, Event> {
        Delta::new(
            delta,
            Event::KeySignature(Box::new(KeySignatureEvent { sf, tonality })),
        )
    }
}
