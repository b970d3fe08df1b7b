use crate::{events::*, sequence::event::Delta};

use super::{errors::MIDIParseError, readers::TrackReader};

/// Decodes the events of one `MTrk` chunk, yielding them with their tick deltas.
///
/// Iteration stops at the end-of-track meta event or at the end of the chunk,
/// whichever comes first. After an error, the parser yields nothing more.
pub struct TrackParser<T: TrackReader> {
    reader: T,
    pushback: Option<u8>,
    prev_command: u8,
    ended: bool,
}

impl<T: TrackReader> TrackParser<T> {
    pub fn new(reader: T) -> Self {
        Self {
            reader,
            pushback: None,
            prev_command: 0,
            ended: false,
        }
    }

    fn read(&mut self) -> Result<u8, MIDIParseError> {
        if let Some(p) = self.pushback.take() {
            return Ok(p);
        }
        self.reader.read()
    }

    fn read_fast(&mut self) -> Result<u8, MIDIParseError> {
        self.reader.read()
    }

    fn read_var_length(&mut self) -> Result<u64, MIDIParseError> {
        let mut n: u64 = 0;
        for _ in 0..4 {
            let byte = self.read()?;
            n = (n << 7) | (byte & 0x7F) as u64;
            if (byte & 0x80) == 0 {
                return Ok(n);
            }
        }
        Err(self.corrupt())
    }

    fn read_data(&mut self) -> Result<Vec<u8>, MIDIParseError> {
        let size = self.read_var_length()?;
        let mut data = Vec::with_capacity(size.min(1 << 16) as usize);
        for _ in 0..size {
            data.push(self.read_fast()?);
        }
        Ok(data)
    }

    fn corrupt(&self) -> MIDIParseError {
        MIDIParseError::CorruptEvent {
            track_number: self.reader.track_number(),
            position: self.reader.pos(),
        }
    }

    fn next_event(&mut self) -> Result<Option<Delta<u64, Event>>, MIDIParseError> {
        let delta = self.read_var_length()?;
        let mut command = self.read()?;
        if command < 0x80 {
            if self.prev_command < 0x80 {
                return Err(self.corrupt());
            }
            self.pushback = Some(command);
            command = self.prev_command;
        }

        let channel = command & 0x0F;
        let event = match command & 0xF0 {
            0x80 => {
                self.prev_command = command;
                let key = self.read()?;
                let _vel = self.read_fast()?;
                Event::new_delta_note_off_event(delta, channel, key)
            }
            0x90 => {
                self.prev_command = command;
                let key = self.read()?;
                let vel = self.read_fast()?;
                if vel == 0 {
                    Event::new_delta_note_off_event(delta, channel, key)
                } else {
                    Event::new_delta_note_on_event(delta, channel, key, vel)
                }
            }
            0xA0 => {
                self.prev_command = command;
                let key = self.read()?;
                let vel = self.read_fast()?;
                Event::new_delta_polyphonic_key_pressure_event(delta, channel, key, vel)
            }
            0xB0 => {
                self.prev_command = command;
                let controller = self.read()?;
                let value = self.read_fast()?;
                Event::new_delta_control_change_event(delta, channel, controller, value)
            }
            0xC0 => {
                self.prev_command = command;
                let program = self.read()?;
                Event::new_delta_program_change_event(delta, channel, program)
            }
            0xD0 => {
                self.prev_command = command;
                let pressure = self.read()?;
                Event::new_delta_channel_pressure_event(delta, channel, pressure)
            }
            0xE0 => {
                self.prev_command = command;
                let var1 = self.read()?;
                let var2 = self.read_fast()?;
                Event::new_delta_pitch_wheel_change_event(
                    delta,
                    channel,
                    (((var2 as i16) << 7) | var1 as i16) - 8192,
                )
            }
            // System messages cancel running status
            _ => {
                self.prev_command = 0;
                match command {
                    0xF0 | 0xF7 => {
                        let data = self.read_data()?;
                        Event::new_delta_system_exclusive_message_event(delta, data)
                    }
                    0xFF => return self.next_meta_event(delta),
                    _ => return Err(self.corrupt()),
                }
            }
        };

        Ok(Some(event))
    }

    fn next_meta_event(&mut self, delta: u64) -> Result<Option<Delta<u64, Event>>, MIDIParseError> {
        let kind = self.read()?;
        let data = self.read_data()?;

        let event = match kind {
            0x2F => {
                self.ended = true;
                return Ok(None);
            }
            0x51 => {
                if data.len() != 3 {
                    return Err(self.corrupt());
                }
                let tempo = data
                    .iter()
                    .fold(0u32, |tempo, b| (tempo << 8) | *b as u32);
                if tempo == 0 {
                    return Err(MIDIParseError::InvalidTempo {
                        track_number: self.reader.track_number(),
                        position: self.reader.pos(),
                    });
                }
                Event::new_delta_tempo_event(delta, tempo)
            }
            0x58 => {
                if data.len() != 4 {
                    return Err(self.corrupt());
                }
                Event::new_delta_time_signature_event(delta, data[0], data[1], data[2], data[3])
            }
            0x59 => {
                if data.len() != 2 {
                    return Err(self.corrupt());
                }
                Event::new_delta_key_signature_event(delta, data[0], data[1])
            }
            _ => match TextEventKind::from_val(kind) {
                Some(text_kind) => Event::new_delta_text_event(delta, text_kind, data),
                None => Event::new_delta_unknown_meta_event(delta, kind, data),
            },
        };

        Ok(Some(event))
    }
}

impl<T: TrackReader> Iterator for TrackParser<T> {
    type Item = Result<Delta<u64, Event>, MIDIParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.ended || self.reader.is_at_end() {
            return None;
        }

        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => {
                self.ended = true;
                Some(Err(e))
            }
        }
    }
}
