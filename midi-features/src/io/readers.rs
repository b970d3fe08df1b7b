use std::{
    io::{Read, Seek, SeekFrom},
    sync::Arc,
};

use super::errors::{MIDILoadError, MIDIParseError};

/// Largest file accepted by [`RAMReader`].
pub const MAX_FILE_SIZE: u64 = 2147483648;

pub trait ReadSeek: Read + Seek {}
impl<T: Read + Seek> ReadSeek for T {}

/// Holds the complete file contents in memory.
#[derive(Debug, Clone)]
pub struct RAMReader {
    bytes: Arc<Vec<u8>>,
}

fn get_reader_len<T: ReadSeek>(reader: &mut T) -> Result<u64, MIDILoadError> {
    let pos = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(0))?;
    Ok(pos)
}

impl RAMReader {
    pub fn new<T: ReadSeek>(mut reader: T) -> Result<RAMReader, MIDILoadError> {
        let length = get_reader_len(&mut reader)?;
        if length > MAX_FILE_SIZE {
            return Err(MIDILoadError::FileTooBig { max: MAX_FILE_SIZE });
        }

        let mut bytes = vec![0; length as usize];
        reader.read_exact(&mut bytes)?;
        Ok(RAMReader {
            bytes: Arc::new(bytes),
        })
    }

    pub fn from_vec(bytes: Vec<u8>) -> Result<RAMReader, MIDILoadError> {
        if bytes.len() as u64 > MAX_FILE_SIZE {
            return Err(MIDILoadError::FileTooBig { max: MAX_FILE_SIZE });
        }
        Ok(RAMReader {
            bytes: Arc::new(bytes),
        })
    }
}

pub trait MIDIReader: std::fmt::Debug {
    type ByteReader: TrackReader;

    fn read_bytes(&self, pos: u64, count: usize) -> Result<&[u8], MIDILoadError>;

    fn len(&self) -> u64;

    fn open_reader(&self, track_number: Option<u32>, start: u64, len: u64) -> Self::ByteReader;
}

impl MIDIReader for RAMReader {
    type ByteReader = FullRamTrackReader;

    fn read_bytes(&self, pos: u64, count: usize) -> Result<&[u8], MIDILoadError> {
        if pos + count as u64 > self.len() {
            return Err(MIDILoadError::CorruptChunks);
        }
        let start = pos as usize;
        Ok(&self.bytes[start..start + count])
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn open_reader(&self, track_number: Option<u32>, start: u64, len: u64) -> FullRamTrackReader {
        FullRamTrackReader {
            track_number,
            start: start as usize,
            pos: start as usize,
            end: (start + len) as usize,
            bytes: self.bytes.clone(),
        }
    }
}

pub trait TrackReader {
    fn read(&mut self) -> Result<u8, MIDIParseError>;

    /// Absolute byte position of the next read
    fn pos(&self) -> u64;

    fn is_at_end(&self) -> bool;

    fn track_number(&self) -> Option<u32>;
}

/// Reads the bytes of a single track chunk out of a shared in-memory file.
pub struct FullRamTrackReader {
    bytes: Arc<Vec<u8>>,
    track_number: Option<u32>,
    start: usize,
    pos: usize,
    end: usize,
}

impl FullRamTrackReader {
    pub fn new(bytes: Arc<Vec<u8>>, pos: usize, end: usize) -> FullRamTrackReader {
        FullRamTrackReader {
            bytes,
            track_number: None,
            start: pos,
            pos,
            end,
        }
    }

    pub fn new_from_vec(bytes: Vec<u8>) -> FullRamTrackReader {
        let len = bytes.len();
        FullRamTrackReader::new(Arc::new(bytes), 0, len)
    }
}

impl TrackReader for FullRamTrackReader {
    #[inline(always)]
    fn read(&mut self) -> Result<u8, MIDIParseError> {
        if self.pos >= self.end || self.pos >= self.bytes.len() {
            return Err(MIDIParseError::UnexpectedTrackEnd {
                track_number: self.track_number,
                track_start: self.start as u64,
                expected_track_end: self.end as u64,
                found_track_end: self.pos as u64,
            });
        }
        let b = self.bytes[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn pos(&self) -> u64 {
        self.pos as u64
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn track_number(&self) -> Option<u32> {
        self.track_number
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_whole_stream_into_memory() {
        let reader = RAMReader::new(Cursor::new(vec![1u8, 2, 3, 4])).unwrap();
        assert_eq!(reader.len(), 4);
        assert_eq!(reader.read_bytes(1, 2).unwrap(), &[2, 3]);
        assert!(matches!(
            reader.read_bytes(3, 2),
            Err(MIDILoadError::CorruptChunks)
        ));
    }

    #[test]
    fn track_reader_stops_at_chunk_end() {
        let reader = RAMReader::from_vec(vec![9, 8, 7, 6]).unwrap();
        let mut track = reader.open_reader(Some(1), 1, 2);
        assert_eq!(track.read().unwrap(), 8);
        assert_eq!(track.read().unwrap(), 7);
        assert!(track.is_at_end());
        match track.read() {
            Err(MIDIParseError::UnexpectedTrackEnd {
                track_number,
                track_start,
                expected_track_end,
                found_track_end,
            }) => {
                assert_eq!(track_number, Some(1));
                assert_eq!(track_start, 1);
                assert_eq!(expected_track_end, 3);
                assert_eq!(found_track_end, 3);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
