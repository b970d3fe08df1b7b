use std::{fs::File, path::Path};

use crate::{events::Event, sequence::event::Delta};

use super::{
    errors::{MIDILoadError, MIDIParseError},
    readers::{MIDIReader, RAMReader, ReadSeek},
    track_parser::TrackParser,
};

#[derive(Debug)]
struct TrackPos {
    pos: u64,
    len: u32,
}

/// The chunk index of a Standard MIDI File. Tracks are decoded lazily through
/// [`iter_track`](MIDIFile::iter_track).
#[derive(Debug)]
pub struct MIDIFile<T: MIDIReader> {
    reader: T,
    track_positions: Vec<TrackPos>,

    format: u16,
    division: u16,
}

fn bytes_to_val(bytes: &[u8]) -> u32 {
    debug_assert!(bytes.len() <= 4);
    bytes.iter().fold(0u32, |num, b| (num << 8) + *b as u32)
}

impl<T: MIDIReader> MIDIFile<T> {
    fn new_from_reader(
        reader: T,
        mut read_progress: Option<&mut dyn FnMut(u32)>,
    ) -> Result<Self, MIDILoadError> {
        fn read_chunk_header<T: MIDIReader>(
            reader: &T,
            pos: u64,
        ) -> Result<([u8; 4], u32), MIDILoadError> {
            let bytes = reader.read_bytes(pos, 8)?;
            let (kind, len) = bytes.split_at(4);
            let mut header = [0u8; 4];
            header.copy_from_slice(kind);
            Ok((header, bytes_to_val(len)))
        }

        let mut pos = 0u64;

        let (kind, header_len) = read_chunk_header(&reader, pos)?;
        pos += 8;
        if &kind != b"MThd" || header_len < 6 || pos + header_len as u64 > reader.len() {
            return Err(MIDILoadError::CorruptChunks);
        }

        let (format, division) = {
            let header_data = reader.read_bytes(pos, 6)?;
            let (format_bytes, rest) = header_data.split_at(2);
            let (_, division_bytes) = rest.split_at(2);
            (
                bytes_to_val(format_bytes) as u16,
                bytes_to_val(division_bytes) as u16,
            )
        };
        pos += header_len as u64;

        if format > 1 {
            return Err(MIDILoadError::UnsupportedFormat(format));
        }

        let mut track_count = 0;
        let mut track_positions = Vec::<TrackPos>::new();
        while pos < reader.len() {
            let (kind, len) = read_chunk_header(&reader, pos)?;
            pos += 8;
            if pos + len as u64 > reader.len() {
                return Err(MIDILoadError::CorruptChunks);
            }

            // Unknown chunk types must be skipped
            if &kind == b"MTrk" {
                track_count += 1;
                track_positions.push(TrackPos { len, pos });
                if let Some(progress) = read_progress.as_mut() {
                    progress(track_count);
                }
            }
            pos += len as u64;
        }

        track_positions.shrink_to_fit();
        Ok(MIDIFile {
            reader,
            division,
            format,
            track_positions,
        })
    }

    pub fn open_track_reader(&self, track: u32) -> T::ByteReader {
        let pos = &self.track_positions[track as usize];
        self.reader
            .open_reader(Some(track), pos.pos, pos.len as u64)
    }

    pub fn iter_track(
        &self,
        track: u32,
    ) -> impl Iterator<Item = Result<Delta<u64, Event>, MIDIParseError>> {
        TrackParser::new(self.open_track_reader(track))
    }

    pub fn iter_all_tracks(
        &self,
    ) -> impl Iterator<Item = impl Iterator<Item = Result<Delta<u64, Event>, MIDIParseError>>> + '_
    {
        (0..self.track_count() as u32).map(move |i| self.iter_track(i))
    }

    pub fn format(&self) -> u16 {
        self.format
    }

    /// The raw division field from the header (ppq, or SMPTE timing if the top bit is set).
    pub fn division(&self) -> u16 {
        self.division
    }

    pub fn track_count(&self) -> usize {
        self.track_positions.len()
    }
}

impl MIDIFile<RAMReader> {
    pub fn open_in_ram(
        filename: impl AsRef<Path>,
        read_progress: Option<&mut dyn FnMut(u32)>,
    ) -> Result<Self, MIDILoadError> {
        let reader = File::open(filename)?;
        let reader = RAMReader::new(reader)?;

        MIDIFile::new_from_reader(reader, read_progress)
    }

    pub fn open_from_stream_in_ram<S: ReadSeek>(
        stream: S,
        read_progress: Option<&mut dyn FnMut(u32)>,
    ) -> Result<Self, MIDILoadError> {
        let reader = RAMReader::new(stream)?;

        MIDIFile::new_from_reader(reader, read_progress)
    }

    pub fn from_bytes(
        bytes: Vec<u8>,
        read_progress: Option<&mut dyn FnMut(u32)>,
    ) -> Result<Self, MIDILoadError> {
        let reader = RAMReader::from_vec(bytes)?;

        MIDIFile::new_from_reader(reader, read_progress)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::test_util::SmfBuilder;

    use super::*;

    #[test]
    fn indexes_tracks_and_skips_unknown_chunks() {
        let mut bytes = SmfBuilder::new(1, 480)
            .track(|t| t.note(0, 0, 60, 100, 480))
            .build();
        // Alien chunk between tracks
        bytes.extend_from_slice(b"XFIH\x00\x00\x00\x02ab");
        bytes.extend_from_slice(&SmfBuilder::track_chunk(|t| t.note(0, 1, 62, 100, 240)));

        let mut seen = Vec::new();
        let mut progress = |n: u32| seen.push(n);
        let file =
            MIDIFile::open_from_stream_in_ram(Cursor::new(bytes), Some(&mut progress)).unwrap();

        assert_eq!(file.track_count(), 2);
        assert_eq!(file.format(), 1);
        assert_eq!(file.division(), 480);
        assert_eq!(seen, vec![1, 2]);

        let counts: Vec<usize> = file.iter_all_tracks().map(|t| t.count()).collect();
        assert_eq!(counts, vec![2, 2]);
    }

    #[test]
    fn rejects_missing_header() {
        let result = MIDIFile::from_bytes(b"MTrk\x00\x00\x00\x00".to_vec(), None);
        assert!(matches!(result, Err(MIDILoadError::CorruptChunks)));
    }

    #[test]
    fn rejects_truncated_track_chunk() {
        let mut bytes = SmfBuilder::new(0, 96).build();
        bytes.extend_from_slice(b"MTrk\x00\x00\x00\x10\x00\x90");
        let result = MIDIFile::from_bytes(bytes, None);
        assert!(matches!(result, Err(MIDILoadError::CorruptChunks)));
    }

    #[test]
    fn rejects_format_two() {
        let bytes = SmfBuilder::new(2, 96).build();
        let result = MIDIFile::from_bytes(bytes, None);
        assert!(matches!(result, Err(MIDILoadError::UnsupportedFormat(2))));
    }

    #[test]
    fn missing_file_is_a_filesystem_error() {
        let result = MIDIFile::open_in_ram("/definitely/not/here.mid", None);
        assert!(matches!(result, Err(MIDILoadError::FilesystemError(_))));
    }
}
