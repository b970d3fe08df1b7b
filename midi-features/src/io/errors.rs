use thiserror::Error;

/// Errors raised while reading the file and indexing its chunks.
#[derive(Debug, Error)]
pub enum MIDILoadError {
    #[error("Corrupt chunks")]
    CorruptChunks,
    #[error("Filesystem error: {0}")]
    FilesystemError(#[from] std::io::Error),
    #[error("File too big (the maximum is {max} bytes)")]
    FileTooBig { max: u64 },
    #[error("Unsupported MIDI format {0} (only formats 0 and 1 are supported)")]
    UnsupportedFormat(u16),
    #[error("Unsupported time division {0:#06x}")]
    UnsupportedDivision(u16),
}

/// Errors raised while decoding the events of a track.
#[derive(Debug, Error)]
pub enum MIDIParseError {
    #[error("Corrupt event ({}position: {position:#06x})", track_prefix(.track_number))]
    CorruptEvent {
        track_number: Option<u32>,
        position: u64,
    },
    #[error("Unexpected track end ({}track start: {track_start:#06x}, expected end: {expected_track_end:#06x}, found end: {found_track_end:#06x})", track_prefix(.track_number))]
    UnexpectedTrackEnd {
        track_number: Option<u32>,
        track_start: u64,
        expected_track_end: u64,
        found_track_end: u64,
    },
    #[error("Zero tempo ({}position: {position:#06x})", track_prefix(.track_number))]
    InvalidTempo {
        track_number: Option<u32>,
        position: u64,
    },
}

fn track_prefix(track_number: &Option<u32>) -> String {
    match track_number {
        Some(track_number) => format!("track {track_number}, "),
        None => String::new(),
    }
}
