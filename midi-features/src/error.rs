//! Error types for loading performances and computing statistics

use std::path::PathBuf;

use thiserror::Error;

use crate::io::{MIDILoadError, MIDIParseError};

/// Why a MIDI byte stream could not be turned into a [`Performance`](crate::Performance).
#[derive(Debug, Error)]
pub enum PerformanceLoadError {
    #[error(transparent)]
    Load(#[from] MIDILoadError),
    #[error(transparent)]
    Parse(#[from] MIDIParseError),
}

/// Errors surfaced by the feature extraction functions.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// The file is missing, unreadable, or not a valid Standard MIDI File.
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PerformanceLoadError,
    },

    /// Same as [`FeatureError::Parse`], for data that did not come from a path.
    #[error("Failed to parse MIDI data: {0}")]
    ParseStream(#[from] PerformanceLoadError),

    /// The statistic needs notes (or piano roll activation) and there are none.
    #[error("Cannot compute {statistic} of an empty performance")]
    EmptyPerformance { statistic: &'static str },

    /// The statistic needs more data points than the performance has.
    #[error("Cannot compute {statistic}: needs at least {required} data points, found {found}")]
    InsufficientData {
        statistic: &'static str,
        required: usize,
        found: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl FeatureError {
    pub(crate) fn parse(path: impl Into<PathBuf>, source: impl Into<PerformanceLoadError>) -> Self {
        FeatureError::Parse {
            path: path.into(),
            source: source.into(),
        }
    }

    /// True for [`Parse`](FeatureError::Parse) and [`ParseStream`](FeatureError::ParseStream)
    pub fn is_parse_error(&self) -> bool {
        matches!(self, FeatureError::Parse { .. } | FeatureError::ParseStream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_the_file() {
        let err = FeatureError::parse("songs/a.mid", MIDILoadError::CorruptChunks);
        assert_eq!(err.to_string(), "Failed to parse songs/a.mid: Corrupt chunks");
        assert!(err.is_parse_error());
    }

    #[test]
    fn insufficient_data_message() {
        let err = FeatureError::InsufficientData {
            statistic: "average inter-onset interval",
            required: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Cannot compute average inter-onset interval: needs at least 2 data points, found 1"
        );
        assert!(!err.is_parse_error());
    }
}
