//! Symbolic music statistics over Standard MIDI Files.
//!
//! A file is loaded once into a [`Performance`] (instruments of timed notes,
//! control changes and pitch bends, in seconds). Every statistic in
//! [`features`] is a pure function of a `&Performance`:
//!
//! * [`num_notes`], [`note_density`] and [`avg_ioi`] describe rhythm
//! * [`used_pitch`], [`used_pitch_multiple`] and [`pitch_class_histogram`]
//!   read the piano roll of the first instrument
//! * [`pitch_class_transition_matrix`] counts pitch class movement
//!
//! [`BatchExtractor`] runs the whole set over many files in parallel.

pub mod batch;
pub mod config;
pub mod error;
pub mod events;
pub mod features;
pub mod io;
pub mod notes;
pub mod num;
pub mod performance;
pub mod piano_roll;
pub mod sequence;

#[cfg(test)]
mod test_util;

pub use batch::{extract_features, BatchExtractor, BatchItem, BatchReport, FeatureSummary};
pub use config::FeatureConfig;
pub use error::{FeatureError, PerformanceLoadError};
pub use features::{
    avg_ioi, note_density, num_notes, pitch_class_histogram, pitch_class_transition_matrix,
    pitch_class_transition_matrix_mode, used_pitch, used_pitch_multiple, TransitionNormalization,
};
pub use performance::{load, load_many, Instrument, Performance};
