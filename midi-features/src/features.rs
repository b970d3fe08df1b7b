//! Statistics over a [`Performance`](crate::Performance).
//!
//! Every function here is pure: it reads the performance, builds whatever
//! intermediate projection it needs, and returns an owned result.

mod pitch;
mod rhythm;
mod transition;

pub use pitch::*;
pub use rhythm::*;
pub use transition::*;

/// Names of the 12 pitch classes, indexed by `key % 12`.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
