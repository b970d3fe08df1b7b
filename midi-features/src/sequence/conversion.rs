mod events_to_notes;

pub use events_to_notes::*;
