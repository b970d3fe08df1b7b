mod delta;
mod tempo;

pub use delta::*;
pub use tempo::*;
