pub use event::Event;
pub use events::*;

mod event;
mod events;

pub trait MIDIEvent: std::fmt::Debug {
    fn key(&self) -> Option<u8>;
    fn channel(&self) -> Option<u8>;
}

/// A trait that describes an event that is always connected to a channel
pub trait ChannelEvent {
    fn channel(&self) -> u8;
}

/// A trait that describes an event that is always connected to a key
pub trait KeyEvent: ChannelEvent {
    fn key(&self) -> u8;
}
