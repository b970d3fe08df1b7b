use std::ops::Deref;

use crate::{events::MIDIEvent, num::MIDINum};

/// An event paired with the time elapsed since the previous event in its sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta<D: MIDINum, E> {
    pub delta: D,
    pub event: E,
}

impl<D: MIDINum, E> Delta<D, E> {
    #[inline(always)]
    pub fn new(delta: D, event: E) -> Self {
        Self { delta, event }
    }
}

impl<D: MIDINum, E> Deref for Delta<D, E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.event
    }
}

impl<D: MIDINum, E: MIDIEvent> MIDIEvent for Delta<D, E> {
    fn key(&self) -> Option<u8> {
        self.event.key()
    }

    fn channel(&self) -> Option<u8> {
        self.event.channel()
    }
}

/// Converts a sequence of relative deltas into absolute times, keeping the events.
pub fn to_absolute_times<D: MIDINum, E, Err>(
    iter: impl Iterator<Item = Result<Delta<D, E>, Err>>,
) -> impl Iterator<Item = Result<(D, E), Err>> {
    let mut time = D::zero();
    iter.map(move |e| {
        let e = e?;
        time += e.delta;
        Ok((time, e.event))
    })
}
