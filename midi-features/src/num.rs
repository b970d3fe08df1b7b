use std::{
    fmt::{Debug, Display},
    ops::{AddAssign, SubAssign},
};

use num_traits::Num;

/// Casts a time value (ticks or seconds) into another supported time type.
///
/// Supported: u32, u64, f32, f64
/// ## Example
/// ```
///use midi_features::num::MIDINumInto;
///
///let ticks: u64 = 480;
///
///let as_f64: f64 = ticks.midi_num_into();
///let as_u32: u32 = ticks.midi_num_into();
///
///assert_eq!(as_f64, 480f64);
///assert_eq!(as_u32, 480u32);
/// ```
pub trait MIDINumInto<T: MIDINum> {
    fn midi_num_into(&self) -> T;
}

pub trait MIDINumFrom<T: MIDINum> {
    fn midi_num_from(val: T) -> Self;
}

/// A time type events and notes can be expressed in. Parsed tracks live in
/// `u64` ticks, performances in `f64` seconds.
pub trait MIDINum:
    Num
    + PartialOrd
    + PartialEq
    + AddAssign
    + SubAssign
    + Copy
    + Sized
    + Debug
    + Display
    + Send
    + Sync
    + MIDINumFrom<u32>
    + MIDINumFrom<u64>
    + MIDINumFrom<f32>
    + MIDINumFrom<f64>
    + MIDINumInto<u32>
    + MIDINumInto<u64>
    + MIDINumInto<f32>
    + MIDINumInto<f64>
{
}

macro_rules! impl_num_from_to {
    ($from:ident, $to:ident) => {
        impl MIDINumInto<$to> for $from {
            fn midi_num_into(&self) -> $to {
                *self as $to
            }
        }

        impl MIDINumFrom<$to> for $from {
            fn midi_num_from(val: $to) -> Self {
                val as $from
            }
        }
    };
}

macro_rules! impl_num_from {
    ($from:ident) => {
        impl_num_from_to!($from, u32);
        impl_num_from_to!($from, u64);
        impl_num_from_to!($from, f32);
        impl_num_from_to!($from, f64);
    };
}

impl_num_from!(u32);
impl_num_from!(u64);
impl_num_from!(f32);
impl_num_from!(f64);

impl MIDINum for u32 {}
impl MIDINum for u64 {}
impl MIDINum for f32 {}
impl MIDINum for f64 {}
