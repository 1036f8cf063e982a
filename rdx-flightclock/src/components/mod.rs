//! Contains the stateful building blocks the engine drives.
//!
//! None of these types own a timer or an audio output. They hold session
//! state and make decisions; `FlightClockEngine` supplies the cadence and
//! carries out the side effects.

pub mod alarm;
pub mod countdown;
pub mod cue;
