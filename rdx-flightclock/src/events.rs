//! Defines all public event types broadcast by the Flightclock engine.
//!
//! This module acts as the public API for the engine's event system. A caller
//! (a shell, a UI) subscribes to these strongly-typed streams to render
//! progress and react to expiry and acknowledgment.

use crate::common::SessionId;
use chrono::{DateTime, Utc};

/// Published once per countdown tick, after the decrement.
///
/// `remaining_seconds` is strictly decreasing within a session and the last
/// event of a session that runs to completion carries `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    pub session: SessionId,
    pub remaining_seconds: u32,
}

/// Lifecycle of a countdown. Every session ends with exactly one of
/// `Expired` or `Cancelled`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownEvent {
    Started {
        session: SessionId,
        craft: String,
        flight_time_seconds: u32,
    },
    Expired {
        session: SessionId,
    },
    Cancelled {
        session: SessionId,
        remaining_seconds: u32,
    },
}

/// Lifecycle of the landing alarm that follows an expired countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlarmEvent {
    /// The alarm became active. Fired right after `CountdownEvent::Expired`.
    Raised { session: SessionId },
    /// The alarm utterance was sent to the output. `replay` is `false` for the
    /// first playback and `true` for every cached repeat.
    Played {
        session: SessionId,
        at: DateTime<Utc>,
        replay: bool,
    },
    /// Fired exactly once, when the operator acknowledges the alarm.
    Acknowledged { session: SessionId },
}

/// What happened to a cue the scheduler decided to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueDispatch {
    /// A final-seconds beep was played.
    Beep {
        session: SessionId,
        remaining_seconds: u32,
    },
    /// A minute announcement was synthesized and played.
    Announced { session: SessionId, minute: u32 },
    /// The speech provider returned nothing; the cue was skipped.
    Dropped { session: SessionId, minute: u32 },
    /// Speech arrived after its session was cancelled or expired.
    Discarded { session: SessionId, minute: u32 },
}
