//! The countdown state machine.
//!
//! ```text
//!          start()            tick() at 1s
//!  Idle ─────────────► Running ───────────► Expired
//!                         │
//!                         │ cancel()
//!                         ▼
//!                     Cancelled
//! ```
//!
//! This type owns the remaining time and the minute-announcement guard. It
//! knows nothing about timers or audio; the engine drives `tick` on a fixed
//! cadence and acts on the returned [`TickOutcome`].

use crate::components::cue::{CueEvent, CueScheduler};
use crate::profile::CraftProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    Idle,
    Running,
    Expired,
    Cancelled,
}

impl CountdownState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }
}

/// The result of one [`CountdownSession::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Time was taken off and the session keeps running.
    Continue { remaining_seconds: u32, cue: CueEvent },
    /// The last second elapsed. Returned exactly once per session.
    Expired,
    /// The session is not running; nothing changed.
    Halted,
}

#[derive(Debug, Clone)]
pub struct CountdownSession {
    profile: CraftProfile,
    remaining_seconds: u32,
    last_announced_minute: Option<u32>,
    state: CountdownState,
    scheduler: CueScheduler,
}

impl CountdownSession {
    pub fn new(profile: CraftProfile, scheduler: CueScheduler) -> Self {
        Self {
            remaining_seconds: profile.flight_time_seconds(),
            profile,
            last_announced_minute: None,
            state: CountdownState::Idle,
            scheduler,
        }
    }

    /// Moves `Idle → Running` and evaluates cues at full time.
    ///
    /// A minute boundary at full time is recorded but not announced, so the
    /// operator hears the first announcement one minute into the flight. A
    /// duration that fits inside the final band still beeps right away.
    /// Returns `None` if the session was not idle.
    pub fn start(&mut self) -> Option<CueEvent> {
        if self.state != CountdownState::Idle {
            return None;
        }
        self.state = CountdownState::Running;
        self.remaining_seconds = self.profile.flight_time_seconds();
        let (cue, last) = self.scheduler.decide(
            self.remaining_seconds,
            self.last_announced_minute,
            self.profile.name(),
        );
        self.last_announced_minute = last;
        Some(match cue {
            CueEvent::MinuteAnnouncement { .. } => CueEvent::Silence,
            other => other,
        })
    }

    /// Takes one second off the clock.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != CountdownState::Running {
            return TickOutcome::Halted;
        }
        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.state = CountdownState::Expired;
            return TickOutcome::Expired;
        }
        self.remaining_seconds -= 1;
        let (cue, last) = self.scheduler.decide(
            self.remaining_seconds,
            self.last_announced_minute,
            self.profile.name(),
        );
        self.last_announced_minute = last;
        TickOutcome::Continue {
            remaining_seconds: self.remaining_seconds,
            cue,
        }
    }

    /// Moves `Running → Cancelled`. Returns `false` in any other state.
    pub fn cancel(&mut self) -> bool {
        if self.state != CountdownState::Running {
            return false;
        }
        self.state = CountdownState::Cancelled;
        true
    }

    pub fn profile(&self) -> &CraftProfile {
        &self.profile
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn last_announced_minute(&self) -> Option<u32> {
        self.last_announced_minute
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }
}
