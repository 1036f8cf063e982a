//! State of the landing alarm that follows an expired countdown.

use crate::audio::AudioPayload;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Active,
    Acknowledged,
}

/// The alarm's state, its last playback time and the cached utterance.
///
/// The utterance is synthesized once. Every repeat replays the cached
/// payload, so a speech backend that starts failing after the first request
/// can not silence the alarm.
#[derive(Debug, Clone)]
pub struct AlarmSession {
    state: AlarmState,
    last_played_at: Option<DateTime<Utc>>,
    cached_payload: Option<AudioPayload>,
}

impl Default for AlarmSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmSession {
    pub fn new() -> Self {
        Self {
            state: AlarmState::Active,
            last_played_at: None,
            cached_payload: None,
        }
    }

    /// Stores the first synthesized utterance and returns it for playback.
    ///
    /// Returns `None` once acknowledged, or if a payload is already cached.
    pub fn cache_payload(&mut self, payload: AudioPayload, now: DateTime<Utc>) -> Option<AudioPayload> {
        if !self.is_active() || self.cached_payload.is_some() {
            return None;
        }
        self.cached_payload = Some(payload.clone());
        self.last_played_at = Some(now);
        Some(payload)
    }

    /// The payload to replay on a repeat tick, if any.
    pub fn replay(&mut self, now: DateTime<Utc>) -> Option<AudioPayload> {
        if !self.is_active() {
            return None;
        }
        let payload = self.cached_payload.clone()?;
        self.last_played_at = Some(now);
        Some(payload)
    }

    /// Moves `Active → Acknowledged`. Returns `false` if already acknowledged.
    pub fn acknowledge(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state = AlarmState::Acknowledged;
        self.cached_payload = None;
        true
    }

    pub fn is_active(&self) -> bool {
        self.state == AlarmState::Active
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn last_played_at(&self) -> Option<DateTime<Utc>> {
        self.last_played_at
    }

    pub fn has_payload(&self) -> bool {
        self.cached_payload.is_some()
    }
}
