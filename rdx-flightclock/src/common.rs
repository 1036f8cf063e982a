//! Contains common, primitive types shared across the Flightclock engine.
//!
//! This module defines the session key used to tie asynchronous work (speech
//! requests, cadence loops) back to the session that started it, plus the
//! handful of constants every component agrees on.

use slotmap::new_key_type;

new_key_type! {
    /// Uniquely and safely identifies a countdown/alarm session within the engine.
    ///
    /// A new key is handed out every time a countdown starts. Keys are versioned
    /// and never reused, so a speech response that arrives after its session has
    /// ended can always be told apart from the session that replaced it.
    pub struct SessionId;
}

/// The reserved profile id for a caller-chosen custom duration.
pub const CUSTOM_PROFILE_ID: &str = "LIBERO";

/// Seconds in one announced minute.
pub const SECONDS_PER_MINUTE: u32 = 60;
