//! # Flightclock
//!
//! A flight-time countdown and landing alarm engine for remote-piloted aircraft.
//!
//! An operator picks a craft with a known flight-time budget (or a custom
//! duration) and starts a countdown. The engine speaks the remaining minutes,
//! beeps through the final seconds and, when time runs out, raises a landing
//! alarm that repeats until it is acknowledged.
//!
//! ## Core Concepts
//!
//! - **Countdown**: one session at a time, ticking once per second. Every tick
//!   is published as a `TickEvent`; the session ends in exactly one of
//!   `CountdownEvent::Expired` or `CountdownEvent::Cancelled`.
//! - **Cues**: a pure scheduler decides whether a tick carries a minute
//!   announcement or a final-seconds beep. Speech is requested in the
//!   background and never holds up the clock; if it fails, the cue is dropped.
//! - **Alarm**: entered on expiry. The alarm utterance is synthesized once and
//!   replayed on a fixed interval until `acknowledge_alarm` is called.
//! - **Capabilities**: sound comes from an `AudioDevice` and speech from a
//!   `SpeechCueProvider`, both supplied by the application.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use flightclock::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // 1. Load configuration (defaults, flightclock.toml, FLIGHTCLOCK__* env).
//!     let config = FlightClockConfig::load(None)?;
//!     let catalog = config.catalog()?;
//!
//!     // 2. Create the engine with the backends you want.
//!     let engine = FlightClockEngine::new(config, Arc::new(SilentSpeech), Arc::new(TracingDevice));
//!
//!     // 3. Subscribe before starting.
//!     let mut countdown_events = engine.subscribe_countdown_events();
//!
//!     // 4. Start a countdown for a catalog craft.
//!     engine.start_countdown(catalog.select("ryze-tello", 0)?).await?;
//!
//!     // 5. Wait for expiry, then acknowledge the alarm.
//!     while let Ok(event) = countdown_events.recv().await {
//!         if let CountdownEvent::Expired { .. } = event {
//!             engine.acknowledge_alarm().await;
//!             break;
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub const ENGINE_NAME: &str = "Flight Clock";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod audio;
pub mod catalog;
pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod profile;

/// A prelude module for easy importing of the most common Flightclock types.
pub mod prelude {
    pub use crate::audio::{
        AudioDevice, AudioPayload, AudioSink, SilentSpeech, SpeechCueProvider, TracingDevice,
    };
    pub use crate::catalog::Catalog;
    pub use crate::common::{SessionId, CUSTOM_PROFILE_ID};
    pub use crate::config::FlightClockConfig;
    pub use crate::engine::{EngineStatus, FlightClockEngine};
    pub use crate::error::{CatalogError, EngineError, ProfileError};
    pub use crate::events::{AlarmEvent, CountdownEvent, CueDispatch, TickEvent};
    pub use crate::profile::CraftProfile;
}
