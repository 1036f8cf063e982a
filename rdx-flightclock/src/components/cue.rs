//! Decides which audible cue, if any, belongs to a given remaining time.

use crate::common::SECONDS_PER_MINUTE;

/// What to emit at one tick. Produced and consumed within that tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueEvent {
    /// Speak the number of whole minutes left.
    MinuteAnnouncement { minute: u32, craft_name: String },
    /// Play the short final-seconds tone.
    FinalSecondsBeep,
    Silence,
}

/// The pure cue decision.
///
/// Two bands, mutually exclusive as long as the final band is shorter than a
/// minute:
/// - `0 < remaining <= final_band_seconds`: beep on every evaluation.
/// - above the band, on an exact minute boundary: announce that minute, once.
#[derive(Debug, Clone, Copy)]
pub struct CueScheduler {
    final_band_seconds: u32,
}

impl Default for CueScheduler {
    fn default() -> Self {
        Self::new(15)
    }
}

impl CueScheduler {
    pub fn new(final_band_seconds: u32) -> Self {
        Self { final_band_seconds }
    }

    /// Returns the cue for `remaining_seconds` and the updated last-announced minute.
    pub fn decide(
        &self,
        remaining_seconds: u32,
        last_announced_minute: Option<u32>,
        craft_name: &str,
    ) -> (CueEvent, Option<u32>) {
        if remaining_seconds > 0 && remaining_seconds <= self.final_band_seconds {
            return (CueEvent::FinalSecondsBeep, last_announced_minute);
        }
        if remaining_seconds > self.final_band_seconds
            && remaining_seconds % SECONDS_PER_MINUTE == 0
        {
            let minute = remaining_seconds.div_ceil(SECONDS_PER_MINUTE);
            if last_announced_minute != Some(minute) {
                let cue = CueEvent::MinuteAnnouncement {
                    minute,
                    craft_name: craft_name.to_string(),
                };
                return (cue, Some(minute));
            }
        }
        (CueEvent::Silence, last_announced_minute)
    }
}

/// The spoken text for a minute announcement.
pub fn announcement_text(minute: u32, craft_name: &str) -> String {
    let unit = if minute > 1 { "minuti" } else { "minuto" };
    format!("Tempo rimanente del tuo {craft_name}: {minute} {unit} per l'atterraggio.")
}
