//! Defines all configuration structures for the Flightclock engine.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`. This allows the engine's cadence, cue
//! tones, alarm text and the craft catalog to be defined externally from the
//! application code.

use crate::catalog::{default_fleet, Catalog};
use crate::profile::CraftProfile;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "flightclock";

/// Prefix for environment overrides, e.g. `FLIGHTCLOCK__ALARM_REPEAT_SECONDS=5`.
pub const ENV_PREFIX: &str = "FLIGHTCLOCK";

/// The top-level configuration for the `FlightClockEngine`.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightClockConfig {
    /// Period of the countdown cadence. One tick removes one second of flight time.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Length of the final band, in seconds, during which every tick beeps.
    #[serde(default = "default_final_band_seconds")]
    pub final_band_seconds: u32,

    /// Period of the repeating alarm utterance.
    #[serde(default = "default_alarm_repeat_seconds")]
    pub alarm_repeat_seconds: u64,

    /// The utterance spoken while the alarm is active.
    #[serde(default = "default_alarm_text")]
    pub alarm_text: String,

    #[serde(default)]
    pub beep: BeepConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    /// Craft offered for selection. The custom profile is never listed here.
    #[serde(default = "default_fleet")]
    pub catalog: Vec<CraftProfile>,
}

/// The tone played once per second in the final band.
#[derive(Debug, Clone, Deserialize)]
pub struct BeepConfig {
    #[serde(default = "default_beep_frequency")]
    pub frequency_hz: f32,
    #[serde(default = "default_beep_duration")]
    pub duration_ms: u64,
}

/// Settings for the remote text-to-speech provider.
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_model")]
    pub model: String,
    #[serde(default = "default_speech_voice")]
    pub voice: String,
    /// Environment variable holding the API key. The key itself never lives in config.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl FlightClockConfig {
    /// Loads the configuration from defaults, an optional TOML file and the environment.
    ///
    /// With `path = None` a `flightclock.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;
        let config: Self = settings.try_deserialize()?;
        config.catalog()?;
        Ok(config)
    }

    /// Builds the read-only catalog described by this config.
    pub fn catalog(&self) -> anyhow::Result<Catalog> {
        Ok(Catalog::new(self.catalog.clone())?)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn alarm_repeat_interval(&self) -> Duration {
        Duration::from_secs(self.alarm_repeat_seconds.max(1))
    }
}

// --- Default value functions for serde ---

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_final_band_seconds() -> u32 {
    15
}

fn default_alarm_repeat_seconds() -> u64 {
    10
}

fn default_alarm_text() -> String {
    "Il tempo di volo è scaduto. Marcello, devi atterrare quanto prima.".to_string()
}

fn default_beep_frequency() -> f32 {
    880.0
}

fn default_beep_duration() -> u64 {
    100
}

fn default_speech_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_speech_voice() -> String {
    "Kore".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl Default for FlightClockConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            final_band_seconds: default_final_band_seconds(),
            alarm_repeat_seconds: default_alarm_repeat_seconds(),
            alarm_text: default_alarm_text(),
            beep: BeepConfig::default(),
            speech: SpeechConfig::default(),
            catalog: default_fleet(),
        }
    }
}

impl Default for BeepConfig {
    fn default() -> Self {
        Self {
            frequency_hz: default_beep_frequency(),
            duration_ms: default_beep_duration(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            model: default_speech_model(),
            voice: default_speech_voice(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_yields_defaults() {
        let config: FlightClockConfig = config::Config::builder()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.final_band_seconds, 15);
        assert_eq!(config.alarm_repeat_interval(), Duration::from_secs(10));
        assert_eq!(config.beep.frequency_hz, 880.0);
        assert_eq!(config.catalog.len(), 10);
    }

    #[test]
    fn toml_overrides_cadence_and_catalog() {
        let toml = r#"
            alarm_repeat_seconds = 4

            [beep]
            duration_ms = 250

            [[catalog]]
            id = "trainer"
            name = "Trainer"
            flight_time_seconds = 600
        "#;
        let config: FlightClockConfig = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.alarm_repeat_seconds, 4);
        assert_eq!(config.beep.duration_ms, 250);
        assert_eq!(config.beep.frequency_hz, 880.0);
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("trainer").unwrap().name(), "Trainer");
    }
}
