//! Backends that need no hardware and no network.

use super::{AudioDevice, AudioPayload, AudioSink, SpeechCueProvider};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// A speech provider that never produces audio. Spoken cues are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

#[async_trait]
impl SpeechCueProvider for SilentSpeech {
    async fn synthesize(&self, _text: &str) -> Option<AudioPayload> {
        None
    }
}

/// An output that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl AudioSink for SilentSink {
    fn play_payload(&self, _payload: &AudioPayload) {}
    fn play_tone(&self, _frequency_hz: f32, _duration_ms: u64) {}
    fn release(&self) {}
}

/// Hands out [`TracingSink`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDevice;

impl AudioDevice for TracingDevice {
    fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>> {
        Ok(Arc::new(TracingSink))
    }
}

/// An output that logs what it would have played.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AudioSink for TracingSink {
    fn play_payload(&self, payload: &AudioPayload) {
        info!("[AUDIO] speech {:?}", payload.duration());
    }

    fn play_tone(&self, frequency_hz: f32, duration_ms: u64) {
        info!("[AUDIO] beep {frequency_hz} Hz / {duration_ms} ms");
    }

    fn release(&self) {
        info!("[AUDIO] output released");
    }
}
