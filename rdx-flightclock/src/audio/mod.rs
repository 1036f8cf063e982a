//! Capability interfaces the engine uses to make noise.
//!
//! The engine never talks to a sound card or a speech service directly. It
//! asks an [`AudioDevice`] for one [`AudioSink`] per session and a
//! [`SpeechCueProvider`] for spoken cues. Concrete backends live in the
//! submodules; some of them sit behind cargo features.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod payload;
pub mod silent;

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(feature = "playback")]
pub mod rodio_out;

pub use payload::{AudioPayload, Tone};
pub use silent::{SilentSink, SilentSpeech, TracingDevice, TracingSink};

/// Turns text into playable audio.
///
/// Implementations fail soft: any transport or decode error is logged and
/// reported as `None`, never raised into the engine.
#[async_trait]
pub trait SpeechCueProvider: Send + Sync {
    async fn synthesize(&self, text: &str) -> Option<AudioPayload>;
}

/// An open audio output.
pub trait AudioSink: Send + Sync {
    /// Queues decoded speech. Returns immediately; playback is best-effort.
    fn play_payload(&self, payload: &AudioPayload);

    /// Plays a locally synthesized sine tone.
    fn play_tone(&self, frequency_hz: f32, duration_ms: u64);

    /// Stops any queued audio and frees the output. Safe to call more than once.
    fn release(&self);
}

/// Hands out audio outputs.
pub trait AudioDevice: Send + Sync {
    fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>>;
}

/// A session-owned handle around an [`AudioSink`].
///
/// Once released, every further play request is swallowed here, so a late
/// caller holding a clone can never reach the underlying output.
#[derive(Clone)]
pub struct ScopedSink {
    inner: Arc<dyn AudioSink>,
    released: Arc<AtomicBool>,
}

impl ScopedSink {
    /// Opens a sink on `device`, falling back to a silent one if the device fails.
    pub fn open(device: &dyn AudioDevice) -> Self {
        let inner = match device.open() {
            Ok(sink) => sink,
            Err(e) => {
                warn!("Audio output unavailable, continuing silently: {e:#}");
                Arc::new(SilentSink)
            }
        };
        Self {
            inner,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn play_payload(&self, payload: &AudioPayload) -> bool {
        if self.is_released() {
            return false;
        }
        self.inner.play_payload(payload);
        true
    }

    pub fn play_tone(&self, frequency_hz: f32, duration_ms: u64) -> bool {
        if self.is_released() {
            return false;
        }
        self.inner.play_tone(frequency_hz, duration_ms);
        true
    }

    /// Releases the underlying output exactly once.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::AcqRel) {
            debug!("Releasing audio output.");
            self.inner.release();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct CountingSink {
        tones: AtomicUsize,
        releases: AtomicUsize,
    }

    impl AudioSink for CountingSink {
        fn play_payload(&self, _payload: &AudioPayload) {}
        fn play_tone(&self, _frequency_hz: f32, _duration_ms: u64) {
            self.tones.fetch_add(1, Ordering::SeqCst);
        }
        fn release(&self) {
            self.releases.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct CountingDevice(Arc<CountingSink>);

    impl AudioDevice for CountingDevice {
        fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenDevice;

    impl AudioDevice for BrokenDevice {
        fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>> {
            anyhow::bail!("no output device")
        }
    }

    #[test]
    fn release_is_forwarded_once_and_blocks_playback() {
        let sink = Arc::new(CountingSink::default());
        let scoped = ScopedSink::open(&CountingDevice(sink.clone()));
        assert!(scoped.play_tone(880.0, 100));

        let late_clone = scoped.clone();
        scoped.release();
        scoped.release();
        assert!(!late_clone.play_tone(880.0, 100));

        assert_eq!(sink.tones.load(Ordering::SeqCst), 1);
        assert_eq!(sink.releases.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn broken_device_falls_back_to_silence() {
        let scoped = ScopedSink::open(&BrokenDevice);
        assert!(scoped.play_tone(880.0, 100));
        scoped.release();
        assert!(scoped.is_released());
    }
}
