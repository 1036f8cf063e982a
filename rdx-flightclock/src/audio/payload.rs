//! Audio data exchanged between the speech provider and the output.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::sync::Arc;
use std::time::Duration;

/// Decoded 16-bit PCM audio.
///
/// Samples are shared, so cloning a payload to replay it is cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    samples: Arc<[i16]>,
    sample_rate: u32,
    channels: u16,
}

impl AudioPayload {
    pub fn new(samples: impl Into<Arc<[i16]>>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: samples.into(),
            sample_rate: sample_rate.max(1),
            channels: channels.max(1),
        }
    }

    /// Decodes base64 text holding raw little-endian i16 PCM.
    ///
    /// A trailing odd byte is ignored.
    pub fn from_base64_pcm(data: &str, sample_rate: u32, channels: u16) -> anyhow::Result<Self> {
        let bytes = STANDARD.decode(data.trim())?;
        if bytes.len() < 2 {
            anyhow::bail!("speech payload holds no samples");
        }
        let samples: Vec<i16> = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self::new(samples, sample_rate, channels))
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Samples scaled to `-1.0..1.0`.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples
            .iter()
            .map(|&s| f32::from(s) / 32768.0)
            .collect()
    }

    pub fn duration(&self) -> Duration {
        let frames = self.samples.len() as u64 / u64::from(self.channels);
        Duration::from_micros(frames * 1_000_000 / u64::from(self.sample_rate))
    }
}

/// A short sine tone with a decaying envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u64,
}

impl Tone {
    const START_GAIN: f32 = 0.5;
    const END_GAIN: f32 = 0.0001;

    pub fn new(frequency_hz: f32, duration_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration_ms,
        }
    }

    /// Renders the tone as mono f32 samples.
    ///
    /// Gain falls exponentially from 0.5 to 0.0001 over the tone's length.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let count = (u64::from(sample_rate) * self.duration_ms / 1000) as usize;
        if count == 0 {
            return Vec::new();
        }
        let ratio = Self::END_GAIN / Self::START_GAIN;
        let rate = sample_rate as f32;
        (0..count)
            .map(|i| {
                let progress = i as f32 / count as f32;
                let gain = Self::START_GAIN * ratio.powf(progress);
                let phase = 2.0 * std::f32::consts::PI * self.frequency_hz * i as f32 / rate;
                gain * phase.sin()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pcm() {
        // 0x0001, 0xFFFF, 0x7FFF
        let encoded = STANDARD.encode([0x01, 0x00, 0xFF, 0xFF, 0xFF, 0x7F]);
        let payload = AudioPayload::from_base64_pcm(&encoded, 24_000, 1).unwrap();
        assert_eq!(payload.samples(), &[1, -1, i16::MAX]);
        assert_eq!(payload.sample_rate(), 24_000);
    }

    #[test]
    fn rejects_garbage_and_empty_payloads() {
        assert!(AudioPayload::from_base64_pcm("not base64!!", 24_000, 1).is_err());
        assert!(AudioPayload::from_base64_pcm("", 24_000, 1).is_err());
    }

    #[test]
    fn duration_follows_sample_count() {
        let payload = AudioPayload::new(vec![0i16; 48_000], 24_000, 1);
        assert_eq!(payload.duration(), Duration::from_secs(2));
        let stereo = AudioPayload::new(vec![0i16; 48_000], 24_000, 2);
        assert_eq!(stereo.duration(), Duration::from_secs(1));
    }

    #[test]
    fn tone_envelope_decays() {
        let samples = Tone::new(880.0, 100).samples(48_000);
        assert_eq!(samples.len(), 4_800);
        let head = samples[..200].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        let tail = samples[4_600..].iter().fold(0.0f32, |m, s| m.max(s.abs()));
        assert!(head > 0.3);
        assert!(tail < 0.01);
    }
}
