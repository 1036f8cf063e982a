#![allow(dead_code)]

use async_trait::async_trait;
use flightclock::audio::{AudioDevice, AudioPayload, AudioSink, SpeechCueProvider};
use flightclock::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One thing that happened to an output, tagged with the output's open order.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Opened(usize),
    Tone(usize),
    Payload(usize),
    Released(usize),
}

/// An audio device that records every call in order.
#[derive(Clone, Default)]
pub struct RecordingDevice {
    log: Arc<Mutex<Vec<SinkCall>>>,
    opened: Arc<AtomicUsize>,
}

impl RecordingDevice {
    pub fn calls(&self) -> Vec<SinkCall> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn position(&self, call: &SinkCall) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }
}

impl AudioDevice for RecordingDevice {
    fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>> {
        let index = self.opened.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(SinkCall::Opened(index));
        Ok(Arc::new(RecordingSink {
            index,
            log: self.log.clone(),
        }))
    }
}

struct RecordingSink {
    index: usize,
    log: Arc<Mutex<Vec<SinkCall>>>,
}

impl AudioSink for RecordingSink {
    fn play_payload(&self, _payload: &AudioPayload) {
        self.log.lock().unwrap().push(SinkCall::Payload(self.index));
    }

    fn play_tone(&self, _frequency_hz: f32, _duration_ms: u64) {
        self.log.lock().unwrap().push(SinkCall::Tone(self.index));
    }

    fn release(&self) {
        self.log.lock().unwrap().push(SinkCall::Released(self.index));
    }
}

#[derive(Clone, Copy)]
pub enum Script {
    Answer,
    Fail,
}

/// A speech provider with a fixed answer and an optional delay.
pub struct ScriptedSpeech {
    script: Script,
    delay: Duration,
    requests: Mutex<Vec<String>>,
}

impl ScriptedSpeech {
    pub fn new(script: Script, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script,
            delay,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn answering() -> Arc<Self> {
        Self::new(Script::Answer, Duration::ZERO)
    }

    pub fn failing() -> Arc<Self> {
        Self::new(Script::Fail, Duration::ZERO)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechCueProvider for ScriptedSpeech {
    async fn synthesize(&self, text: &str) -> Option<AudioPayload> {
        self.requests.lock().unwrap().push(text.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.script {
            Script::Answer => Some(AudioPayload::new(vec![0i16; 2_400], 24_000, 1)),
            Script::Fail => None,
        }
    }
}

pub fn engine(speech: Arc<ScriptedSpeech>, device: RecordingDevice) -> FlightClockEngine {
    FlightClockEngine::new(FlightClockConfig::default(), speech, Arc::new(device))
}

pub fn craft(seconds: u32) -> CraftProfile {
    CraftProfile::new("trainer", "Trainer", seconds).unwrap()
}

/// Receives countdown events until the session ends, returning all of them.
pub async fn until_countdown_ends(
    rx: &mut tokio::sync::broadcast::Receiver<CountdownEvent>,
) -> Vec<CountdownEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.recv().await {
        let done = !matches!(event, CountdownEvent::Started { .. });
        events.push(event);
        if done {
            break;
        }
    }
    events
}

/// Everything currently buffered on a receiver.
pub fn drain<T: Clone>(rx: &mut tokio::sync::broadcast::Receiver<T>) -> Vec<T> {
    let mut out = Vec::new();
    while let Ok(item) = rx.try_recv() {
        out.push(item);
    }
    out
}
