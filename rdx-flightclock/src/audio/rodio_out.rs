//! Playback through the default output device via rodio.
//!
//! The rodio stream is not guaranteed to be `Send`, so each sink owns a
//! dedicated thread that opens the stream and serves play requests from a
//! channel. Releasing the sink stops queued audio and ends the thread.

use super::{AudioDevice, AudioPayload, AudioSink, Tone};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStreamBuilder, Sink};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

const TONE_SAMPLE_RATE: u32 = 48_000;

enum Command {
    Payload(AudioPayload),
    Tone(Tone),
    Release,
}

/// Opens [`RodioSink`]s on the system's default output.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioDevice;

impl AudioDevice for RodioDevice {
    fn open(&self) -> anyhow::Result<Arc<dyn AudioSink>> {
        let (tx, rx) = mpsc::channel::<Command>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        thread::Builder::new()
            .name("flightclock-audio".into())
            .spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => stream,
                    Err(e) => {
                        ready_tx.send(Err(e.to_string())).ok();
                        return;
                    }
                };
                let sink = Sink::connect_new(stream.mixer());
                ready_tx.send(Ok(())).ok();

                while let Ok(command) = rx.recv() {
                    match command {
                        Command::Payload(payload) => {
                            sink.append(SamplesBuffer::new(
                                payload.channels(),
                                payload.sample_rate(),
                                payload.to_f32(),
                            ));
                        }
                        Command::Tone(tone) => {
                            sink.append(SamplesBuffer::new(
                                1,
                                TONE_SAMPLE_RATE,
                                tone.samples(TONE_SAMPLE_RATE),
                            ));
                        }
                        Command::Release => break,
                    }
                }
                sink.stop();
                debug!("Audio thread finished.");
            })?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Arc::new(RodioSink { tx })),
            Ok(Err(e)) => anyhow::bail!("failed to open audio output: {e}"),
            Err(_) => anyhow::bail!("audio thread exited before reporting"),
        }
    }
}

/// A handle to one audio thread.
pub struct RodioSink {
    tx: mpsc::Sender<Command>,
}

impl RodioSink {
    fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            warn!("Audio thread is gone; dropping playback request.");
        }
    }
}

impl AudioSink for RodioSink {
    fn play_payload(&self, payload: &AudioPayload) {
        self.send(Command::Payload(payload.clone()));
    }

    fn play_tone(&self, frequency_hz: f32, duration_ms: u64) {
        self.send(Command::Tone(Tone::new(frequency_hz, duration_ms)));
    }

    fn release(&self) {
        self.tx.send(Command::Release).ok();
    }
}
