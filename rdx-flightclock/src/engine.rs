//! The core engine that drives countdowns and landing alarms.

use crate::audio::{AudioDevice, ScopedSink, SpeechCueProvider};
use crate::common::SessionId;
use crate::components::alarm::AlarmSession;
use crate::components::countdown::{CountdownSession, CountdownState, TickOutcome};
use crate::components::cue::{announcement_text, CueEvent, CueScheduler};
use crate::config::FlightClockConfig;
use crate::error::EngineError;
use crate::events::{AlarmEvent, CountdownEvent, CueDispatch, TickEvent};
use crate::profile::CraftProfile;
use chrono::Utc;
use slotmap::SlotMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, trace, warn};

/// Which half of its life a session is in.
enum Phase {
    Countdown(CountdownSession),
    Alarm(AlarmSession),
}

/// Everything a live session owns. Removing the slot ends the session.
struct SessionSlot {
    phase: Phase,
    sink: ScopedSink,
    stop_tx: broadcast::Sender<()>,
}

/// A snapshot of what the engine is doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Running {
        session: SessionId,
        craft: String,
        remaining_seconds: u32,
    },
    Alarm {
        session: SessionId,
        has_payload: bool,
    },
}

/// The main Flightclock engine.
///
/// This struct is the central point of control. It owns at most one session
/// at a time: a countdown that, when it expires, turns into a repeating
/// landing alarm. The `Engine` is cheap to clone; every clone is a handle to
/// the same running instance.
#[derive(Clone)]
pub struct FlightClockEngine {
    config: Arc<FlightClockConfig>,
    speech: Arc<dyn SpeechCueProvider>,
    audio: Arc<dyn AudioDevice>,
    scheduler: CueScheduler,
    tick_sender: broadcast::Sender<TickEvent>,
    countdown_sender: broadcast::Sender<CountdownEvent>,
    alarm_sender: broadcast::Sender<AlarmEvent>,
    cue_sender: broadcast::Sender<CueDispatch>,
    sessions: Arc<RwLock<SlotMap<SessionId, SessionSlot>>>,
}

// Core implementation block for internal logic.
impl FlightClockEngine {
    /// Creates a new `FlightClockEngine` with the given configuration and backends.
    pub fn new(
        config: FlightClockConfig,
        speech: Arc<dyn SpeechCueProvider>,
        audio: Arc<dyn AudioDevice>,
    ) -> Self {
        const CHANNEL_CAPACITY: usize = 256;
        let (tick_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (countdown_sender, _) = broadcast::channel(64);
        let (alarm_sender, _) = broadcast::channel(64);
        let (cue_sender, _) = broadcast::channel(64);

        Self {
            scheduler: CueScheduler::new(config.final_band_seconds),
            config: Arc::new(config),
            speech,
            audio,
            tick_sender,
            countdown_sender,
            alarm_sender,
            cue_sender,
            sessions: Arc::new(RwLock::new(SlotMap::with_key())),
        }
    }

    #[doc(hidden)]
    async fn countdown_loop(self, id: SessionId, mut stop_rx: broadcast::Receiver<()>) {
        let period = self.config.tick_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                _ = ticker.tick() => {
                    if !self.process_countdown_tick(id).await {
                        break;
                    }
                }
            }
        }
        trace!("Countdown cadence for {:?} stopped.", id);
    }

    /// Runs one countdown tick. Returns `false` once the cadence should stop.
    #[doc(hidden)]
    async fn process_countdown_tick(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        // A cancelled session is gone from the map; a tick already in flight
        // stops here, before any cue side effect.
        let Some(slot) = sessions.get_mut(id) else {
            return false;
        };
        let Phase::Countdown(countdown) = &mut slot.phase else {
            return false;
        };

        match countdown.tick() {
            TickOutcome::Halted => false,
            TickOutcome::Continue {
                remaining_seconds,
                cue,
            } => {
                trace!("Tick: {}s remaining.", remaining_seconds);
                self.tick_sender
                    .send(TickEvent {
                        session: id,
                        remaining_seconds,
                    })
                    .ok();
                self.dispatch_cue(id, &slot.sink, cue, remaining_seconds);
                true
            }
            TickOutcome::Expired => {
                info!("Flight time for '{}' has expired.", countdown.profile().name());
                self.tick_sender
                    .send(TickEvent {
                        session: id,
                        remaining_seconds: 0,
                    })
                    .ok();

                // The countdown's output goes away before the alarm opens its own.
                slot.sink.release();
                slot.sink = ScopedSink::open(self.audio.as_ref());
                slot.phase = Phase::Alarm(AlarmSession::new());
                let stop_rx = slot.stop_tx.subscribe();
                drop(sessions);

                self.countdown_sender
                    .send(CountdownEvent::Expired { session: id })
                    .ok();
                self.raise_alarm(id, stop_rx);
                false
            }
        }
    }

    /// Carries out a cue without ever blocking the cadence.
    #[doc(hidden)]
    fn dispatch_cue(&self, id: SessionId, sink: &ScopedSink, cue: CueEvent, remaining_seconds: u32) {
        match cue {
            CueEvent::Silence => {}
            CueEvent::FinalSecondsBeep => {
                if sink.play_tone(self.config.beep.frequency_hz, self.config.beep.duration_ms) {
                    self.cue_sender
                        .send(CueDispatch::Beep {
                            session: id,
                            remaining_seconds,
                        })
                        .ok();
                }
            }
            CueEvent::MinuteAnnouncement { minute, craft_name } => {
                debug!("Announcing {} minute(s) left for '{}'.", minute, craft_name);
                let text = announcement_text(minute, &craft_name);
                let engine = self.clone();
                tokio::spawn(async move { engine.deliver_announcement(id, minute, text).await });
            }
        }
    }

    #[doc(hidden)]
    async fn deliver_announcement(&self, id: SessionId, minute: u32, text: String) {
        let payload = self.speech.synthesize(&text).await;

        let sessions = self.sessions.read().await;
        let sink = match sessions.get(id) {
            Some(SessionSlot {
                phase: Phase::Countdown(countdown),
                sink,
                ..
            }) if countdown.state() == CountdownState::Running => sink,
            _ => {
                debug!("Discarding late announcement for {} minute(s).", minute);
                self.cue_sender
                    .send(CueDispatch::Discarded {
                        session: id,
                        minute,
                    })
                    .ok();
                return;
            }
        };

        match payload {
            Some(payload) => {
                if sink.play_payload(&payload) {
                    self.cue_sender
                        .send(CueDispatch::Announced {
                            session: id,
                            minute,
                        })
                        .ok();
                }
            }
            None => {
                warn!("No speech for the {}-minute announcement; skipping it.", minute);
                self.cue_sender
                    .send(CueDispatch::Dropped {
                        session: id,
                        minute,
                    })
                    .ok();
            }
        }
    }

    /// Enters the alarm: one utterance request now, a repeat cadence regardless.
    #[doc(hidden)]
    fn raise_alarm(&self, id: SessionId, stop_rx: broadcast::Receiver<()>) {
        info!("Landing alarm raised.");
        self.alarm_sender
            .send(AlarmEvent::Raised { session: id })
            .ok();

        let engine = self.clone();
        tokio::spawn(async move { engine.deliver_alarm_utterance(id).await });
        let engine = self.clone();
        tokio::spawn(async move { engine.alarm_loop(id, stop_rx).await });
    }

    #[doc(hidden)]
    async fn deliver_alarm_utterance(&self, id: SessionId) {
        let Some(payload) = self.speech.synthesize(&self.config.alarm_text).await else {
            warn!("Alarm utterance unavailable; the alarm stays active without sound.");
            return;
        };

        let mut sessions = self.sessions.write().await;
        let Some(slot) = sessions.get_mut(id) else {
            debug!("Alarm was acknowledged before its utterance arrived.");
            return;
        };
        let Phase::Alarm(alarm) = &mut slot.phase else {
            return;
        };
        let now = Utc::now();
        if let Some(payload) = alarm.cache_payload(payload, now) {
            if slot.sink.play_payload(&payload) {
                self.alarm_sender
                    .send(AlarmEvent::Played {
                        session: id,
                        at: now,
                        replay: false,
                    })
                    .ok();
            }
        }
    }

    #[doc(hidden)]
    async fn alarm_loop(self, id: SessionId, mut stop_rx: broadcast::Receiver<()>) {
        let period = self.config.alarm_repeat_interval();
        let mut ticker = interval_at(Instant::now() + period, period);
        loop {
            tokio::select! {
                biased;
                _ = stop_rx.recv() => break,
                _ = ticker.tick() => {
                    if !self.process_alarm_tick(id).await {
                        break;
                    }
                }
            }
        }
        trace!("Alarm cadence for {:?} stopped.", id);
    }

    /// Replays the cached utterance. Returns `false` once the cadence should stop.
    #[doc(hidden)]
    async fn process_alarm_tick(&self, id: SessionId) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some(slot) = sessions.get_mut(id) else {
            return false;
        };
        let Phase::Alarm(alarm) = &mut slot.phase else {
            return false;
        };
        if !alarm.is_active() {
            return false;
        }
        let now = Utc::now();
        match alarm.replay(now) {
            Some(payload) => {
                if slot.sink.play_payload(&payload) {
                    self.alarm_sender
                        .send(AlarmEvent::Played {
                            session: id,
                            at: now,
                            replay: true,
                        })
                        .ok();
                }
            }
            None => debug!("Alarm repeat with nothing cached; staying silent."),
        }
        true
    }
}

// Public API implementation block.
impl FlightClockEngine {
    /// Starts counting down `profile`'s flight time.
    ///
    /// Fails if a countdown or an unacknowledged alarm already exists. The
    /// first tick lands one tick interval after this call returns.
    pub async fn start_countdown(&self, profile: CraftProfile) -> Result<SessionId, EngineError> {
        profile.validate()?;
        let mut sessions = self.sessions.write().await;
        if !sessions.is_empty() {
            return Err(EngineError::SessionActive);
        }

        let craft = profile.name().to_string();
        let flight_time_seconds = profile.flight_time_seconds();
        let mut countdown = CountdownSession::new(profile, self.scheduler);
        let first_cue = countdown.start().unwrap_or(CueEvent::Silence);
        let sink = ScopedSink::open(self.audio.as_ref());
        let (stop_tx, stop_rx) = broadcast::channel(1);

        let id = sessions.insert(SessionSlot {
            phase: Phase::Countdown(countdown),
            sink: sink.clone(),
            stop_tx,
        });
        drop(sessions);

        info!("Countdown started for '{}' ({}s).", craft, flight_time_seconds);
        self.countdown_sender
            .send(CountdownEvent::Started {
                session: id,
                craft,
                flight_time_seconds,
            })
            .ok();
        self.dispatch_cue(id, &sink, first_cue, flight_time_seconds);

        let engine = self.clone();
        tokio::spawn(async move { engine.countdown_loop(id, stop_rx).await });
        Ok(id)
    }

    /// Cancels the running countdown.
    ///
    /// Returns `true` if a countdown was running. No expiry is signalled and
    /// the session's audio output is released before this returns.
    pub async fn cancel_countdown(&self) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some((id, slot)) = sessions.iter_mut().next() else {
            return false;
        };
        let Phase::Countdown(countdown) = &mut slot.phase else {
            return false;
        };
        if !countdown.cancel() {
            return false;
        }
        let remaining_seconds = countdown.remaining_seconds();
        slot.stop_tx.send(()).ok();
        slot.sink.release();
        sessions.remove(id);
        drop(sessions);

        info!("Countdown cancelled with {}s remaining.", remaining_seconds);
        self.countdown_sender
            .send(CountdownEvent::Cancelled {
                session: id,
                remaining_seconds,
            })
            .ok();
        true
    }

    /// Acknowledges the active alarm.
    ///
    /// Returns `true` the first time; later calls are no-ops returning `false`.
    pub async fn acknowledge_alarm(&self) -> bool {
        let mut sessions = self.sessions.write().await;
        let Some((id, slot)) = sessions.iter_mut().next() else {
            return false;
        };
        let Phase::Alarm(alarm) = &mut slot.phase else {
            return false;
        };
        if !alarm.acknowledge() {
            return false;
        }
        slot.stop_tx.send(()).ok();
        slot.sink.release();
        sessions.remove(id);
        drop(sessions);

        info!("Landing alarm acknowledged.");
        self.alarm_sender
            .send(AlarmEvent::Acknowledged { session: id })
            .ok();
        true
    }

    /// Ends whatever session is live, through its normal terminal transition.
    pub async fn shutdown(&self) {
        if !self.cancel_countdown().await {
            self.acknowledge_alarm().await;
        }
    }

    pub async fn status(&self) -> EngineStatus {
        let sessions = self.sessions.read().await;
        match sessions.iter().next() {
            None => EngineStatus::Idle,
            Some((session, slot)) => match &slot.phase {
                Phase::Countdown(countdown) => EngineStatus::Running {
                    session,
                    craft: countdown.profile().name().to_string(),
                    remaining_seconds: countdown.remaining_seconds(),
                },
                Phase::Alarm(alarm) => EngineStatus::Alarm {
                    session,
                    has_payload: alarm.has_payload(),
                },
            },
        }
    }

    pub fn config(&self) -> &FlightClockConfig {
        &self.config
    }

    /// Subscribes to the per-second `TickEvent` stream.
    pub fn subscribe_tick_events(&self) -> broadcast::Receiver<TickEvent> {
        self.tick_sender.subscribe()
    }

    /// Subscribes to the `CountdownEvent` stream.
    pub fn subscribe_countdown_events(&self) -> broadcast::Receiver<CountdownEvent> {
        self.countdown_sender.subscribe()
    }

    /// Subscribes to the `AlarmEvent` stream.
    pub fn subscribe_alarm_events(&self) -> broadcast::Receiver<AlarmEvent> {
        self.alarm_sender.subscribe()
    }

    /// Subscribes to the `CueDispatch` stream.
    pub fn subscribe_cue_events(&self) -> broadcast::Receiver<CueDispatch> {
        self.cue_sender.subscribe()
    }
}
