use anyhow::Result;
use flightclock::prelude::*;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runs a single countdown against the logging backends and acknowledges the
/// alarm after its first replay.
///
/// Usage: `flightdev [--seconds N]` (default 20).
#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 2. Load configuration and pick the duration.
    let config = FlightClockConfig::load(None)?;
    let seconds = parse_seconds(std::env::args().skip(1))?;
    let profile = CraftProfile::new("flightdev", "Banco di prova", seconds)?;

    // 3. Create the engine with the logging backends.
    let engine = FlightClockEngine::new(config, Arc::new(SilentSpeech), Arc::new(TracingDevice));

    // 4. Spawn tasks to listen to the event streams.
    spawn_event_listeners(&engine);
    let mut alarm_rx = engine.subscribe_alarm_events();

    // 5. Start, then wait for the alarm to repeat once or for Ctrl+C.
    engine.start_countdown(profile).await?;
    let mut raised = false;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted.");
                break;
            }
            event = alarm_rx.recv() => match event {
                Ok(AlarmEvent::Raised { .. }) => raised = true,
                Ok(AlarmEvent::Played { replay: true, .. }) => break,
                Ok(AlarmEvent::Acknowledged { .. }) | Err(_) => break,
                Ok(_) => {}
            },
            // Without speech the alarm never replays; acknowledge after one repeat period.
            _ = tokio::time::sleep(engine.config().alarm_repeat_interval()), if raised => break,
        }
    }
    engine.shutdown().await;
    Ok(())
}

fn parse_seconds(mut args: impl Iterator<Item = String>) -> Result<u32> {
    let mut seconds = 20;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seconds" | "-s" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seconds needs a value"))?;
                seconds = value.parse()?;
            }
            other => anyhow::bail!("unknown argument '{other}'"),
        }
    }
    Ok(seconds)
}

/// Spawns several tasks, each subscribing to a different event stream from the engine.
fn spawn_event_listeners(engine: &FlightClockEngine) {
    let mut tick_rx = engine.subscribe_tick_events();
    tokio::spawn(async move {
        while let Ok(event) = tick_rx.recv().await {
            info!("[TICK] => {}s", event.remaining_seconds);
        }
    });

    let mut countdown_rx = engine.subscribe_countdown_events();
    tokio::spawn(async move {
        while let Ok(event) = countdown_rx.recv().await {
            info!("[COUNTDOWN] => {:?}", event);
        }
    });

    let mut cue_rx = engine.subscribe_cue_events();
    tokio::spawn(async move {
        while let Ok(event) = cue_rx.recv().await {
            info!("[CUE] => {:?}", event);
        }
    });

    let mut alarm_rx = engine.subscribe_alarm_events();
    tokio::spawn(async move {
        while let Ok(event) = alarm_rx.recv().await {
            info!("[ALARM] => {:?}", event);
        }
    });
}
