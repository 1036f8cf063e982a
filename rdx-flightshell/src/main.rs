use anyhow::Result;
use colored::Colorize;
use flightclock::audio::{AudioDevice, SpeechCueProvider};
use flightclock::prelude::*;
use flightclock::{ENGINE_NAME, VERSION as LIB_VERSION};
use rustyline::highlight::Highlighter;
use rustyline::Editor;
use rustyline_derive::{Completer, Helper, Hinter, Validator};
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const SHELL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A custom helper struct for rustyline that enables syntax highlighting.
#[derive(Completer, Helper, Hinter, Validator)]
struct MyHighlighter;

impl Highlighter for MyHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if let Some((command, rest)) = line.split_once(' ') {
            let colored_command = command.yellow().bold();
            let colored_rest = rest.yellow();
            Cow::Owned(format!("{} {}", colored_command, colored_rest))
        } else {
            Cow::Owned(line.yellow().bold().to_string())
        }
    }
    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

fn print_banner() {
    if env::var("QUIET_MODE").is_ok() {
        return;
    }
    println!("{}", "TIMER DI VOLO PER UAS".cyan().bold());

    let version_string = format!(
        "          Shell   v{:<8} Library   v{:<8}",
        SHELL_VERSION, LIB_VERSION
    );

    println!("{}", "-----------------------------------------------------------------".dimmed());

    let license_blurb = "
    This software is provided 'as is', without warranty of any kind.
    Distributed under the MIT OR Apache-2.0 license. Use at your own risk.
    ";

    println!("{}", version_string);
    println!("{}", license_blurb.dimmed());

    println!("{}", "-----------------------------------------------------------------".dimmed());
}

fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Picks the speech backend compiled into this build.
fn speech_backend(config: &FlightClockConfig) -> Result<Arc<dyn SpeechCueProvider>> {
    #[cfg(feature = "gemini")]
    {
        let speech = flightclock::audio::gemini::GeminiSpeech::from_config(&config.speech)?;
        Ok(Arc::new(speech))
    }
    #[cfg(not(feature = "gemini"))]
    {
        let _ = config;
        Ok(Arc::new(SilentSpeech))
    }
}

/// Picks the audio backend compiled into this build.
fn audio_backend() -> Arc<dyn AudioDevice> {
    #[cfg(feature = "playback")]
    {
        Arc::new(flightclock::audio::rodio_out::RodioDevice)
    }
    #[cfg(not(feature = "playback"))]
    {
        Arc::new(TracingDevice)
    }
}

/// Spawns several tasks, each subscribing to a different event stream from the engine.
fn spawn_event_listeners(engine: &FlightClockEngine, is_showing_ticks: Arc<AtomicBool>) {
    // Countdown lifecycle
    let mut countdown_rx = engine.subscribe_countdown_events();
    tokio::spawn(async move {
        while let Ok(event) = countdown_rx.recv().await {
            match event {
                CountdownEvent::Started { craft, flight_time_seconds, .. } => println!(
                    "\n<-- [DECOLLO] {} - {}",
                    craft.cyan(),
                    format_time(flight_time_seconds)
                ),
                CountdownEvent::Cancelled { remaining_seconds, .. } => println!(
                    "\n<-- [ANNULLATO] {} rimanenti",
                    format_time(remaining_seconds)
                ),
                CountdownEvent::Expired { .. } => {
                    println!("\n<-- {}", "TEMPO SCADUTO".red().bold())
                }
            }
        }
    });

    // Tick listener (controlled by the shared flag)
    let mut tick_rx = engine.subscribe_tick_events();
    tokio::spawn(async move {
        while let Ok(event) = tick_rx.recv().await {
            if is_showing_ticks.load(Ordering::Relaxed) {
                println!("<-- [TICK] {}", format_time(event.remaining_seconds));
            }
        }
    });

    let mut cue_rx = engine.subscribe_cue_events();
    tokio::spawn(async move {
        while let Ok(event) = cue_rx.recv().await {
            match event {
                CueDispatch::Beep { remaining_seconds, .. } => {
                    println!("<-- [BEEP] {}", remaining_seconds.to_string().yellow())
                }
                CueDispatch::Announced { minute, .. } => {
                    println!("<-- [VOCE] {} min", minute)
                }
                CueDispatch::Dropped { minute, .. } => {
                    println!("<-- [VOCE] {} min {}", minute, "(non disponibile)".dimmed())
                }
                CueDispatch::Discarded { .. } => {}
            }
        }
    });

    let mut alarm_rx = engine.subscribe_alarm_events();
    tokio::spawn(async move {
        while let Ok(event) = alarm_rx.recv().await {
            match event {
                AlarmEvent::Raised { .. } => println!(
                    "<-- {} Procedere con l'atterraggio immediatamente. Digita 'ack'.",
                    "[ALLARME]".red().bold()
                ),
                AlarmEvent::Played { .. } => println!("<-- {}", "[ALLARME]".red()),
                AlarmEvent::Acknowledged { .. } => println!("<-- [ALLARME] confermato"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    print_banner();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let config_path = env::args().nth(1).map(PathBuf::from);
    let config = FlightClockConfig::load(config_path.as_deref())?;
    let catalog = config.catalog()?;
    let speech = speech_backend(&config)?;
    let engine = FlightClockEngine::new(config, speech, audio_backend());

    let is_showing_ticks = Arc::new(AtomicBool::new(false));
    spawn_event_listeners(&engine, is_showing_ticks.clone());
    info!("{} ready with {} craft.", ENGINE_NAME, catalog.len());

    let mut rl = Editor::new()?;
    let helper = MyHighlighter {};
    rl.set_helper(Some(helper));

    println!("{} is running. Type 'help' for commands or 'exit' to quit.", ENGINE_NAME.cyan());

    loop {
        let prompt = format!("{}", ">> ".cyan().bold());
        let readline = rl.readline(&prompt);
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let args = line.split_whitespace().collect::<Vec<_>>();

                if let Some(command) = args.first() {
                    match *command {
                        "list" => {
                            println!("  {:<16} {}", CUSTOM_PROFILE_ID.cyan(), "durata libera (start LIBERO <min>)".dimmed());
                            for profile in catalog.iter() {
                                println!(
                                    "  {:<16} {:<20} {} min",
                                    profile.id(),
                                    profile.name(),
                                    profile.flight_time_seconds() / 60
                                );
                            }
                        }
                        "start" => {
                            let Some(id) = args.get(1) else {
                                println!("Usage: start <ID> | start LIBERO <MINUTES>");
                                continue;
                            };
                            let minutes = match args.get(2).map(|m| m.parse::<u32>()) {
                                Some(Ok(m)) => m,
                                Some(Err(_)) => {
                                    println!("Error: minutes must be a whole number.");
                                    continue;
                                }
                                None => 15,
                            };
                            match catalog.select(id, minutes) {
                                Ok(profile) => {
                                    if let Err(e) = engine.start_countdown(profile).await {
                                        println!("Error: {}", e);
                                    }
                                }
                                Err(e) => println!("Error: {}", e),
                            }
                        }
                        "cancel" => {
                            if !engine.cancel_countdown().await {
                                println!("--> No countdown is running.");
                            }
                        }
                        "ack" => {
                            if !engine.acknowledge_alarm().await {
                                println!("--> No alarm is active.");
                            }
                        }
                        "status" => match engine.status().await {
                            EngineStatus::Idle => println!("--> Idle."),
                            EngineStatus::Running { craft, remaining_seconds, .. } => {
                                println!("--> {} - {}", craft, format_time(remaining_seconds))
                            }
                            EngineStatus::Alarm { has_payload, .. } => println!(
                                "--> {}{}",
                                "Alarm active".red(),
                                if has_payload { "" } else { " (silent)" }
                            ),
                        },
                        "ticks" => {
                            let show = args.get(1) != Some(&"off");
                            is_showing_ticks.store(show, Ordering::Relaxed);
                            println!("--> Tick display {}.", if show { "on" } else { "off" });
                        }
                        "help" => {
                            println!("Available commands:");
                            println!("  list                  - Shows the craft catalog.");
                            println!("  start <ID>            - Starts the countdown for a craft.");
                            println!("  start LIBERO <M>      - Starts an M-minute custom countdown.");
                            println!("  cancel                - Cancels the running countdown.");
                            println!("  ack                   - Acknowledges the landing alarm.");
                            println!("  status                - Shows what the engine is doing.");
                            println!("  ticks [off]           - Prints every tick.");
                            println!("  exit                  - Quits the shell.");
                        }
                        "exit" => break,
                        _ => println!("Unknown command: '{}'. Type 'help'.", line),
                    }
                }
            }
            Err(_) => {
                println!("Exiting flightshell...");
                break;
            }
        }
    }

    engine.shutdown().await;
    Ok(())
}
