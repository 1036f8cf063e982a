mod common;

use common::{craft, drain, engine, RecordingDevice, ScriptedSpeech, SinkCall};
use flightclock::prelude::*;
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[tokio::test(start_paused = true)]
async fn alarm_replays_cached_utterance_until_acknowledged() {
    let device = RecordingDevice::default();
    let speech = ScriptedSpeech::answering();
    let engine = engine(speech.clone(), device.clone());
    let mut alarm = engine.subscribe_alarm_events();

    engine.start_countdown(craft(3)).await.unwrap();

    let Ok(AlarmEvent::Raised { session }) = alarm.recv().await else {
        panic!("alarm was not raised");
    };
    let raised_at = Instant::now();

    let mut replays = Vec::new();
    while let Ok(event) = alarm.recv().await {
        match event {
            AlarmEvent::Played { replay: false, .. } => assert!(replays.is_empty()),
            AlarmEvent::Played { replay: true, .. } => {
                replays.push(raised_at.elapsed());
                if replays.len() == 2 {
                    break;
                }
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    for (replay, expected) in replays.iter().zip([10u64, 20]) {
        let expected = Duration::from_secs(expected);
        assert!(*replay >= expected && *replay < expected + Duration::from_millis(50));
    }

    let alarm_text = engine.config().alarm_text.clone();
    assert_eq!(
        speech.requests().iter().filter(|t| **t == alarm_text).count(),
        1
    );

    assert!(engine.acknowledge_alarm().await);
    assert!(!engine.acknowledge_alarm().await);
    assert_eq!(
        drain(&mut alarm),
        vec![AlarmEvent::Acknowledged { session }]
    );

    sleep(Duration::from_secs(60)).await;
    assert!(drain(&mut alarm).is_empty());

    assert_eq!(device.count(|c| *c == SinkCall::Released(1)), 1);
    assert_eq!(device.count(|c| *c == SinkCall::Payload(1)), 3);
    assert_eq!(device.calls().last(), Some(&SinkCall::Released(1)));
}

#[tokio::test(start_paused = true)]
async fn countdown_output_is_released_before_alarm_output_opens() {
    let device = RecordingDevice::default();
    let engine = engine(ScriptedSpeech::answering(), device.clone());
    let mut countdown = engine.subscribe_countdown_events();

    engine.start_countdown(craft(2)).await.unwrap();
    while let Ok(event) = countdown.recv().await {
        if let CountdownEvent::Expired { .. } = event {
            break;
        }
    }

    let released = device.position(&SinkCall::Released(0)).unwrap();
    let reopened = device.position(&SinkCall::Opened(1)).unwrap();
    assert!(released < reopened);
    // 2s fits inside the final band: one beep at start, one at 1s.
    assert_eq!(device.count(|c| *c == SinkCall::Tone(0)), 2);
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn alarm_stays_active_and_silent_when_first_utterance_fails() {
    let device = RecordingDevice::default();
    let engine = engine(ScriptedSpeech::failing(), device.clone());
    let mut alarm = engine.subscribe_alarm_events();

    engine.start_countdown(craft(2)).await.unwrap();
    let Ok(AlarmEvent::Raised { session }) = alarm.recv().await else {
        panic!("alarm was not raised");
    };

    sleep(Duration::from_secs(35)).await;
    assert!(drain(&mut alarm).is_empty());
    assert_eq!(
        engine.status().await,
        EngineStatus::Alarm {
            session,
            has_payload: false
        }
    );
    assert_eq!(device.count(|c| *c == SinkCall::Payload(1)), 0);

    assert!(engine.acknowledge_alarm().await);
    assert_eq!(engine.status().await, EngineStatus::Idle);
    assert!(engine.start_countdown(craft(60)).await.is_ok());
    engine.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn no_new_countdown_while_alarm_is_unacknowledged() {
    let engine = engine(ScriptedSpeech::failing(), RecordingDevice::default());
    let mut alarm = engine.subscribe_alarm_events();

    let first = engine.start_countdown(craft(1)).await.unwrap();
    assert!(matches!(alarm.recv().await, Ok(AlarmEvent::Raised { .. })));

    assert!(!engine.cancel_countdown().await);
    assert_eq!(
        engine.start_countdown(craft(60)).await,
        Err(EngineError::SessionActive)
    );

    assert!(engine.acknowledge_alarm().await);
    let second = engine.start_countdown(craft(60)).await.unwrap();
    assert_ne!(first, second);
    engine.shutdown().await;
}
