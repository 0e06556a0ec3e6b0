//! End-to-end tests for the timer service on a paused clock

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{RwLock, mpsc};

use countdown_types::AudioSettings;

use super::{Services, TICK_PERIOD, TimerService, spawn_services};
use crate::audio::create_audio_channel;
use crate::error::{SessionError, TimerError};
use crate::test_support::{RecordingSpeech, RecordingTones};
use crate::timer::{Notification, TimerSignal, TimerState};

struct Harness {
    services: Services,
    tones: RecordingTones,
    speech: RecordingSpeech,
    signals: Arc<Mutex<Vec<TimerSignal>>>,
}

async fn harness() -> Harness {
    let settings = AudioSettings {
        test_tone_on_start: false,
        ..AudioSettings::default()
    };
    let tones = RecordingTones::default();
    let speech = RecordingSpeech::default();
    let mut services = spawn_services(
        Arc::new(RwLock::new(settings)),
        tones.clone(),
        speech.clone(),
    )
    .await;

    // Stand-in UI: keep draining so nothing is dropped
    let signals = Arc::new(Mutex::new(Vec::new()));
    let mut rx = std::mem::replace(&mut services.signals, tokio::sync::mpsc::channel(1).1);
    let sink = Arc::clone(&signals);
    tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            sink.lock().unwrap().push(signal);
        }
    });

    Harness {
        services,
        tones,
        speech,
        signals,
    }
}

async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[tokio::test(start_paused = true)]
async fn one_minute_run_warns_then_alarms() {
    let h = harness().await;
    let handle = &h.services.handle;

    let snapshot = handle.request_start(1, [5]).await.unwrap();
    assert_eq!(snapshot.state, TimerState::Running);
    assert_eq!(snapshot.display, "01:00");
    assert_eq!(snapshot.warnings, vec![5]);

    sleep_ms(61_000).await;

    let status = handle.status().await.unwrap();
    assert_eq!(status.state, TimerState::Expired);
    assert_eq!(status.remaining_secs, 0);
    assert!(status.visual.expired);

    assert_eq!(h.tones.frequencies(), vec![880.0, 440.0]);
    assert_eq!(h.speech.phrases(), vec!["5 seconds", "Time's up!"]);

    let signals = h.signals.lock().unwrap();
    let expired = signals
        .iter()
        .filter(|s| **s == TimerSignal::StateChanged(TimerState::Expired))
        .count();
    assert_eq!(expired, 1);
    assert!(signals.contains(&TimerSignal::DisplayUpdated("00:30".to_string())));
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_until_resume() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    sleep_ms(3_500).await;
    let paused = handle.request_pause().await.unwrap();
    assert_eq!(paused.remaining_secs, 57);
    assert_eq!(paused.state, TimerState::Paused);

    sleep_ms(10_000).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 57);

    handle.request_resume().await.unwrap();
    sleep_ms(1_500).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 56);
}

#[tokio::test(start_paused = true)]
async fn toggle_pause_round_trip() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    sleep_ms(1_500).await;
    assert_eq!(
        handle.request_toggle_pause().await.unwrap().state,
        TimerState::Paused
    );
    sleep_ms(5_000).await;
    assert_eq!(
        handle.request_toggle_pause().await.unwrap().state,
        TimerState::Running
    );
    sleep_ms(1_500).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 58);
}

#[tokio::test(start_paused = true)]
async fn invalid_duration_leaves_service_idle() {
    let h = harness().await;
    let handle = &h.services.handle;

    assert_eq!(
        handle.request_start(0, [10]).await,
        Err(TimerError::Session(SessionError::InvalidDuration(0)))
    );
    assert_eq!(
        handle.request_start(61, []).await,
        Err(TimerError::Session(SessionError::InvalidDuration(61)))
    );
    assert_eq!(handle.status().await.unwrap().state, TimerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn reset_rearms_warnings() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, [58]).await.unwrap();
    sleep_ms(2_500).await;
    let reset = handle.request_reset().await.unwrap();
    assert_eq!(reset.remaining_secs, 60);
    assert!(reset.fired_warnings.is_empty());

    sleep_ms(2_500).await;
    assert_eq!(h.speech.phrases(), vec!["58 seconds", "58 seconds"]);
    assert_eq!(handle.status().await.unwrap().fired_warnings, vec![58]);
}

#[tokio::test(start_paused = true)]
async fn repeated_rearming_never_doubles_the_tick() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    handle.request_reset().await.unwrap();
    handle.request_reset().await.unwrap();
    handle.request_pause().await.unwrap();
    handle.request_resume().await.unwrap();

    sleep_ms(10_500).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 50);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_the_countdown() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    sleep_ms(2_500).await;
    let cancelled = handle.request_cancel().await.unwrap();
    assert_eq!(cancelled.state, TimerState::Idle);

    sleep_ms(10_000).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 58);

    // Back from setup with the same session
    assert_eq!(
        handle.request_reset().await.unwrap().state,
        TimerState::Running
    );
}

#[tokio::test(start_paused = true)]
async fn rejected_start_does_not_disturb_running_timer() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    sleep_ms(1_500).await;
    assert_eq!(
        handle.request_start(5, []).await,
        Err(TimerError::AlreadyActive)
    );
    sleep_ms(1_000).await;
    assert_eq!(handle.status().await.unwrap().remaining_secs, 58);
}

#[tokio::test(start_paused = true)]
async fn restart_after_expiry() {
    let h = harness().await;
    let handle = &h.services.handle;

    handle.request_start(1, []).await.unwrap();
    sleep_ms(60_500).await;
    assert_eq!(handle.status().await.unwrap().state, TimerState::Expired);

    let snapshot = handle.request_start(2, [60]).await.unwrap();
    assert_eq!(snapshot.remaining_secs, 120);
    assert!(!snapshot.visual.expired);
}

#[tokio::test(start_paused = true)]
async fn shutdown_closes_the_handle() {
    let h = harness().await;
    let handle = h.services.handle.clone();
    handle.shutdown().await;
    sleep_ms(10).await;
    assert_eq!(handle.status().await, Err(TimerError::ServiceClosed));
}

#[tokio::test(start_paused = true)]
async fn lagging_ui_still_sees_notifications_and_expiry() {
    let (signal_tx, mut signals) = mpsc::channel(2);
    let (audio_tx, _audio_rx) = create_audio_channel();
    let (timer, handle) = TimerService::new(TICK_PERIOD, signal_tx, audio_tx);
    tokio::spawn(timer.run());

    handle.request_start(1, [5]).await.unwrap();
    // UI stalls for the whole run
    sleep_ms(61_000).await;

    let drained = tokio::time::timeout(Duration::from_secs(120), async {
        let mut seen = Vec::new();
        while let Some(signal) = signals.recv().await {
            let done = signal == TimerSignal::StateChanged(TimerState::Expired);
            seen.push(signal);
            if done {
                break;
            }
        }
        seen
    })
    .await
    .unwrap();

    let kept: Vec<_> = drained.into_iter().filter(|s| !s.is_frame()).collect();
    assert_eq!(
        kept,
        vec![
            TimerSignal::StateChanged(TimerState::Running),
            TimerSignal::Notified(Notification::Warning { remaining_secs: 5 }),
            TimerSignal::Notified(Notification::Alarm),
            TimerSignal::StateChanged(TimerState::Expired),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn queued_speech_finishes_after_shutdown() {
    let settings = AudioSettings {
        test_tone_on_start: false,
        ..AudioSettings::default()
    };
    let speech = RecordingSpeech::with_utterance_len(Duration::from_secs(3));
    let Services {
        handle,
        signals,
        tasks,
    } = spawn_services(
        Arc::new(RwLock::new(settings)),
        RecordingTones::default(),
        speech.clone(),
    )
    .await;
    drop(signals);

    handle.request_start(1, [1]).await.unwrap();
    sleep_ms(60_010).await;
    assert_eq!(handle.status().await.unwrap().state, TimerState::Expired);
    // "1 seconds" is still being spoken; the alarm phrase is queued
    assert_eq!(speech.phrases(), vec!["1 seconds"]);

    handle.shutdown().await;
    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(speech.phrases(), vec!["1 seconds", "Time's up!"]);
}
