// packages/engine/tests/session_replay.rs
//! End-to-end replay of small captured sessions

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::sync::mpsc;
use victrola_engine::effects::pointer::ButtonState;
use victrola_engine::playback::{
    Control, DriverExit, ManualTimer, PlaybackClock, PlaybackDriver, RunMode, SystemTimer,
};
use victrola_engine::recording::event_log::FilterPolicy;
use victrola_engine::recording::{load_log, parse_log};
use victrola_engine::replay::images::AnyImage;
use victrola_engine::replay::sink::{Command, Diagnostic, RecordingSink};
use victrola_engine::replay::ReplayEngine;

const SCENARIO: &str = r#"[
    {"type": "framebuffer", "time": 0, "payload": {"id": "img1"}},
    {"type": "pointerupdate", "time": 100, "payload": {"x": 5, "y": 5, "Lmb": 1}},
    {"type": "framebuffer", "time": 200, "payload": {"id": "img2"}}
]"#;

fn scenario_engine() -> ReplayEngine<RecordingSink> {
    let log = parse_log(SCENARIO, FilterPolicy::KeepAll).unwrap();
    let mut engine = ReplayEngine::new(Arc::new(log), RecordingSink::new(), AnyImage);
    engine.reset();
    engine.sink_mut().take();
    engine
}

#[test]
fn test_scenario_forward_then_back() {
    let mut engine = scenario_engine();

    engine.seek(150.0);
    assert_eq!(engine.applied_count(), 2);
    assert_eq!(
        engine.sink_mut().take(),
        vec![
            Command::DrawFramebuffer {
                id: "img1".to_string()
            },
            Command::MovePointer {
                x: 5.0,
                y: 5.0,
                buttons: ButtonState {
                    left: true,
                    ..Default::default()
                },
            },
        ]
    );
    assert_eq!(engine.effects().ripples().markers().len(), 1);
    assert_eq!(engine.effects().ripples().markers()[0].time, 100.0);

    let outcome = engine.seek(50.0);
    assert!(outcome.rewound);
    assert_eq!(engine.applied_count(), 1);
    assert_eq!(
        engine.sink_mut().take(),
        vec![
            Command::ClearToBaseline,
            Command::ResetKeyIndicators,
            Command::DrawFramebuffer {
                id: "img1".to_string()
            },
        ]
    );
    assert_eq!(engine.effects().pointer().position(), None);
    assert!(engine.effects().ripples().markers().is_empty());
}

#[test]
fn test_timeline_end_includes_slack() {
    let engine = scenario_engine();
    assert_eq!(engine.end_time(), 450.0);
}

#[test]
fn test_play_from_end_resets_first() {
    let mut engine = scenario_engine();
    let mut clock = PlaybackClock::new(ManualTimer::new());

    engine.seek(200.0);
    assert_eq!(engine.applied_count(), 2);
    engine.seek(f64::MAX);
    assert_eq!(engine.applied_count(), 3);
    engine.sink_mut().take();

    clock.play(&mut engine);
    assert_eq!(engine.sink().commands()[0], Command::ClearToBaseline);
    assert_eq!(engine.applied_count(), 0);
}

#[test]
fn test_ripple_visible_for_its_duration() {
    let log = parse_log(
        r#"[["pointerupdate", 1000, {"x": 10, "y": 20, "Lmb": 1}]]"#,
        FilterPolicy::KeepAll,
    )
    .unwrap();
    let mut engine = ReplayEngine::new(Arc::new(log), RecordingSink::new(), AnyImage);

    // the click is applied once the cursor passes 1000
    engine.seek(1000.5);
    assert_eq!(engine.ripples().len(), 1);

    let trail = engine.effects().ripples();
    let marker = trail.markers()[0];
    assert!(trail.progress(&marker, 999.0).is_none());
    assert_eq!(trail.progress(&marker, 1000.0), Some(0.0));
    assert!(trail.progress(&marker, 1799.0).is_some());
    assert!(trail.progress(&marker, 1800.0).is_none());

    engine.seek(1249.0);
    assert_eq!(engine.ripples().len(), 1);
}

#[test]
fn test_missing_images_are_reported() {
    let log = parse_log(SCENARIO, FilterPolicy::KeepAll).unwrap();
    let images: HashSet<String> = ["img1".to_string()].into_iter().collect();
    let mut engine = ReplayEngine::new(Arc::new(log), RecordingSink::new(), images);

    engine.seek(engine.end_time());

    assert_eq!(engine.applied_count(), 3);
    let draws = engine
        .sink()
        .commands()
        .iter()
        .filter(|c| matches!(c, Command::DrawFramebuffer { .. }))
        .count();
    assert_eq!(draws, 1);
    assert!(matches!(
        &engine.sink().diagnostics()[..],
        [Diagnostic::MissingResource { index: 2, id, .. }] if id == "img2"
    ));
}

#[test]
fn test_typed_text_survives_rewind() {
    let json = r#"[
        {"type": "keypress", "time": 10, "payload": {"key": 104}},
        {"type": "keyrelease", "time": 20, "payload": {"key": 104}},
        {"type": "keypress", "time": 30, "payload": {"key": 105}},
        {"type": "keypress", "time": 40, "payload": {"key": 65293}}
    ]"#;
    let log = parse_log(json, FilterPolicy::KeepAll).unwrap();
    let mut engine = ReplayEngine::new(Arc::new(log), RecordingSink::new(), AnyImage);

    engine.seek(100.0);
    assert_eq!(engine.keystrokes(), "hi[Return]\n");

    engine.seek(35.0);
    assert_eq!(engine.keystrokes(), "hi");

    engine.seek(15.0);
    assert_eq!(engine.keystrokes(), "h");
}

#[tokio::test]
async fn test_load_log_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SCENARIO.as_bytes()).unwrap();

    let log = load_log(file.path(), FilterPolicy::DropInputs).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log.observed_count(), 3);
    assert_eq!(log.tmax(), 200.0);
}

#[tokio::test(start_paused = true)]
async fn test_driver_plays_scenario_to_end() {
    let mut engine = scenario_engine();
    let mut driver = PlaybackDriver::new(
        PlaybackClock::new(SystemTimer::new()),
        Duration::from_millis(16),
    );
    let (tx, rx) = mpsc::channel(4);

    tx.send(Control::SetSpeed(2.0)).await.unwrap();
    tx.send(Control::Play).await.unwrap();

    let exit = driver.run(&mut engine, rx, RunMode::UntilEnd).await;

    assert_eq!(exit, DriverExit::Ended);
    assert_eq!(engine.current_time(), engine.end_time());
    assert_eq!(engine.applied_count(), 3);
    assert!(!engine.is_playing());
}
