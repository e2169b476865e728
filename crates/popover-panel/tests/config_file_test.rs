//! Loading panel configuration from disk.

#![cfg(feature = "config")]

use std::io::Write;
use std::time::Duration;

use popover_core::animation::SpringAnimators;
use popover_panel::{
    ConfigError, GestureCoordinator, PanelConfig, PanelState, PanelStateMachine, RecordingSink,
};

fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file
}

#[test]
fn toml_file_drives_the_machine() {
    let file = write_temp(
        ".toml",
        r#"
        closed_offset = 300.0
        close_velocity_threshold = 120.0
        open_corner_radius = 8.0

        [tap]
        duration_secs = 0.2
        damping_ratio = 1.0
        "#,
    );
    let config = PanelConfig::from_toml_file(file.path())
        .and_then(PanelConfig::validated)
        .unwrap();
    assert_eq!(config.closed_offset, 300.0);
    assert_eq!(config.tap.duration(), Duration::from_millis(200));

    let mut c = GestureCoordinator::new(PanelStateMachine::new(
        config,
        SpringAnimators,
        RecordingSink::new(),
    ));
    assert_eq!(c.machine().sink().offset, 300.0);

    c.handle(&popover_core::gesture::GestureEvent::Tap(
        popover_core::gesture::TapEvent,
    ));
    // 0.2s at 16ms frames: done within 13 frames.
    let mut landed = None;
    for _ in 0..13 {
        if let Some(state) = c.tick(Duration::from_millis(16)) {
            landed = Some(state);
            break;
        }
    }
    assert_eq!(landed, Some(PanelState::Open));
    assert_eq!(c.machine().sink().corner_radius, 8.0);
}

#[test]
fn json_file_loads() {
    let file = write_temp(
        ".json",
        r#"{ "closed_offset": 512.0, "pan": { "duration_secs": 0.75, "damping_ratio": 1.0 } }"#,
    );
    let config = PanelConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.closed_offset, 512.0);
    assert_eq!(config.pan.duration_secs, 0.75);
    assert_eq!(config.tap, PanelConfig::default().tap);
}

#[test]
fn invalid_values_fail_validation() {
    let file = write_temp(
        ".toml",
        r#"
        closed_offset = -1.0
        [pan]
        duration_secs = 0.0
        "#,
    );
    let err = PanelConfig::from_toml_file(file.path())
        .and_then(PanelConfig::validated)
        .unwrap_err();
    match err {
        ConfigError::Validation(errors) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn unreadable_path_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PanelConfig::from_toml_file(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
