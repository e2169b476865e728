#![no_main]

use std::time::{Duration, Instant};

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use popover_core::animation::SpringAnimators;
use popover_core::gesture::{PanRecognizer, PointerEvent, PointerEventKind};
use popover_panel::{GestureCoordinator, PanelConfig, PanelStateMachine, PanelVisual, RecordingSink};

#[derive(Debug, Arbitrary)]
enum Step {
    Down(i16),
    Move(i16),
    Up(i16),
    Cancel,
    /// Advance the clock and the animation by up to 255ms.
    Wait(u8),
}

fuzz_target!(|steps: Vec<Step>| {
    // Cap length to keep fuzzing fast.
    if steps.len() > 512 {
        return;
    }

    let mut recognizer = PanRecognizer::default();
    let mut panel = GestureCoordinator::new(PanelStateMachine::new(
        PanelConfig::default(),
        SpringAnimators,
        RecordingSink::new(),
    ));
    let mut now = Instant::now();
    let mut y = 0.0;

    for step in steps {
        let kind = match step {
            Step::Down(to) => {
                y = f64::from(to);
                PointerEventKind::Down
            }
            Step::Move(to) => {
                y = f64::from(to);
                PointerEventKind::Move
            }
            Step::Up(to) => {
                y = f64::from(to);
                PointerEventKind::Up
            }
            Step::Cancel => PointerEventKind::Cancel,
            Step::Wait(ms) => {
                let dt = Duration::from_millis(u64::from(ms));
                now += dt;
                panel.tick(dt);
                continue;
            }
        };
        if let Some(gesture) = recognizer.process(&PointerEvent::new(kind, y, now)) {
            panel.handle(&gesture);
        }

        assert!(panel.machine().group_len() <= 1, "group grew past one");
        if let Some(fraction) = panel.machine().lead_fraction() {
            assert!((0.0..=1.0).contains(&fraction), "fraction {fraction}");
        }
        assert!(panel.machine().sink().offset.is_finite());
    }

    // Release whatever is held and let it come to rest.
    recognizer.reset();
    panel.machine_mut().resolve_and_finish(popover_panel::FinishDirection::KeepCurrent);
    for _ in 0..1_000 {
        if panel.tick(Duration::from_millis(16)).is_some() {
            break;
        }
    }
    assert!(!panel.machine().is_transitioning(), "never came to rest");
    let expected = PanelVisual::for_state(panel.current_state(), panel.machine().config());
    assert_eq!(panel.machine().sink().visual(), expected);
});
