//! End-to-end: pointer samples → PanRecognizer → GestureCoordinator → sink.

use std::time::{Duration, Instant};

use popover_core::animation::SpringAnimators;
use popover_core::gesture::{PanRecognizer, PointerEvent, PointerEventKind};
use popover_panel::{GestureCoordinator, PanelConfig, PanelState, PanelStateMachine, RecordingSink};

const FRAME: Duration = Duration::from_millis(16);

/// Pointer-driven harness with a virtual clock.
struct Harness {
    recognizer: PanRecognizer,
    coordinator: GestureCoordinator<SpringAnimators, RecordingSink>,
    now: Instant,
    y: f64,
}

impl Harness {
    fn new() -> Self {
        Self {
            recognizer: PanRecognizer::default(),
            coordinator: GestureCoordinator::new(PanelStateMachine::new(
                PanelConfig::default(),
                SpringAnimators,
                RecordingSink::new(),
            )),
            now: Instant::now(),
            y: 500.0,
        }
    }

    fn feed(&mut self, kind: PointerEventKind) {
        let event = PointerEvent::new(kind, self.y, self.now);
        if let Some(gesture) = self.recognizer.process(&event) {
            self.coordinator.handle(&gesture);
        }
    }

    /// Advance one frame of wall time and animation.
    fn frame(&mut self) -> Option<PanelState> {
        self.now += FRAME;
        self.coordinator.tick(FRAME)
    }

    fn down(&mut self) {
        self.feed(PointerEventKind::Down);
    }

    /// Move by `dy` per frame for `frames` frames.
    fn drag(&mut self, dy: f64, frames: usize) {
        for _ in 0..frames {
            self.frame();
            self.y += dy;
            self.feed(PointerEventKind::Move);
        }
    }

    fn hold(&mut self, frames: usize) {
        for _ in 0..frames {
            self.frame();
            self.feed(PointerEventKind::Move);
        }
    }

    fn up(&mut self) {
        self.frame();
        self.feed(PointerEventKind::Up);
    }

    fn tap(&mut self) {
        self.down();
        self.up();
    }

    fn settle(&mut self) -> PanelState {
        for _ in 0..1_000 {
            if let Some(state) = self.frame() {
                return state;
            }
        }
        panic!("transition never completed");
    }

    fn state(&self) -> PanelState {
        self.coordinator.current_state()
    }

    fn offset(&self) -> f64 {
        self.coordinator.machine().sink().offset
    }
}

#[test]
fn tap_opens_then_tap_closes() {
    let mut h = Harness::new();
    h.tap();
    assert_eq!(h.settle(), PanelState::Open);
    assert_eq!(h.offset(), 0.0);

    h.tap();
    assert_eq!(h.settle(), PanelState::Closed);
    assert_eq!(h.offset(), 440.0);
}

#[test]
fn drag_follows_finger_while_paused() {
    let mut h = Harness::new();
    h.down();
    h.drag(-20.0, 11);
    // 220 points of travel over a 440 point run.
    assert!(h.coordinator.machine().is_transitioning());
    assert!((h.coordinator.machine().lead_fraction().unwrap() - 0.5).abs() < 1e-9);
    assert!((h.offset() - 220.0).abs() < 1e-9, "offset {}", h.offset());

    // Holding still leaves the animation frozen.
    let frozen = h.offset();
    h.hold(10);
    assert_eq!(h.offset(), frozen);
}

#[test]
fn upward_fling_opens() {
    let mut h = Harness::new();
    h.down();
    h.drag(-20.0, 6);
    h.up();
    assert_eq!(h.settle(), PanelState::Open);
    assert_eq!(h.offset(), 0.0);
}

#[test]
fn downward_fling_from_open_closes() {
    let mut h = Harness::new();
    h.tap();
    h.settle();

    h.down();
    h.drag(15.0, 6);
    h.up();
    assert_eq!(h.settle(), PanelState::Closed);
    assert_eq!(h.offset(), 440.0);
    assert!(!h.coordinator.machine().sink().shadow.is_visible());
}

#[test]
fn drag_up_then_flick_down_returns_closed() {
    let mut h = Harness::new();
    h.down();
    h.drag(-20.0, 8);
    h.drag(20.0, 3);
    h.up();
    assert_eq!(h.settle(), PanelState::Closed);
    assert_eq!(h.offset(), 440.0);
}

#[test]
fn release_after_holding_still_keeps_direction() {
    let mut h = Harness::new();
    h.down();
    h.drag(-20.0, 5);
    // Stay put longer than the velocity window so the release is at rest.
    h.hold(10);
    h.up();
    assert!(!h.coordinator.machine().lead_is_reversed());
    assert_eq!(h.settle(), PanelState::Open);
}

#[test]
fn catch_animation_mid_flight() {
    let mut h = Harness::new();
    h.tap();
    for _ in 0..8 {
        h.frame();
    }
    let caught_at = h.offset();
    assert!(caught_at > 0.0 && caught_at < 440.0);

    h.down();
    h.drag(-12.0, 1);
    // Began pauses the tap animation where it was.
    assert_eq!(h.coordinator.machine().group_len(), 1);
    let paused = h.coordinator.machine().lead_fraction().unwrap();
    assert!(paused > 0.0 && paused < 1.0);
    h.hold(5);
    // Only the finger moves it now: 12 points past where it was caught.
    let held = h.coordinator.machine().lead_fraction().unwrap();
    assert!((held - (paused + 12.0 / 440.0)).abs() < 1e-9);

    h.drag(20.0, 4);
    h.up();
    assert_eq!(h.settle(), PanelState::Closed);
}

#[test]
fn cancelled_pan_finishes_in_current_direction() {
    let mut h = Harness::new();
    h.down();
    h.drag(-20.0, 4);
    h.frame();
    h.feed(PointerEventKind::Cancel);
    // Cancel ends the pan at zero velocity.
    assert_eq!(h.settle(), PanelState::Open);
}

#[test]
fn tiny_movement_is_still_a_tap() {
    let mut h = Harness::new();
    h.down();
    h.drag(-3.0, 2);
    h.up();
    assert!(h.coordinator.machine().is_transitioning());
    assert_eq!(h.coordinator.machine().target(), Some(PanelState::Open));
    assert_eq!(h.settle(), PanelState::Open);
    assert_eq!(h.state(), PanelState::Open);
}
