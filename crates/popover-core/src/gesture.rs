#![forbid(unsafe_code)]

//! Gesture recognition: turns raw pointer samples into taps and vertical pans.
//!
//! [`PanRecognizer`] is a stateful processor that converts a touch sequence
//! (down → move* → up) into either a single [`TapEvent`] or a
//! [`PanEvent`] stream (`Began`, `Changed`*, `Ended`).
//!
//! # State Machine
//!
//! - **Idle**: no touch in progress.
//! - **Touching**: finger down, vertical travel below `pan_threshold`.
//! - **Panning**: travel crossed the threshold; every move emits `Changed`.
//!
//! # Invariants
//!
//! 1. Tap and Pan never both emit for the same down → up interaction.
//!    Once a pan begins, the up produces `Ended`, never `Tap`.
//! 2. Every `Began` is followed by exactly one `Ended` (on up or cancel).
//! 3. `translation_y` is measured from the touch-down point.
//! 4. `velocity_y` only uses samples inside `velocity_window` of the latest
//!    sample; a finger that stopped before lifting reports 0.
//! 5. After `reset()`, the recognizer is idle.
//!
//! # Failure Modes
//!
//! - A move or up without a preceding down is ignored.
//! - A new down while a touch is tracked restarts tracking without emitting
//!   `Ended` (the caller handles lost touches with `Cancel`).

use std::collections::VecDeque;
use std::time::Duration;

use web_time::Instant;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Kind of raw pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Finger touched down.
    Down,
    /// Finger moved while down.
    Move,
    /// Finger lifted.
    Up,
    /// Touch was taken away by the system.
    Cancel,
}

/// A raw pointer sample in view coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub y: f64,
    pub time: Instant,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerEventKind, y: f64, time: Instant) -> Self {
        Self { kind, y, time }
    }
}

/// Phase of a continuous pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
}

/// A recognized tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TapEvent;

/// A recognized vertical pan sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    /// Vertical distance from the touch-down point (points, down positive).
    pub translation_y: f64,
    /// Vertical velocity (points/second, down positive).
    pub velocity_y: f64,
}

impl PanEvent {
    #[must_use]
    pub fn began() -> Self {
        Self {
            phase: PanPhase::Began,
            translation_y: 0.0,
            velocity_y: 0.0,
        }
    }

    #[must_use]
    pub fn changed(translation_y: f64) -> Self {
        Self {
            phase: PanPhase::Changed,
            translation_y,
            velocity_y: 0.0,
        }
    }

    #[must_use]
    pub fn ended(translation_y: f64, velocity_y: f64) -> Self {
        Self {
            phase: PanPhase::Ended,
            translation_y,
            velocity_y,
        }
    }
}

/// Output of the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    Tap(TapEvent),
    Pan(PanEvent),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds and timeouts for tap/pan recognition.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Vertical travel (points) before a pan begins (default: 10.0).
    pub pan_threshold: f64,
    /// Longest down → up interval still recognized as a tap (default: 300ms).
    pub tap_timeout: Duration,
    /// Trailing window used for velocity estimation (default: 100ms).
    pub velocity_window: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan_threshold: 10.0,
            tap_timeout: Duration::from_millis(300),
            velocity_window: Duration::from_millis(100),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TouchTracker {
    start_y: f64,
    start_time: Instant,
    panning: bool,
    samples: VecDeque<(Instant, f64)>,
}

impl TouchTracker {
    fn new(y: f64, time: Instant) -> Self {
        let mut samples = VecDeque::with_capacity(8);
        samples.push_back((time, y));
        Self {
            start_y: y,
            start_time: time,
            panning: false,
            samples,
        }
    }

    fn record(&mut self, y: f64, time: Instant, window: Duration) {
        self.samples.push_back((time, y));
        while let Some(&(t, _)) = self.samples.front() {
            if time.saturating_duration_since(t) > window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    fn velocity(&self) -> f64 {
        let (Some(&(t0, y0)), Some(&(t1, y1))) = (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };
        let dt = t1.saturating_duration_since(t0).as_secs_f64();
        if dt <= 0.0 { 0.0 } else { (y1 - y0) / dt }
    }
}

// ---------------------------------------------------------------------------
// PanRecognizer
// ---------------------------------------------------------------------------

/// Stateful recognizer that transforms pointer samples into gestures.
pub struct PanRecognizer {
    config: GestureConfig,
    touch: Option<TouchTracker>,
}

impl std::fmt::Debug for PanRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanRecognizer")
            .field("tracking", &self.touch.is_some())
            .field("panning", &self.is_panning())
            .finish()
    }
}

impl Default for PanRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl PanRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            touch: None,
        }
    }

    /// Process a pointer sample, returning the gesture it completes or
    /// advances, if any.
    pub fn process(&mut self, event: &PointerEvent) -> Option<GestureEvent> {
        match event.kind {
            PointerEventKind::Down => {
                self.touch = Some(TouchTracker::new(event.y, event.time));
                None
            }
            PointerEventKind::Move => self.on_move(event.y, event.time),
            PointerEventKind::Up => self.on_up(event.y, event.time),
            PointerEventKind::Cancel => {
                let touch = self.touch.take()?;
                touch.panning.then(|| {
                    GestureEvent::Pan(PanEvent::ended(event.y - touch.start_y, 0.0))
                })
            }
        }
    }

    /// Whether a pan is in progress.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.touch.as_ref().is_some_and(|t| t.panning)
    }

    /// Drop any tracked touch without emitting.
    pub fn reset(&mut self) {
        self.touch = None;
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }
}

impl PanRecognizer {
    fn on_move(&mut self, y: f64, time: Instant) -> Option<GestureEvent> {
        let window = self.config.velocity_window;
        let threshold = self.config.pan_threshold;
        let touch = self.touch.as_mut()?;
        touch.record(y, time, window);
        let translation_y = y - touch.start_y;

        if touch.panning {
            return Some(GestureEvent::Pan(PanEvent {
                phase: PanPhase::Changed,
                translation_y,
                velocity_y: touch.velocity(),
            }));
        }

        if translation_y.abs() >= threshold {
            touch.panning = true;
            #[cfg(feature = "tracing")]
            tracing::trace!(translation_y, "pan began");
            return Some(GestureEvent::Pan(PanEvent {
                phase: PanPhase::Began,
                translation_y,
                velocity_y: touch.velocity(),
            }));
        }
        None
    }

    fn on_up(&mut self, y: f64, time: Instant) -> Option<GestureEvent> {
        let mut touch = self.touch.take()?;
        touch.record(y, time, self.config.velocity_window);

        if touch.panning {
            let velocity_y = touch.velocity();
            #[cfg(feature = "tracing")]
            tracing::trace!(velocity_y, "pan ended");
            return Some(GestureEvent::Pan(PanEvent::ended(
                y - touch.start_y,
                velocity_y,
            )));
        }

        let held = time.saturating_duration_since(touch.start_time);
        (held <= self.config.tap_timeout).then_some(GestureEvent::Tap(TapEvent))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
