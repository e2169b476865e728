#![forbid(unsafe_code)]

//! PropertyAnimator: a time-driven, interruptible animator.
//!
//! A [`PropertyAnimator`] advances a linear time fraction on every
//! [`tick`](Animator::tick) and exposes it through a [`SpringTiming`] curve.
//! It can be paused, scrubbed, reversed in place, continued at a new speed
//! or forced to either end.
//!
//! # Value mapping
//!
//! Every run or scrub starts from an *anchor*: the position and displayed
//! value at the moment the animator was started, paused, continued or
//! turned around.
//!
//! - **Running**: the value eases along the spring curve from the anchor
//!   value to the end it is heading for.
//! - **Paused**: scrubbing is linear. Positions between 0 and the anchor map
//!   linearly onto `[0, anchor value]`, positions above it onto
//!   `[anchor value, 1]`. A scrub that starts at rest therefore moves the
//!   value 1:1 with the fraction.
//!
//! The value is continuous across every state change.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use popover_core::animation::{Animator, PropertyAnimator, SpringTiming};
//!
//! let mut animator = PropertyAnimator::new(Duration::from_secs(1), SpringTiming::critical());
//! animator.start();
//! animator.pause();
//! animator.set_fraction_complete(0.4);   // scrub
//! animator.set_reversed(true);           // head back to the start
//! animator.continue_animation(0.0);      // remaining 40% at original speed
//! ```
//!
//! # Invariants
//!
//! 1. The forward position is always in [0.0, 1.0].
//! 2. `tick()` only advances in `Running` state.
//! 3. A run ends by returning exactly one terminal position from `tick()`,
//!    after which the animator is `Inactive`.
//! 4. `set_reversed()` never moves the forward position.
//! 5. Starting, pausing, continuing or reversing never makes `value()` jump.
//!
//! # Failure Modes
//!
//! - Zero duration: clamped to 1ns to avoid division by zero.
//! - NaN fraction: ignored by `set_fraction_complete()`.
//! - Continuing with nothing left to run: completes on the next tick.

use std::time::Duration;

use super::{AnimatingPosition, Animator, AnimatorState, SpringTiming};

/// Position and displayed value where the current run or scrub began.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Anchor {
    position: f64,
    value: f64,
}

impl Anchor {
    const REST: Self = Self {
        position: 0.0,
        value: 0.0,
    };
}

/// A pausable, reversible, scrubbable animator with spring timing.
#[derive(Debug, Clone)]
pub struct PropertyAnimator {
    duration: Duration,
    timing: SpringTiming,
    state: AnimatorState,
    /// Linear time fraction in forward terms.
    position: f64,
    reversed: bool,
    /// Fraction per second while running.
    speed: f64,
    /// Terminal position set by `finish_animation`, reported on next tick.
    pending: Option<AnimatingPosition>,
    anchor: Anchor,
}

impl PropertyAnimator {
    /// Create an inactive animator at the start.
    #[must_use]
    pub fn new(duration: Duration, timing: SpringTiming) -> Self {
        let duration = if duration.is_zero() {
            Duration::from_nanos(1)
        } else {
            duration
        };
        Self {
            duration,
            timing,
            state: AnimatorState::Inactive,
            position: 0.0,
            reversed: false,
            speed: 1.0 / duration.as_secs_f64(),
            pending: None,
            anchor: Anchor::REST,
        }
    }

    /// Total duration of one full run at original speed.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Timing curve.
    #[inline]
    #[must_use]
    pub fn timing(&self) -> SpringTiming {
        self.timing
    }

    /// Linear time fraction in forward terms, ignoring direction.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Whether the animator is advancing on tick.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    fn base_speed(&self) -> f64 {
        1.0 / self.duration.as_secs_f64()
    }

    /// Re-anchor at the current position and displayed value.
    fn anchor_here(&mut self) {
        self.anchor = Anchor {
            position: self.position,
            value: self.value(),
        };
    }

    fn eased_value(&self) -> f64 {
        let Anchor { position, value } = self.anchor;
        let end = if self.reversed { 0.0 } else { 1.0 };
        let span = end - position;
        let t = if span.abs() < f64::EPSILON {
            1.0
        } else {
            ((self.position - position) / span).clamp(0.0, 1.0)
        };
        value + (end - value) * self.timing.progress(t)
    }

    fn scrubbed_value(&self) -> f64 {
        let Anchor { position, value } = self.anchor;
        if self.position <= position {
            if position <= 0.0 {
                value
            } else {
                value * self.position / position
            }
        } else if position >= 1.0 {
            value
        } else {
            value + (1.0 - value) * (self.position - position) / (1.0 - position)
        }
    }
}

impl Animator for PropertyAnimator {
    fn start(&mut self) {
        if self.state == AnimatorState::Running {
            return;
        }
        self.pending = None;
        self.anchor_here();
        self.speed = self.base_speed();
        self.state = AnimatorState::Running;
    }

    fn pause(&mut self) {
        if self.state != AnimatorState::Paused && self.pending.is_none() {
            let value = self.value().clamp(0.0, 1.0);
            self.anchor = Anchor {
                position: self.position,
                value,
            };
            self.state = AnimatorState::Paused;
        }
    }

    fn state(&self) -> AnimatorState {
        self.state
    }

    fn fraction_complete(&self) -> f64 {
        if self.reversed {
            1.0 - self.position
        } else {
            self.position
        }
    }

    fn set_fraction_complete(&mut self, fraction: f64) {
        if fraction.is_nan() {
            return;
        }
        let f = fraction.clamp(0.0, 1.0);
        self.position = if self.reversed { 1.0 - f } else { f };
    }

    fn is_reversed(&self) -> bool {
        self.reversed
    }

    fn set_reversed(&mut self, reversed: bool) {
        if self.state == AnimatorState::Running && reversed != self.reversed {
            self.anchor_here();
        }
        self.reversed = reversed;
    }

    fn continue_animation(&mut self, duration_factor: f64) {
        if self.pending.is_some() {
            return;
        }
        self.anchor_here();
        let remaining = 1.0 - self.fraction_complete();
        self.speed = if duration_factor.is_nan() || duration_factor <= 0.0 {
            self.base_speed()
        } else {
            remaining / (duration_factor * self.duration.as_secs_f64())
        };
        self.state = AnimatorState::Running;
    }

    fn finish_animation(&mut self, position: AnimatingPosition) {
        match position {
            AnimatingPosition::Start => self.position = 0.0,
            AnimatingPosition::End => self.position = 1.0,
            AnimatingPosition::Current => {}
        }
        self.state = AnimatorState::Inactive;
        self.pending = Some(position);
    }

    fn value(&self) -> f64 {
        match self.state {
            AnimatorState::Running => self.eased_value(),
            AnimatorState::Paused => self.scrubbed_value(),
            AnimatorState::Inactive => self.position,
        }
    }

    fn tick(&mut self, dt: Duration) -> Option<AnimatingPosition> {
        if let Some(position) = self.pending.take() {
            return Some(position);
        }
        if self.state != AnimatorState::Running {
            return None;
        }

        let fraction = self.fraction_complete() + self.speed * dt.as_secs_f64();
        if fraction >= 1.0 || self.speed <= 0.0 {
            self.set_fraction_complete(1.0);
            self.state = AnimatorState::Inactive;
            return Some(if self.reversed {
                AnimatingPosition::Start
            } else {
                AnimatingPosition::End
            });
        }
        self.set_fraction_complete(fraction);
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
