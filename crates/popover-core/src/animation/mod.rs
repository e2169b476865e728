#![forbid(unsafe_code)]

//! Interruptible animation primitives.
//!
//! An [`Animator`] is a time-driven value generator running from fraction
//! 0.0 (start) to 1.0 (end). Unlike a fire-and-forget tween it can be
//! paused, scrubbed, reversed in place and forced to completion, which is
//! what lets user input interrupt an in-flight transition without restarting
//! it.
//!
//! # Completion
//!
//! Completion is reported, not called back: [`Animator::tick`] returns the
//! terminal [`AnimatingPosition`] exactly once, on the tick where the
//! animation finishes (naturally or via [`Animator::finish_animation`]).
//! The owner of the handle runs its completion logic synchronously with the
//! returned value.
//!
//! # Invariants
//!
//! 1. `fraction_complete()` is always in [0.0, 1.0].
//! 2. `fraction_complete()` is measured from the *effective* start: flipping
//!    `is_reversed` swaps start and end semantics without moving the
//!    animation.
//! 3. `value()` is expressed in forward terms (0.0 = start, 1.0 = end)
//!    whatever the direction, and scrubs linearly while paused.
//! 4. A terminal position is reported at most once per run.

use std::time::Duration;

pub mod property;
pub mod timing;

pub use property::PropertyAnimator;
pub use timing::SpringTiming;

/// Where an animation came to rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatingPosition {
    /// The animation finished at its start (fraction 0 in forward terms).
    Start,
    /// The animation finished at its end (fraction 1 in forward terms).
    End,
    /// The animation was stopped wherever it happened to be.
    Current,
}

/// Lifecycle state of an animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimatorState {
    /// Not started, or finished.
    #[default]
    Inactive,
    /// Advancing on every tick.
    Running,
    /// Frozen; `fraction_complete` may still be set by hand.
    Paused,
}

/// Capability interface for a pausable, reversible, scrubbable animation.
pub trait Animator {
    /// Start (or restart after completion) from the current fraction.
    fn start(&mut self);

    /// Freeze the animation. No-op unless running.
    fn pause(&mut self);

    /// Current lifecycle state.
    fn state(&self) -> AnimatorState;

    /// Progress from the effective start, in [0.0, 1.0].
    fn fraction_complete(&self) -> f64;

    /// Move the animation to `fraction` (clamped to [0.0, 1.0]) measured
    /// from the effective start.
    fn set_fraction_complete(&mut self, fraction: f64);

    /// Whether the animation currently runs end-to-start.
    fn is_reversed(&self) -> bool;

    /// Set the direction without moving the animation.
    fn set_reversed(&mut self, reversed: bool);

    /// Resume toward the effective end.
    ///
    /// A `duration_factor` of zero (or less) keeps the original speed. A
    /// positive factor makes the remaining part take
    /// `duration_factor * duration`.
    fn continue_animation(&mut self, duration_factor: f64);

    /// Force completion at `position`. The next [`tick`](Animator::tick)
    /// reports it.
    fn finish_animation(&mut self, position: AnimatingPosition);

    /// Displayed progress in forward terms (0.0 = start, 1.0 = end).
    ///
    /// Eased along the timing curve while running; follows
    /// `fraction_complete` linearly while paused and scrubbed.
    fn value(&self) -> f64;

    /// Advance by `dt`. Returns the terminal position on the tick where the
    /// animation completes.
    fn tick(&mut self, dt: Duration) -> Option<AnimatingPosition>;
}

/// Builds animators for a given duration and damping ratio.
pub trait AnimatorFactory {
    /// Concrete handle type produced by this factory.
    type Animator: Animator;

    /// Construct an inactive animator.
    fn build(&self, duration: Duration, damping_ratio: f64) -> Self::Animator;
}

impl<A, F> AnimatorFactory for F
where
    A: Animator,
    F: Fn(Duration, f64) -> A,
{
    type Animator = A;

    fn build(&self, duration: Duration, damping_ratio: f64) -> A {
        self(duration, damping_ratio)
    }
}

/// Factory producing [`PropertyAnimator`]s with spring timing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringAnimators;

impl AnimatorFactory for SpringAnimators {
    type Animator = PropertyAnimator;

    fn build(&self, duration: Duration, damping_ratio: f64) -> PropertyAnimator {
        PropertyAnimator::new(duration, SpringTiming::new(damping_ratio))
    }
}
