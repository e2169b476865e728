#![forbid(unsafe_code)]

//! Gesture coordination: taps and vertical pans to state machine commands.
//!
//! [`GestureCoordinator`] holds no state of its own. Every decision is made
//! from the machine's committed state, its config and the lead animator's
//! direction at the moment the event arrives.
//!
//! # Mapping
//!
//! | input          | commands                                                  |
//! |----------------|-----------------------------------------------------------|
//! | tap            | `start_transition(opposite, tap timing)`                  |
//! | pan `Began`    | `start_transition(opposite, pan timing)`, `pause_active()` |
//! | pan `Changed`  | `scrub(corrected fraction, false)`                        |
//! | pan `Ended`    | `resolve_and_finish(direction from velocity)`             |
//!
//! Taps share the transition group with drags, so a drag that begins while a
//! tap animation is still running grabs that animation where it is, and a
//! tap during any transition is ignored.
//!
//! # Release decision
//!
//! A release with velocity exactly 0 keeps the current direction. Otherwise
//! the panel comes to rest closed iff `velocity_y > close_velocity_threshold`,
//! and the transition is sent toward whichever end of the animation that is:
//!
//! | state before gesture | should close | finishes toward |
//! |----------------------|--------------|-----------------|
//! | open                 | true         | target          |
//! | open                 | false        | origin          |
//! | closed               | true         | origin          |
//! | closed               | false        | target          |
//!
//! The animator is flipped only when its current direction disagrees.

use std::time::Duration;

use popover_core::animation::AnimatorFactory;
use popover_core::gesture::{GestureEvent, PanEvent, PanPhase, TapEvent};

use crate::machine::{FinishDirection, PanelStateMachine};
use crate::state::PanelState;
use crate::visual::VisualSink;

/// Direction an interrupted transition should finish in, for a release with
/// non-zero velocity.
#[must_use]
pub fn release_direction(current: PanelState, should_close: bool) -> FinishDirection {
    let resting = if should_close {
        PanelState::Closed
    } else {
        PanelState::Open
    };
    if resting == current.opposite() {
        FinishDirection::TowardTarget
    } else {
        FinishDirection::TowardOrigin
    }
}

/// Whether a release must flip an animator whose direction is `reversed`.
#[must_use]
pub fn release_flips(current: PanelState, should_close: bool, reversed: bool) -> bool {
    release_direction(current, should_close)
        .reversed()
        .is_some_and(|wanted| wanted != reversed)
}

/// Translates input gestures into [`PanelStateMachine`] commands.
#[derive(Debug)]
pub struct GestureCoordinator<F: AnimatorFactory, S: VisualSink> {
    machine: PanelStateMachine<F, S>,
}

impl<F: AnimatorFactory, S: VisualSink> GestureCoordinator<F, S> {
    /// Wrap `machine`; the coordinator drives it from now on.
    pub fn new(machine: PanelStateMachine<F, S>) -> Self {
        Self { machine }
    }

    /// The driven state machine.
    #[must_use]
    pub fn machine(&self) -> &PanelStateMachine<F, S> {
        &self.machine
    }

    /// Mutable access to the state machine, for commands outside gestures.
    pub fn machine_mut(&mut self) -> &mut PanelStateMachine<F, S> {
        &mut self.machine
    }

    /// Unwrap the state machine.
    #[must_use]
    pub fn into_machine(self) -> PanelStateMachine<F, S> {
        self.machine
    }

    /// Last committed panel state.
    #[must_use]
    pub fn current_state(&self) -> PanelState {
        self.machine.current_state()
    }

    /// Advance animations; see [`PanelStateMachine::tick`].
    pub fn tick(&mut self, dt: Duration) -> Option<PanelState> {
        self.machine.tick(dt)
    }

    /// Dispatch a recognized gesture.
    pub fn handle(&mut self, event: &GestureEvent) {
        match event {
            GestureEvent::Tap(tap) => self.on_tap(tap),
            GestureEvent::Pan(pan) => self.on_pan(pan),
        }
    }

    /// Animate fully to the opposite state.
    pub fn on_tap(&mut self, _tap: &TapEvent) {
        let target = self.machine.current_state().opposite();
        let timing = self.machine.config().tap;
        if !self.machine.start_transition(target, timing) {
            tracing::debug!(target: "popover.panel", "tap ignored during transition");
        }
    }

    /// Handle one phase of a vertical pan.
    pub fn on_pan(&mut self, pan: &PanEvent) {
        match pan.phase {
            PanPhase::Began => self.pan_began(),
            PanPhase::Changed => self.pan_changed(pan.translation_y),
            PanPhase::Ended => self.pan_ended(pan.velocity_y),
        }
    }

    fn pan_began(&mut self) {
        let target = self.machine.current_state().opposite();
        let timing = self.machine.config().pan;
        self.machine.start_transition(target, timing);
        self.machine.pause_active();
    }

    fn pan_changed(&mut self, translation_y: f64) {
        if !self.machine.is_transitioning() {
            return;
        }
        let mut fraction = -translation_y / self.machine.config().closed_offset;
        if self.machine.current_state() == PanelState::Open {
            fraction = -fraction;
        }
        if self.machine.lead_is_reversed() {
            fraction = -fraction;
        }
        self.machine.scrub(fraction, false);
    }

    fn pan_ended(&mut self, velocity_y: f64) {
        if velocity_y == 0.0 {
            self.machine.resolve_and_finish(FinishDirection::KeepCurrent);
            return;
        }
        let should_close = velocity_y > self.machine.config().close_velocity_threshold;
        let direction = release_direction(self.machine.current_state(), should_close);
        tracing::debug!(
            target: "popover.panel",
            velocity_y,
            should_close,
            ?direction,
            "pan released"
        );
        self.machine.resolve_and_finish(direction);
    }
}

// ============================================================================
// Tests
// ============================================================================
