#![forbid(unsafe_code)]

//! The panel state machine: single authority for where the panel is.
//!
//! [`PanelStateMachine`] owns the committed [`PanelState`] and at most one
//! in-flight transition group. Every transition, tap or drag, is built by the
//! same factory and funnels through the same completion contract.
//!
//! # State Machine
//!
//! ```text
//!            start_transition(target)
//!   Idle ───────────────────────────────▶ Transitioning(group)
//!    ▲                                        │  pause_active / scrub /
//!    │                                        │  resolve_and_finish / tick
//!    └──────── terminal position from tick ◀──┘
//! ```
//!
//! # Completion contract
//!
//! When a member animator reports its terminal position:
//!
//! | position  | committed state      |
//! |-----------|----------------------|
//! | `End`     | `target`             |
//! | `Start`   | `target.opposite()`  |
//! | `Current` | unchanged            |
//!
//! and then, in every case, the full visual of the committed state is
//! re-applied to the sink and the machine returns to `Idle`.
//!
//! # Invariants
//!
//! 1. `current_state` changes only inside the completion contract.
//! 2. A transition group, when present, is non-empty; starting while one is
//!    active is a no-op, so the group never grows past one member.
//! 3. `scrub()` leaves every member's `fraction_complete` in [0.0, 1.0].
//! 4. `resolve_and_finish()` never double-flips a member's direction.
//!
//! # Failure Modes
//!
//! - Commands other than `start_transition` while idle are no-ops.
//! - A `Current` terminal position commits nothing and is not logged.

use std::time::Duration;

use popover_core::animation::{AnimatingPosition, Animator, AnimatorFactory};

use crate::config::{PanelConfig, TransitionTiming};
use crate::state::PanelState;
use crate::visual::{PanelVisual, VisualSink};

/// Which way to send an interrupted transition when it is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishDirection {
    /// Keep the direction the animation already has.
    KeepCurrent,
    /// Finish at the transition's target state.
    TowardTarget,
    /// Run back to the state the transition started from.
    TowardOrigin,
}

impl FinishDirection {
    /// The `is_reversed` value this direction requires, if any.
    #[inline]
    #[must_use]
    pub fn reversed(self) -> Option<bool> {
        match self {
            Self::KeepCurrent => None,
            Self::TowardTarget => Some(false),
            Self::TowardOrigin => Some(true),
        }
    }
}

/// One animator in a transition group.
#[derive(Debug)]
struct TransitionMember<A> {
    animator: A,
    target: PanelState,
    /// `fraction_complete` captured by the last `pause_active()`.
    progress_at_pause: f64,
}

/// The in-flight animators. Non-empty by construction.
#[derive(Debug)]
struct TransitionGroup<A> {
    members: Vec<TransitionMember<A>>,
}

impl<A> TransitionGroup<A> {
    fn single(member: TransitionMember<A>) -> Self {
        Self {
            members: vec![member],
        }
    }

    fn lead(&self) -> &TransitionMember<A> {
        &self.members[0]
    }
}

/// Guard over "is a transition running".
#[derive(Debug)]
enum Activity<A> {
    Idle,
    Transitioning(TransitionGroup<A>),
}

/// Interruptible open/closed state machine for a popover panel.
pub struct PanelStateMachine<F: AnimatorFactory, S: VisualSink> {
    config: PanelConfig,
    factory: F,
    sink: S,
    current_state: PanelState,
    activity: Activity<F::Animator>,
}

impl<F, S> std::fmt::Debug for PanelStateMachine<F, S>
where
    F: AnimatorFactory,
    S: VisualSink,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelStateMachine")
            .field("current_state", &self.current_state)
            .field("transitioning", &self.is_transitioning())
            .field("group_len", &self.group_len())
            .finish_non_exhaustive()
    }
}

impl<F: AnimatorFactory, S: VisualSink> PanelStateMachine<F, S> {
    /// Create a closed, idle machine and lay the panel out closed.
    pub fn new(config: PanelConfig, factory: F, mut sink: S) -> Self {
        PanelVisual::closed(&config).apply(&mut sink);
        Self {
            config,
            factory,
            sink,
            current_state: PanelState::Closed,
            activity: Activity::Idle,
        }
    }

    /// Last committed state.
    #[inline]
    #[must_use]
    pub fn current_state(&self) -> PanelState {
        self.current_state
    }

    /// Whether a transition group is in flight.
    #[inline]
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        matches!(self.activity, Activity::Transitioning(_))
    }

    /// Number of animators in the active group (0 when idle).
    #[must_use]
    pub fn group_len(&self) -> usize {
        match &self.activity {
            Activity::Idle => 0,
            Activity::Transitioning(group) => group.members.len(),
        }
    }

    /// Target of the active transition.
    #[must_use]
    pub fn target(&self) -> Option<PanelState> {
        self.group().map(|g| g.lead().target)
    }

    /// Whether the lead animator currently runs back toward the origin.
    /// `false` when idle.
    #[must_use]
    pub fn lead_is_reversed(&self) -> bool {
        self.group().is_some_and(|g| g.lead().animator.is_reversed())
    }

    /// `fraction_complete` of the lead animator.
    #[must_use]
    pub fn lead_fraction(&self) -> Option<f64> {
        self.group().map(|g| g.lead().animator.fraction_complete())
    }

    /// Lead animator, for inspection.
    #[must_use]
    pub fn lead_animator(&self) -> Option<&F::Animator> {
        self.group().map(|g| &g.lead().animator)
    }

    /// Tunables this machine was built with.
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// The view receiving visual updates.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the view.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn group(&self) -> Option<&TransitionGroup<F::Animator>> {
        match &self.activity {
            Activity::Idle => None,
            Activity::Transitioning(group) => Some(group),
        }
    }

    fn group_mut(&mut self) -> Option<&mut TransitionGroup<F::Animator>> {
        match &mut self.activity {
            Activity::Idle => None,
            Activity::Transitioning(group) => Some(group),
        }
    }

    /// Build, style and start one animator toward `target`.
    fn build_transition(
        &mut self,
        target: PanelState,
        timing: TransitionTiming,
    ) -> TransitionMember<F::Animator> {
        let mut animator = self
            .factory
            .build(timing.duration(), timing.damping_ratio);
        PanelVisual::for_state(target, &self.config).apply_cosmetics(&mut self.sink);
        animator.start();
        TransitionMember {
            animator,
            target,
            progress_at_pause: 0.0,
        }
    }

    /// Start a transition toward `target` unless one is already in flight.
    ///
    /// Returns `true` if a new group was created.
    pub fn start_transition(&mut self, target: PanelState, timing: TransitionTiming) -> bool {
        if self.is_transitioning() {
            tracing::trace!(
                target: "popover.panel",
                requested = %target,
                "transition already in flight, reusing"
            );
            return false;
        }
        let member = self.build_transition(target, timing);
        self.activity = Activity::Transitioning(TransitionGroup::single(member));
        tracing::debug!(
            target: "popover.panel",
            from = %self.current_state,
            to = %target,
            duration_secs = timing.duration_secs,
            damping_ratio = timing.damping_ratio,
            "transition started"
        );
        true
    }

    /// Pause every member and snapshot its progress. No-op when idle.
    pub fn pause_active(&mut self) {
        let Some(group) = self.group_mut() else {
            return;
        };
        for member in &mut group.members {
            member.animator.pause();
            member.progress_at_pause = member.animator.fraction_complete();
        }
        tracing::trace!(
            target: "popover.panel",
            progress = group.lead().progress_at_pause,
            "transition paused"
        );
    }

    /// Move every member to `raw_fraction` (negated when `invert`) past its
    /// paused progress, clamped to [0, 1].
    ///
    /// Returns `false` (and does nothing) when idle.
    pub fn scrub(&mut self, raw_fraction: f64, invert: bool) -> bool {
        let Activity::Transitioning(group) = &mut self.activity else {
            return false;
        };
        let delta = if invert { -raw_fraction } else { raw_fraction };
        for member in &mut group.members {
            let fraction = (delta + member.progress_at_pause).clamp(0.0, 1.0);
            member.animator.set_fraction_complete(fraction);
        }
        tracing::trace!(
            target: "popover.panel",
            raw_fraction,
            fraction = group.lead().animator.fraction_complete(),
            "scrub"
        );
        drive_sink(group, &self.config, &mut self.sink);
        true
    }

    /// Point every member in `direction` (flipping only members that
    /// disagree) and let them run to completion at original speed.
    pub fn resolve_and_finish(&mut self, direction: FinishDirection) {
        let Some(group) = self.group_mut() else {
            return;
        };
        for member in &mut group.members {
            if let Some(reversed) = direction.reversed()
                && member.animator.is_reversed() != reversed
            {
                member.animator.set_reversed(reversed);
            }
            member.animator.continue_animation(0.0);
        }
        tracing::debug!(
            target: "popover.panel",
            ?direction,
            reversed = group.lead().animator.is_reversed(),
            "transition released"
        );
    }

    /// Advance the in-flight transition by `dt` and drive the sink.
    ///
    /// Returns the committed state if the transition completed on this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<PanelState> {
        let Activity::Transitioning(group) = &mut self.activity else {
            return None;
        };
        let mut finished = None;
        for member in &mut group.members {
            if let Some(position) = member.animator.tick(dt) {
                finished.get_or_insert((member.target, position));
            }
        }
        match finished {
            Some((target, position)) => Some(self.complete(target, position)),
            None => {
                drive_sink(group, &self.config, &mut self.sink);
                None
            }
        }
    }

    /// The completion contract.
    fn complete(&mut self, target: PanelState, position: AnimatingPosition) -> PanelState {
        let committed = match position {
            AnimatingPosition::End => Some(target),
            AnimatingPosition::Start => Some(target.opposite()),
            AnimatingPosition::Current => None,
        };
        if let Some(state) = committed {
            tracing::debug!(
                target: "popover.panel",
                state = %state,
                ?position,
                "state committed"
            );
            self.current_state = state;
        }
        PanelVisual::for_state(self.current_state, &self.config).apply(&mut self.sink);
        self.activity = Activity::Idle;
        self.current_state
    }
}

/// Push each member's interpolated offset to the sink.
fn drive_sink<A: Animator, S: VisualSink>(
    group: &TransitionGroup<A>,
    config: &PanelConfig,
    sink: &mut S,
) {
    for member in &group.members {
        let from = PanelVisual::for_state(member.target.opposite(), config);
        let to = PanelVisual::for_state(member.target, config);
        sink.set_panel_offset(PanelVisual::offset_at(&from, &to, member.animator.value()));
    }
}

// ============================================================================
// Tests
// ============================================================================
