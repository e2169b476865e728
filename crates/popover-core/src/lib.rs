#![forbid(unsafe_code)]

//! Core: the animator capability and the touch input layer.
//!
//! # Role in the popover workspace
//! `popover-core` is the leaf crate. It defines what an interruptible
//! animation looks like to a controller and normalizes raw pointer samples
//! into tap and vertical pan gestures.
//!
//! # Primary responsibilities
//! - **Animator**: a pausable, reversible, scrubbable animation handle that
//!   reports its terminal position when it completes.
//! - **PropertyAnimator**: a time-driven reference implementation with spring
//!   timing derived from a damping ratio.
//! - **PanRecognizer**: pointer down/move/up sequences to [`gesture::TapEvent`]
//!   and [`gesture::PanEvent`] with velocity estimation.
//!
//! # How it fits in the system
//! `popover-panel` drives [`animation::Animator`] handles from its state
//! machine and consumes [`gesture::GestureEvent`] values in its coordinator.

pub mod animation;
pub mod gesture;
