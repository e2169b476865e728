#![forbid(unsafe_code)]

//! Panel: the interruptible open/closed state machine for a bottom sheet.
//!
//! # Role in the popover workspace
//! `popover-panel` is the controller layer. It consumes the animator
//! capability and input events from `popover-core` and decides where the
//! panel logically is.
//!
//! # Primary responsibilities
//! - **PanelStateMachine**: single authority for the committed
//!   [`PanelState`] and for the one in-flight transition group.
//! - **GestureCoordinator**: maps taps and vertical pans onto state machine
//!   commands (start, pause, scrub, finish).
//! - **PanelVisual / VisualSink**: declarative visual state per resting
//!   state, applied by an external view.
//! - **PanelConfig**: tunables, loadable from TOML or JSON.
//!
//! # How it fits in the system
//! ```text
//! pointer samples ─▶ PanRecognizer ─▶ GestureCoordinator ─▶ PanelStateMachine
//!                                                             │        ▲
//!                                                   Animator::tick ── terminal position
//!                                                             ▼
//!                                                         VisualSink
//! ```

pub mod config;
pub mod coordinator;
pub mod machine;
pub mod state;
pub mod visual;

pub use config::{ConfigError, PanelConfig, TransitionTiming};
pub use coordinator::GestureCoordinator;
pub use machine::{FinishDirection, PanelStateMachine};
pub use state::PanelState;
pub use visual::{CornerMask, PanelVisual, RecordingSink, Rgba, Shadow, VisualSink};
