#![forbid(unsafe_code)]

//! Declarative visual state for each resting state, and the sink that
//! applies it.
//!
//! The state machine never styles a view directly. It asks for the
//! [`PanelVisual`] of a target state and hands it to a [`VisualSink`]:
//!
//! - the **offset** is the only interpolated property; the machine pushes
//!   `offset_at(from, to, progress)` on every tick and scrub;
//! - **cosmetics** (corner radius, rounded corners, shadow) are applied once
//!   when a transition is defined, and again when it commits.
//!
//! # Invariants
//!
//! - `PanelVisual::open(cfg).offset == 0.0`
//! - `PanelVisual::closed(cfg).offset == cfg.closed_offset`
//! - The closed visual carries no shadow (opacity 0).

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::config::PanelConfig;
use crate::state::PanelState;

bitflags::bitflags! {
    /// Which corners of the panel are rounded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CornerMask: u8 {
        const NONE         = 0b0000;
        const TOP_LEFT     = 0b0001;
        const TOP_RIGHT    = 0b0010;
        const BOTTOM_LEFT  = 0b0100;
        const BOTTOM_RIGHT = 0b1000;
        const TOP          = Self::TOP_LEFT.bits() | Self::TOP_RIGHT.bits();
        const ALL          = Self::TOP.bits() | Self::BOTTOM_LEFT.bits() | Self::BOTTOM_RIGHT.bits();
    }
}

/// Straight (non-premultiplied) RGBA color, components in [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Opaque grey of the given white level.
    #[must_use]
    pub const fn grey(white: f32) -> Self {
        Self {
            r: white,
            g: white,
            b: white,
            a: 1.0,
        }
    }

    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
}

/// Drop shadow cast by the panel.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct Shadow {
    pub color: Rgba,
    /// (dx, dy) in points.
    pub offset: (f64, f64),
    /// Blur radius in points.
    pub radius: f64,
    /// Opacity in [0.0, 1.0].
    pub opacity: f64,
}

impl Shadow {
    /// No visible shadow.
    pub const NONE: Self = Self {
        color: Rgba::TRANSPARENT,
        offset: (0.0, 0.0),
        radius: 0.0,
        opacity: 0.0,
    };

    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

impl Default for Shadow {
    /// Soft grey shadow cast upward by one point.
    fn default() -> Self {
        Self {
            color: Rgba::grey(0.5),
            offset: (0.0, -1.0),
            radius: 3.0,
            opacity: 0.5,
        }
    }
}

/// Complete visual description of the panel at rest in one state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVisual {
    /// Distance below the fully revealed position (0 = open).
    pub offset: f64,
    pub corner_radius: f64,
    pub corners: CornerMask,
    pub shadow: Shadow,
}

impl PanelVisual {
    /// Revealed: rounded top corners, shadow on.
    #[must_use]
    pub fn open(config: &PanelConfig) -> Self {
        Self {
            offset: 0.0,
            corner_radius: config.open_corner_radius,
            corners: CornerMask::TOP,
            shadow: config.shadow,
        }
    }

    /// Tucked away: square corners, no shadow.
    #[must_use]
    pub fn closed(config: &PanelConfig) -> Self {
        Self {
            offset: config.closed_offset,
            corner_radius: 0.0,
            corners: CornerMask::TOP,
            shadow: Shadow::NONE,
        }
    }

    /// Visual for `state`.
    #[must_use]
    pub fn for_state(state: PanelState, config: &PanelConfig) -> Self {
        match state {
            PanelState::Open => Self::open(config),
            PanelState::Closed => Self::closed(config),
        }
    }

    /// Offset between `from` and `to` at animation progress `progress`.
    ///
    /// Progress is not clamped: spring curves may overshoot the end.
    #[must_use]
    pub fn offset_at(from: &Self, to: &Self, progress: f64) -> f64 {
        from.offset + (to.offset - from.offset) * progress
    }

    /// Push every property to the sink.
    pub fn apply<S: VisualSink + ?Sized>(&self, sink: &mut S) {
        sink.set_panel_offset(self.offset);
        self.apply_cosmetics(sink);
    }

    /// Push the non-interpolated properties to the sink.
    pub fn apply_cosmetics<S: VisualSink + ?Sized>(&self, sink: &mut S) {
        sink.set_corner_radius(self.corner_radius);
        sink.set_corners(self.corners);
        sink.set_shadow(self.shadow);
    }
}

/// The view collaborator: receives visual side effects.
pub trait VisualSink {
    fn set_panel_offset(&mut self, offset: f64);
    fn set_corner_radius(&mut self, radius: f64);
    fn set_corners(&mut self, corners: CornerMask);
    fn set_shadow(&mut self, shadow: Shadow);
}

impl<S: VisualSink + ?Sized> VisualSink for &mut S {
    fn set_panel_offset(&mut self, offset: f64) {
        (**self).set_panel_offset(offset);
    }

    fn set_corner_radius(&mut self, radius: f64) {
        (**self).set_corner_radius(radius);
    }

    fn set_corners(&mut self, corners: CornerMask) {
        (**self).set_corners(corners);
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        (**self).set_shadow(shadow);
    }
}

/// Headless sink that keeps the last value of every property.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSink {
    pub offset: f64,
    pub corner_radius: f64,
    pub corners: CornerMask,
    pub shadow: Shadow,
    /// Number of offset writes received.
    pub offset_writes: usize,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self {
            offset: 0.0,
            corner_radius: 0.0,
            corners: CornerMask::NONE,
            shadow: Shadow::NONE,
            offset_writes: 0,
        }
    }
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot as a visual record.
    #[must_use]
    pub fn visual(&self) -> PanelVisual {
        PanelVisual {
            offset: self.offset,
            corner_radius: self.corner_radius,
            corners: self.corners,
            shadow: self.shadow,
        }
    }
}

impl VisualSink for RecordingSink {
    fn set_panel_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.offset_writes += 1;
    }

    fn set_corner_radius(&mut self, radius: f64) {
        self.corner_radius = radius;
    }

    fn set_corners(&mut self, corners: CornerMask) {
        self.corners = corners;
    }

    fn set_shadow(&mut self, shadow: Shadow) {
        self.shadow = shadow;
    }
}
