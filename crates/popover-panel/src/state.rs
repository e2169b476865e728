#![forbid(unsafe_code)]

//! The two resting states of the panel.

use std::fmt;

/// Logical resting state of the panel.
///
/// Intentionally a 2-state system: in-between positions are a property of
/// the running animation, never of the committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    /// Fully revealed (offset 0).
    Open,
    /// Tucked away below the bottom edge.
    #[default]
    Closed,
}

impl PanelState {
    /// The other state.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Open => Self::Closed,
            Self::Closed => Self::Open,
        }
    }

    /// Whether this is [`PanelState::Open`].
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}
