#![forbid(unsafe_code)]

//! Panel configuration as data.
//!
//! Captures every tunable of the panel controller in a single
//! [`PanelConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # popover.toml
//! closed_offset = 440.0
//! close_velocity_threshold = 60.0
//!
//! [tap]
//! duration_secs = 0.5
//! damping_ratio = 0.9
//!
//! [pan]
//! duration_secs = 1.0
//! damping_ratio = 1.0
//! ```
//!
//! ```rust,ignore
//! let config = PanelConfig::from_toml_file("popover.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! Every field has a default, so a partial file only overrides what it
//! names and `PanelConfig::default()` is a complete, valid configuration.
//! A partial `[tap]` or `[pan]` table fills its missing fields from that
//! table's own defaults, not from each other.

#[cfg(feature = "config")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::visual::Shadow;

// ---------------------------------------------------------------------------
// Top-level PanelConfig
// ---------------------------------------------------------------------------

/// Tunables for the panel state machine and its gesture coordinator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    /// Offset of the fully closed panel below its open position. Default: 440.
    pub closed_offset: f64,

    /// Downward release velocity (points/s) above which a drag closes the
    /// panel. Default: 60.
    pub close_velocity_threshold: f64,

    /// Timing for tap-initiated transitions.
    #[cfg_attr(feature = "config", serde(deserialize_with = "timing_serde::tap"))]
    pub tap: TransitionTiming,

    /// Timing for drag-initiated transitions.
    #[cfg_attr(feature = "config", serde(deserialize_with = "timing_serde::pan"))]
    pub pan: TransitionTiming,

    /// Corner radius of the open panel. Default: 16.
    pub open_corner_radius: f64,

    /// Shadow of the open panel.
    pub shadow: Shadow,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            closed_offset: 440.0,
            close_velocity_threshold: 60.0,
            tap: TransitionTiming::tap(),
            pan: TransitionTiming::pan(),
            open_corner_radius: 16.0,
            shadow: Shadow::default(),
        }
    }
}

impl PanelConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !(self.closed_offset.is_finite() && self.closed_offset > 0.0) {
            errors.push(format!(
                "closed_offset must be finite and > 0, got {}",
                self.closed_offset
            ));
        }

        if !(self.close_velocity_threshold.is_finite() && self.close_velocity_threshold >= 0.0) {
            errors.push(format!(
                "close_velocity_threshold must be finite and >= 0, got {}",
                self.close_velocity_threshold
            ));
        }

        self.tap.validate_into("tap", &mut errors);
        self.pan.validate_into("pan", &mut errors);

        if !(self.open_corner_radius.is_finite() && self.open_corner_radius >= 0.0) {
            errors.push(format!(
                "open_corner_radius must be >= 0, got {}",
                self.open_corner_radius
            ));
        }

        if !(0.0..=1.0).contains(&self.shadow.opacity) {
            errors.push(format!(
                "shadow.opacity must be in [0, 1], got {}",
                self.shadow.opacity
            ));
        }
        if !(self.shadow.radius.is_finite() && self.shadow.radius >= 0.0) {
            errors.push(format!("shadow.radius must be >= 0, got {}", self.shadow.radius));
        }

        errors
    }

    /// Consume the config, returning it if valid.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// TransitionTiming
// ---------------------------------------------------------------------------

/// Duration and spring damping of one kind of transition.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TransitionTiming {
    /// Full open ↔ closed run time in seconds.
    pub duration_secs: f64,
    /// Spring damping ratio (1.0 = critically damped).
    pub damping_ratio: f64,
}

impl TransitionTiming {
    #[must_use]
    pub const fn new(duration_secs: f64, damping_ratio: f64) -> Self {
        Self {
            duration_secs,
            damping_ratio,
        }
    }

    /// Tap default: 0.5s, slight bounce.
    #[must_use]
    pub const fn tap() -> Self {
        Self::new(0.5, 0.9)
    }

    /// Drag default: 1s, no bounce.
    #[must_use]
    pub const fn pan() -> Self {
        Self::new(1.0, 1.0)
    }

    /// Duration as a [`Duration`]; invalid values map to zero.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }

    fn validate_into(&self, name: &str, errors: &mut Vec<String>) {
        if !(self.duration_secs.is_finite() && self.duration_secs > 0.0) {
            errors.push(format!(
                "{name}.duration_secs must be finite and > 0, got {}",
                self.duration_secs
            ));
        }
        if !(self.damping_ratio.is_finite() && self.damping_ratio > 0.0) {
            errors.push(format!(
                "{name}.damping_ratio must be finite and > 0, got {}",
                self.damping_ratio
            ));
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::pan()
    }
}

/// Partial `[tap]` / `[pan]` tables, filled from that table's own defaults.
#[cfg(feature = "config")]
mod timing_serde {
    use serde::{Deserialize, Deserializer};

    use super::TransitionTiming;

    #[derive(Deserialize)]
    struct PartialTiming {
        duration_secs: Option<f64>,
        damping_ratio: Option<f64>,
    }

    fn merged<'de, D>(deserializer: D, base: TransitionTiming) -> Result<TransitionTiming, D::Error>
    where
        D: Deserializer<'de>,
    {
        let partial = PartialTiming::deserialize(deserializer)?;
        Ok(TransitionTiming {
            duration_secs: partial.duration_secs.unwrap_or(base.duration_secs),
            damping_ratio: partial.damping_ratio.unwrap_or(base.damping_ratio),
        })
    }

    pub(super) fn tap<'de, D>(deserializer: D) -> Result<TransitionTiming, D::Error>
    where
        D: Deserializer<'de>,
    {
        merged(deserializer, TransitionTiming::tap())
    }

    pub(super) fn pan<'de, D>(deserializer: D) -> Result<TransitionTiming, D::Error>
    where
        D: Deserializer<'de>,
    {
        merged(deserializer, TransitionTiming::pan())
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a panel configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
