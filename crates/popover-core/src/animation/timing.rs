#![forbid(unsafe_code)]

//! Spring timing curve parameterized by a damping ratio.
//!
//! Maps a linear time fraction `t` in [0.0, 1.0] to animation progress using
//! the step response of a damped harmonic oscillator:
//!
//!   x'' + 2ζω·x' + ω²·(x - 1) = 0,  x(0) = 0, x'(0) = 0
//!
//! # Parameters
//!
//! - **damping_ratio** (ζ): how quickly oscillation dies out.
//!   - Underdamped (ζ < 1): overshoots the end before settling
//!   - Critically damped (ζ = 1): fastest convergence without overshoot
//!   - Overdamped (ζ > 1): slow convergence, no overshoot
//!
//! The natural frequency ω is not a free parameter: it is derived from ζ so
//! that the response has settled to within 0.1% of the end at `t = 1`. The
//! animation duration alone therefore controls speed.
//!
//! # Invariants
//!
//! 1. `progress(0.0) == 0.0` and `progress(1.0) == 1.0` exactly.
//! 2. Inputs outside [0.0, 1.0] are clamped.
//! 3. For ζ ≥ 1 the curve is monotonically non-decreasing.
//! 4. The damping ratio is clamped to [`MIN_DAMPING_RATIO`, `MAX_DAMPING_RATIO`].
//!
//! # Failure Modes
//!
//! - Non-finite damping ratio: treated as critical damping.
//! - Very large ratios: evaluated in two-exponential form so the result
//!   stays finite.

/// Smallest damping ratio accepted. Lower values would oscillate visibly
/// for the whole duration.
pub const MIN_DAMPING_RATIO: f64 = 0.05;

/// Largest damping ratio accepted.
pub const MAX_DAMPING_RATIO: f64 = 10.0;

/// ln(1000): envelope decay needed to reach 0.1% at `t = 1`.
const SETTLE_DECAY: f64 = 6.907_755_278_982_137;

/// ω for critical damping such that `(1 + ω)e^{-ω} ≈ 0.001`.
const CRITICAL_OMEGA: f64 = 9.233;

/// Ratios closer than this to 1.0 use the critically damped form.
const CRITICAL_EPSILON: f64 = 1e-6;

/// A spring-shaped timing curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringTiming {
    damping_ratio: f64,
    omega: f64,
}

impl SpringTiming {
    /// Create a timing curve for the given damping ratio.
    #[must_use]
    pub fn new(damping_ratio: f64) -> Self {
        let zeta = if damping_ratio.is_finite() {
            damping_ratio.clamp(MIN_DAMPING_RATIO, MAX_DAMPING_RATIO)
        } else {
            1.0
        };
        let omega = if zeta < 1.0 - CRITICAL_EPSILON {
            SETTLE_DECAY / zeta
        } else if zeta > 1.0 + CRITICAL_EPSILON {
            // Scale by the slow pole so overdamped curves settle in time.
            CRITICAL_OMEGA / (zeta - (zeta * zeta - 1.0).sqrt())
        } else {
            CRITICAL_OMEGA
        };
        Self {
            damping_ratio: zeta,
            omega,
        }
    }

    /// Critically damped: no overshoot.
    #[must_use]
    pub fn critical() -> Self {
        Self::new(1.0)
    }

    /// Lightly underdamped, barely visible settle.
    #[must_use]
    pub fn smooth() -> Self {
        Self::new(0.9)
    }

    /// Visible bounce past the end.
    #[must_use]
    pub fn bouncy() -> Self {
        Self::new(0.5)
    }

    /// Effective (clamped) damping ratio.
    #[inline]
    #[must_use]
    pub fn damping_ratio(&self) -> f64 {
        self.damping_ratio
    }

    /// Whether this curve can exceed 1.0 before settling.
    #[inline]
    #[must_use]
    pub fn can_overshoot(&self) -> bool {
        self.damping_ratio < 1.0 - CRITICAL_EPSILON
    }

    /// Progress at linear time fraction `t`.
    #[must_use]
    pub fn progress(&self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        let zeta = self.damping_ratio;
        let w = self.omega;

        if zeta < 1.0 - CRITICAL_EPSILON {
            let root = (1.0 - zeta * zeta).sqrt();
            let wd = w * root;
            let envelope = (-zeta * w * t).exp();
            1.0 - envelope * ((wd * t).cos() + (zeta / root) * (wd * t).sin())
        } else if zeta > 1.0 + CRITICAL_EPSILON {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -w * (zeta - root);
            let r2 = -w * (zeta + root);
            1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
        } else {
            1.0 - (1.0 + w * t) * (-w * t).exp()
        }
    }
}

impl Default for SpringTiming {
    fn default() -> Self {
        Self::critical()
    }
}
