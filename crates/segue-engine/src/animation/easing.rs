//! Cubic timing curves.
//!
//! Maps linear progress (0..1) through a bezier-shaped curve. The named
//! variants match the standard platform curves; `CubicBezier` takes custom
//! control points.

use serde::{Deserialize, Serialize};

/// Shape of a cubic timing curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimingCurve {
    /// No easing.
    Linear,

    /// Slow start, accelerating. `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// Fast start, decelerating. `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// Slow start and end. `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom control points (x1, y1) and (x2, y2). x values must be in
    /// [0, 1]; y values may overshoot.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for TimingCurve {
    fn default() -> Self {
        Self::EaseInOut
    }
}

impl TimingCurve {
    /// Create a custom cubic bezier curve.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Eased progress for linear progress `t` (clamped to [0, 1]).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Linear => t,
            Self::EaseIn => bezier_progress(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier_progress(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier_progress(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier_progress(x1, y1, x2, y2, t),
        }
    }
}

/// Evaluate one axis of the bezier at parameter `u`.
/// p(u) = 3(1-u)²u·c1 + 3(1-u)u²·c2 + u³
#[inline]
fn bezier_axis(c1: f32, c2: f32, u: f32) -> f32 {
    let v = 1.0 - u;
    3.0 * v * v * u * c1 + 3.0 * v * u * u * c2 + u * u * u
}

/// d/du of `bezier_axis`.
#[inline]
fn bezier_axis_derivative(c1: f32, c2: f32, u: f32) -> f32 {
    let v = 1.0 - u;
    3.0 * v * v * c1 + 6.0 * v * u * (c2 - c1) + 3.0 * u * u * (1.0 - c2)
}

/// Map linear progress through the curve: solve x(u) = t for u by
/// Newton-Raphson, then evaluate y(u).
fn bezier_progress(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let mut u = t;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, u) - t;
        if err.abs() < 1e-6 {
            break;
        }
        let slope = bezier_axis_derivative(x1, x2, u);
        if slope.abs() < 1e-6 {
            break;
        }
        u = (u - err / slope).clamp(0.0, 1.0);
    }

    bezier_axis(y1, y2, u)
}
