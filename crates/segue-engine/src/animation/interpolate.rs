//! Interpolation between animatable values.
//!
//! `t` is not clamped: spring timing overshoots past 1.0, and the lerp
//! extrapolates naturally.

use segue_core::{Color, Point, Rect};

/// Types that can blend between two values.
pub trait Interpolate: Sized {
    /// Value between `self` (t = 0) and `to` (t = 1).
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        self + (to - self) * t as f64
    }
}

impl Interpolate for Point {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Point::new(lerp(self.x, to.x, t), lerp(self.y, to.y, t))
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Rect::new(
            lerp(self.x, to.x, t),
            lerp(self.y, to.y, t),
            lerp(self.w, to.w, t),
            lerp(self.h, to.h, t),
        )
    }
}

impl Interpolate for Color {
    /// Per-component blend. Color management is the renderer's concern;
    /// the engine blends whatever space the host stores.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Color::rgba(
            lerp(self.r, to.r, t),
            lerp(self.g, to.g, t),
            lerp(self.b, to.b, t),
            lerp(self.a, to.a, t),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(50.0, 50.0, 200.0, 10.0);
        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
    }

    #[test]
    fn test_midpoint() {
        let mid = 0.0f32.interpolate(&10.0, 0.5);
        assert!((mid - 5.0).abs() < 1e-6);

        let c = Color::rgba(0.0, 0.0, 0.0, 0.0).interpolate(&Color::rgba(1.0, 1.0, 1.0, 1.0), 0.5);
        assert!((c.r - 0.5).abs() < 1e-6);
        assert!((c.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_overshoot_extrapolates() {
        let v = 0.0f32.interpolate(&10.0, 1.2);
        assert!((v - 12.0).abs() < 1e-5);
    }
}
