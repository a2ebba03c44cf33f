//! 2D geometry primitives used throughout the stage and the engine.

/// A point in 2D space, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

impl Size {
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// A size with no renderable area (zero or negative on either axis).
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

/// An axis-aligned rectangle: origin plus extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.size().is_empty()
    }

    /// The same rectangle moved by (dx, dy).
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// The same extent at a different origin.
    pub fn with_origin(&self, origin: Point) -> Self {
        Self::new(origin.x, origin.y, self.w, self.h)
    }

    /// The rectangle scaled by `factor` about its own center.
    pub fn scaled_about_center(&self, factor: f32) -> Self {
        let c = self.center();
        let w = self.w * factor;
        let h = self.h * factor;
        Self::new(c.x - w / 2.0, c.y - h / 2.0, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_and_translate() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        assert_eq!(r.center(), Point::new(30.0, 50.0));
        assert_eq!(r.translated(5.0, -5.0), Rect::new(15.0, 15.0, 40.0, 60.0));
    }

    #[test]
    fn test_empty() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_empty());
    }

    #[test]
    fn test_scaled_about_center() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let s = r.scaled_about_center(2.0);
        assert_eq!(s, Rect::new(-50.0, -25.0, 200.0, 100.0));
        assert_eq!(s.center(), r.center());
    }
}
