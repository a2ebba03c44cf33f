//! Captured visual appearance, expressed in a container's coordinate space.

use segue_core::{Color, ElementId, Rect, Stage};

use crate::animation::interpolate::Interpolate;

/// The animatable appearance of one element at a point in time: frame in
/// the capture container's coordinate space plus the visual properties a
/// stand-in reproduces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Appearance {
    pub frame: Rect,
    pub opacity: f32,
    pub corner_radius: f32,
    pub background: Color,
}

impl Appearance {
    /// Capture `element`'s current appearance in `container`'s coordinate
    /// space. `None` if either is off the stage.
    pub fn capture(stage: &Stage, element: ElementId, container: ElementId) -> Option<Self> {
        let frame = stage.frame_in(element, container)?;
        let el = stage.get(element)?;
        Some(Self {
            frame,
            opacity: el.opacity,
            corner_radius: el.corner_radius,
            background: el.background,
        })
    }

    /// Apply this appearance (captured in `container` space) to `target`,
    /// converting the frame into `target`'s parent space.
    pub fn apply(&self, stage: &mut Stage, container: ElementId, target: ElementId) {
        let frame = match stage.parent(target) {
            Some(parent) => stage
                .convert_rect(self.frame, container, parent)
                .unwrap_or(self.frame),
            None => stage
                .absolute_frame(container)
                .map(|c| self.frame.translated(c.x, c.y))
                .unwrap_or(self.frame),
        };
        if let Some(el) = stage.get_mut(target) {
            el.frame = frame;
            el.opacity = self.opacity;
            el.corner_radius = self.corner_radius;
            el.background = self.background;
        }
    }
}

impl Interpolate for Appearance {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            frame: self.frame.interpolate(&to.frame, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
            corner_radius: self.corner_radius.interpolate(&to.corner_radius, t),
            background: self.background.interpolate(&to.background, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::Element;

    #[test]
    fn test_capture_in_container_space() {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(100.0, 100.0, 400.0, 400.0)));
        let scene = stage.insert(Element::new(Rect::new(100.0, 100.0, 400.0, 400.0)));
        let el = stage.insert_child(
            scene,
            Element::new(Rect::new(20.0, 30.0, 50.0, 50.0))
                .with_opacity(0.8)
                .with_corner_radius(4.0),
        );

        let appearance = Appearance::capture(&stage, el, container).unwrap();
        assert_eq!(appearance.frame, Rect::new(20.0, 30.0, 50.0, 50.0));
        assert_eq!(appearance.opacity, 0.8);
        assert_eq!(appearance.corner_radius, 4.0);
    }

    #[test]
    fn test_apply_converts_into_target_parent_space() {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 400.0)));
        // target lives under a parent offset from the container
        let parent = stage.insert(Element::new(Rect::new(50.0, 50.0, 200.0, 200.0)));
        let target = stage.insert_child(parent, Element::new(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let appearance = Appearance {
            frame: Rect::new(100.0, 100.0, 40.0, 40.0),
            opacity: 0.5,
            corner_radius: 2.0,
            background: Color::WHITE,
        };
        appearance.apply(&mut stage, container, target);

        // (100,100) in container space is (50,50) in the parent's space
        let el = stage.get(target).unwrap();
        assert_eq!(el.frame, Rect::new(50.0, 50.0, 40.0, 40.0));
        assert_eq!(el.opacity, 0.5);
    }

    #[test]
    fn test_round_trip_through_mirror_interpolation() {
        let a = Appearance {
            frame: Rect::new(0.0, 0.0, 100.0, 100.0),
            opacity: 1.0,
            corner_radius: 0.0,
            background: Color::rgb(1.0, 0.0, 0.0),
        };
        let b = Appearance {
            frame: Rect::new(200.0, 50.0, 40.0, 40.0),
            opacity: 0.3,
            corner_radius: 12.0,
            background: Color::rgb(0.0, 0.0, 1.0),
        };

        let forward = a.interpolate(&b, 1.0);
        let back = forward.interpolate(&a, 1.0);
        assert_eq!(back, a);
    }
}
