//! Visual elements: the unit the stage arranges and the engine animates.

use crate::color::Color;
use crate::geometry::{Rect, Size};

/// Stable handle to an element living on a [`Stage`](crate::Stage).
///
/// Ids are issued by the stage at insertion and never reused within one
/// stage's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// What an element shows inside its frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementContent {
    /// A flat fill drawn with the element's background color.
    Fill,
    /// A static, image-backed capture of another element's rendered
    /// appearance. Produced by [`Stage::snapshot`](crate::Stage::snapshot);
    /// never re-renders when the captured element later changes.
    Snapshot(SnapshotContent),
}

/// Payload of a snapshot capture.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotContent {
    /// The element the capture was taken from.
    pub captured_from: ElementId,
    /// Rendered background at capture time.
    pub background: Color,
    /// Content extent at capture time.
    pub content_size: Size,
}

/// One visual element: a frame within its parent plus the properties a
/// transition reads and mutates. Hierarchy lives on the stage, not here, so
/// an element stays a plain value (snapshot capture returns one).
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Position and extent, relative to the parent's coordinate space
    /// (stage space for roots).
    pub frame: Rect,
    /// 0 = fully transparent, 1 = opaque.
    pub opacity: f32,
    pub corner_radius: f32,
    /// Whether children and content are clipped to the rounded frame.
    pub clips_content: bool,
    pub background: Color,
    /// Hidden elements keep their place in the hierarchy but do not render.
    pub hidden: bool,
    pub content: ElementContent,
}

impl Element {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame,
            opacity: 1.0,
            corner_radius: 0.0,
            clips_content: false,
            background: Color::TRANSPARENT,
            hidden: false,
            content: ElementContent::Fill,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Whether this element currently has renderable area.
    pub fn is_renderable(&self) -> bool {
        !self.frame.is_empty()
    }
}
