//! The stage: an id-keyed arena of elements with hierarchy and layout.
//!
//! The stage stands in for the host platform's view layer. It resolves
//! absolute frames, converts rectangles between element coordinate spaces,
//! queues deferred frame changes behind an explicit layout pass, and captures
//! snapshots. It has no notion of drawing.
//!
//! Coordinate model: an element's `frame` is expressed in its parent's
//! coordinate space (stage space for roots). An element's own coordinate
//! space has its origin at the element's absolute origin.

use std::collections::HashMap;

use thiserror::Error;

use crate::element::{Element, ElementContent, ElementId, SnapshotContent};
use crate::geometry::{Point, Rect, Size};

/// Why a snapshot could not be captured.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    #[error("element {0:?} is not on the stage")]
    Missing(ElementId),
    #[error("element {0:?} has no renderable area ({1:?})")]
    Unrenderable(ElementId, Size),
}

#[derive(Debug)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Arena of visual elements.
#[derive(Debug, Default)]
pub struct Stage {
    nodes: HashMap<ElementId, Node>,
    roots: Vec<ElementId>,
    next_id: u64,
    /// Frame changes queued for the next layout pass.
    pending_frames: HashMap<ElementId, Rect>,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    /// Add an element at the stage root. Returns its handle.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = self.allocate_id();
        self.nodes.insert(
            id,
            Node {
                element,
                parent: None,
                children: Vec::new(),
            },
        );
        self.roots.push(id);
        id
    }

    /// Add an element as the last child of `parent`.
    ///
    /// Falls back to inserting at the root if `parent` is not on the stage.
    pub fn insert_child(&mut self, parent: ElementId, element: Element) -> ElementId {
        let id = self.insert(element);
        self.add_child(parent, id);
        id
    }

    /// Reparent `child` under `parent`, appending it as the last child.
    ///
    /// A request that would create a cycle (parenting an element under its
    /// own descendant) is ignored with a warning.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) {
        if !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!("refusing to parent {child:?} under its own descendant {parent:?}");
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    /// True if `ancestor` appears on `id`'s parent chain.
    fn is_ancestor(&self, ancestor: ElementId, id: ElementId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if let Some(p) = self.nodes.get_mut(&parent) {
                p.children.retain(|c| *c != id);
            }
        } else {
            self.roots.retain(|r| *r != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
    }

    /// Remove an element and its entire subtree. Returns the removed
    /// element, or `None` if it was not on the stage.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        self.detach(id);
        let node = self.nodes.remove(&id)?;
        self.pending_frames.remove(&id);
        for child in &node.children {
            self.remove_subtree(*child);
        }
        Some(node.element)
    }

    fn remove_subtree(&mut self, id: ElementId) {
        if let Some(node) = self.nodes.remove(&id) {
            self.pending_frames.remove(&id);
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.nodes.get_mut(&id).map(|n| &mut n.element)
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn element_count(&self) -> usize {
        self.nodes.len()
    }

    // ========================================================================
    // Coordinate resolution
    // ========================================================================

    /// The element's frame in stage coordinates.
    pub fn absolute_frame(&self, id: ElementId) -> Option<Rect> {
        let node = self.nodes.get(&id)?;
        let mut frame = node.element.frame;
        let mut current = node.parent;
        while let Some(pid) = current {
            let parent = self.nodes.get(&pid)?;
            frame = frame.translated(parent.element.frame.x, parent.element.frame.y);
            current = parent.parent;
        }
        Some(frame)
    }

    /// The absolute origin of the coordinate space `id` defines for its
    /// children.
    fn absolute_origin(&self, id: ElementId) -> Option<Point> {
        self.absolute_frame(id).map(|f| f.origin())
    }

    /// Express `rect`, given in `from`'s coordinate space, in `to`'s space.
    pub fn convert_rect(&self, rect: Rect, from: ElementId, to: ElementId) -> Option<Rect> {
        let from_origin = self.absolute_origin(from)?;
        let to_origin = self.absolute_origin(to)?;
        Some(rect.translated(from_origin.x - to_origin.x, from_origin.y - to_origin.y))
    }

    /// The element's frame expressed in `space`'s coordinate space.
    pub fn frame_in(&self, id: ElementId, space: ElementId) -> Option<Rect> {
        let absolute = self.absolute_frame(id)?;
        let origin = self.absolute_origin(space)?;
        Some(absolute.translated(-origin.x, -origin.y))
    }

    // ========================================================================
    // Deferred layout
    // ========================================================================

    /// Queue a frame change to be applied by the next layout pass.
    pub fn request_frame(&mut self, id: ElementId, frame: Rect) {
        if self.nodes.contains_key(&id) {
            self.pending_frames.insert(id, frame);
        }
    }

    pub fn needs_layout(&self) -> bool {
        !self.pending_frames.is_empty()
    }

    /// Apply every queued frame change.
    pub fn layout(&mut self) {
        let pending = std::mem::take(&mut self.pending_frames);
        for (id, frame) in pending {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.element.frame = frame;
            }
        }
    }

    /// Apply queued frame changes for `id` and its subtree only.
    pub fn layout_element(&mut self, id: ElementId) {
        if let Some(frame) = self.pending_frames.remove(&id) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.element.frame = frame;
            }
        }
        let children: Vec<ElementId> = self.children(id).to_vec();
        for child in children {
            self.layout_element(child);
        }
    }

    // ========================================================================
    // Snapshot capture
    // ========================================================================

    /// Capture the element's current rendered appearance as a static,
    /// image-backed element.
    ///
    /// When `after_layout` is true, queued frame changes for the element's
    /// subtree are applied before capturing, so the capture observes final
    /// geometry rather than whatever was last committed.
    ///
    /// The capture is taken with the element's corner rounding removed so
    /// the rounding is not baked into the flat capture; the same radius is
    /// then applied to both the element and the capture, which clips.
    pub fn snapshot(&mut self, id: ElementId, after_layout: bool) -> Result<Element, SnapshotError> {
        if after_layout {
            self.layout_element(id);
        }
        let node = self.nodes.get_mut(&id).ok_or(SnapshotError::Missing(id))?;
        if !node.element.is_renderable() {
            return Err(SnapshotError::Unrenderable(id, node.element.frame.size()));
        }

        let radius = node.element.corner_radius;
        node.element.corner_radius = 0.0;

        let size = node.element.frame.size();
        let mut capture = Element::new(Rect::new(0.0, 0.0, size.w, size.h));
        capture.background = node.element.background;
        capture.opacity = node.element.opacity;
        capture.content = ElementContent::Snapshot(SnapshotContent {
            captured_from: id,
            background: node.element.background,
            content_size: size,
        });

        node.element.corner_radius = radius;
        capture.corner_radius = radius;
        capture.clips_content = true;

        Ok(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn element(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::new(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_hierarchy_and_absolute_frames() {
        let mut stage = Stage::new();
        let root = stage.insert(element(100.0, 50.0, 500.0, 500.0));
        let child = stage.insert_child(root, element(10.0, 20.0, 100.0, 100.0));
        let grandchild = stage.insert_child(child, element(5.0, 5.0, 10.0, 10.0));

        assert_eq!(stage.parent(child), Some(root));
        assert_eq!(stage.children(root), &[child]);
        assert_eq!(
            stage.absolute_frame(grandchild),
            Some(Rect::new(115.0, 75.0, 10.0, 10.0))
        );
    }

    #[test]
    fn test_frame_conversion() {
        let mut stage = Stage::new();
        let a = stage.insert(element(100.0, 100.0, 200.0, 200.0));
        let b = stage.insert(element(50.0, 0.0, 200.0, 200.0));
        let child = stage.insert_child(a, element(10.0, 10.0, 20.0, 20.0));

        // child sits at (110, 110) absolute, so at (60, 110) in b's space
        assert_eq!(
            stage.frame_in(child, b),
            Some(Rect::new(60.0, 110.0, 20.0, 20.0))
        );

        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            stage.convert_rect(rect, a, b),
            Some(Rect::new(50.0, 100.0, 10.0, 10.0))
        );
    }

    #[test]
    fn test_reparent_moves_child() {
        let mut stage = Stage::new();
        let a = stage.insert(element(0.0, 0.0, 100.0, 100.0));
        let b = stage.insert(element(0.0, 0.0, 100.0, 100.0));
        let child = stage.insert_child(a, element(0.0, 0.0, 10.0, 10.0));

        stage.add_child(b, child);
        assert!(stage.children(a).is_empty());
        assert_eq!(stage.children(b), &[child]);
        assert_eq!(stage.parent(child), Some(b));
    }

    #[test]
    fn test_cycle_refused() {
        let mut stage = Stage::new();
        let a = stage.insert(element(0.0, 0.0, 100.0, 100.0));
        let b = stage.insert_child(a, element(0.0, 0.0, 10.0, 10.0));

        stage.add_child(b, a);
        // unchanged
        assert_eq!(stage.parent(b), Some(a));
        assert_eq!(stage.parent(a), None);
    }

    #[test]
    fn test_remove_subtree() {
        let mut stage = Stage::new();
        let root = stage.insert(element(0.0, 0.0, 100.0, 100.0));
        let child = stage.insert_child(root, element(0.0, 0.0, 10.0, 10.0));
        let grandchild = stage.insert_child(child, element(0.0, 0.0, 5.0, 5.0));

        assert!(stage.remove(child).is_some());
        assert!(!stage.contains(child));
        assert!(!stage.contains(grandchild));
        assert!(stage.children(root).is_empty());
        // removing again is a no-op
        assert!(stage.remove(child).is_none());
    }

    #[test]
    fn test_deferred_layout() {
        let mut stage = Stage::new();
        let el = stage.insert(element(0.0, 0.0, 10.0, 10.0));

        stage.request_frame(el, Rect::new(50.0, 50.0, 20.0, 20.0));
        assert!(stage.needs_layout());
        // committed geometry unchanged until the pass runs
        assert_eq!(stage.get(el).unwrap().frame, Rect::new(0.0, 0.0, 10.0, 10.0));

        stage.layout();
        assert!(!stage.needs_layout());
        assert_eq!(stage.get(el).unwrap().frame, Rect::new(50.0, 50.0, 20.0, 20.0));
    }

    #[test]
    fn test_snapshot_rounds_capture_and_restores_base() {
        let mut stage = Stage::new();
        let el = stage.insert(
            Element::new(Rect::new(10.0, 10.0, 80.0, 40.0))
                .with_background(Color::rgb(1.0, 0.8, 0.0))
                .with_corner_radius(8.0),
        );

        let capture = stage.snapshot(el, false).unwrap();
        assert_eq!(capture.corner_radius, 8.0);
        assert!(capture.clips_content);
        assert_eq!(capture.frame, Rect::new(0.0, 0.0, 80.0, 40.0));
        match &capture.content {
            ElementContent::Snapshot(s) => {
                assert_eq!(s.captured_from, el);
                assert_eq!(s.content_size, Size::new(80.0, 40.0));
            }
            other => panic!("expected snapshot content, got {other:?}"),
        }
        // base keeps its rounding
        assert_eq!(stage.get(el).unwrap().corner_radius, 8.0);
    }

    #[test]
    fn test_snapshot_after_layout_observes_final_geometry() {
        let mut stage = Stage::new();
        let el = stage.insert(element(0.0, 0.0, 10.0, 10.0));
        stage.request_frame(el, Rect::new(0.0, 0.0, 100.0, 100.0));

        let capture = stage.snapshot(el, true).unwrap();
        assert_eq!(capture.frame.size(), Size::new(100.0, 100.0));
        assert_eq!(stage.get(el).unwrap().frame.size(), Size::new(100.0, 100.0));
    }

    #[test]
    fn test_snapshot_errors() {
        let mut stage = Stage::new();
        let empty = stage.insert(element(0.0, 0.0, 0.0, 10.0));
        assert_eq!(
            stage.snapshot(empty, false),
            Err(SnapshotError::Unrenderable(empty, Size::new(0.0, 10.0)))
        );

        let gone = ElementId(9999);
        assert_eq!(stage.snapshot(gone, false), Err(SnapshotError::Missing(gone)));
    }
}
