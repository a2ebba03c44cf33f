//! One participating element's identity and replication strategy.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use segue_core::{Element, ElementId, Stage};

use crate::error::ReplicationError;
use crate::shift::appearance::Appearance;

/// How a stand-in visual is produced from the live element.
#[derive(Clone)]
pub enum ReplicationStrategy {
    /// Capture the element's current rendered appearance as a static,
    /// image-backed visual.
    Snapshot,
    /// Build the stand-in with a caller-supplied constructor. The closure
    /// may derive from the base element or return something entirely
    /// independent of it.
    Custom(Arc<dyn Fn(&Element) -> Element + Send + Sync>),
}

impl fmt::Debug for ReplicationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Snapshot => f.write_str("Snapshot"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A single state of a shifting element: the live element (borrowed from
/// the host scene, referenced by id), the identifier that pairs it with its
/// counterpart in the other scene, and how its stand-in is produced.
///
/// Identity is the identifier alone: two states are equal when their
/// identifiers are, which is what makes cross-scene matching work.
#[derive(Clone, Debug)]
pub struct VisualState {
    pub element: ElementId,
    pub identifier: String,
    pub replication: ReplicationStrategy,
}

impl PartialEq for VisualState {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for VisualState {}

impl Hash for VisualState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl VisualState {
    /// A snapshot-replicated state.
    pub fn new(element: ElementId, identifier: impl Into<String>) -> Self {
        Self {
            element,
            identifier: identifier.into(),
            replication: ReplicationStrategy::Snapshot,
        }
    }

    /// A state whose stand-in is built by `constructor`.
    pub fn custom(
        element: ElementId,
        identifier: impl Into<String>,
        constructor: impl Fn(&Element) -> Element + Send + Sync + 'static,
    ) -> Self {
        Self {
            element,
            identifier: identifier.into(),
            replication: ReplicationStrategy::Custom(Arc::new(constructor)),
        }
    }

    /// The element's current appearance in `container` space.
    pub fn current_appearance(&self, stage: &Stage, container: ElementId) -> Option<Appearance> {
        Appearance::capture(stage, self.element, container)
    }

    /// Produce the stand-in element value (not yet on the stage).
    ///
    /// `after_layout` asks snapshot capture to flush pending layout for the
    /// element first, so the capture observes final geometry.
    pub fn build_stand_in(
        &self,
        stage: &mut Stage,
        after_layout: bool,
    ) -> Result<Element, ReplicationError> {
        match &self.replication {
            ReplicationStrategy::Snapshot => {
                stage
                    .snapshot(self.element, after_layout)
                    .map_err(|source| ReplicationError::Snapshot {
                        identifier: self.identifier.clone(),
                        source,
                    })
            }
            ReplicationStrategy::Custom(constructor) => {
                let base = stage
                    .get(self.element)
                    .ok_or(ReplicationError::MissingElement {
                        identifier: self.identifier.clone(),
                        element: self.element,
                    })?;
                Ok(constructor(base))
            }
        }
    }

    /// Build the stand-in, add it to `container`, place it at this state's
    /// current appearance, and hide the live element.
    ///
    /// From here until [`remove_stand_in`](Self::remove_stand_in), exactly
    /// one of {live element, stand-in} is visible.
    pub fn insert_stand_in(
        &self,
        stage: &mut Stage,
        container: ElementId,
        after_layout: bool,
    ) -> Result<ElementId, ReplicationError> {
        let stand_in = self.build_stand_in(stage, after_layout)?;
        let appearance = self.current_appearance(stage, container).ok_or(
            ReplicationError::MissingElement {
                identifier: self.identifier.clone(),
                element: self.element,
            },
        )?;

        let stand_in_id = stage.insert_child(container, stand_in);
        appearance.apply(stage, container, stand_in_id);
        if let Some(el) = stage.get_mut(self.element) {
            el.hidden = true;
        }
        Ok(stand_in_id)
    }

    /// Un-hide the live element and remove the stand-in.
    ///
    /// Safe when insertion partially failed or when called twice: the only
    /// hidden-state flag is reset unconditionally and a missing stand-in is
    /// ignored.
    pub fn remove_stand_in(&self, stage: &mut Stage, stand_in: ElementId) {
        if let Some(el) = stage.get_mut(self.element) {
            el.hidden = false;
        }
        stage.remove(stand_in);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::{Color, ElementContent, Rect};
    use std::collections::HashSet;

    fn stage_with_element() -> (Stage, ElementId, ElementId) {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 400.0)));
        let el = stage.insert(
            Element::new(Rect::new(10.0, 10.0, 50.0, 50.0))
                .with_background(Color::rgb(1.0, 0.8, 0.0)),
        );
        (stage, container, el)
    }

    #[test]
    fn test_identity_is_the_identifier() {
        let a = VisualState::new(ElementId(1), "yellow");
        let b = VisualState::new(ElementId(2), "yellow");
        let c = VisualState::new(ElementId(1), "orange");
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_insert_hides_base_and_shows_stand_in() {
        let (mut stage, container, el) = stage_with_element();
        let state = VisualState::new(el, "yellow");

        let stand_in = state.insert_stand_in(&mut stage, container, false).unwrap();

        assert!(stage.get(el).unwrap().hidden);
        assert!(!stage.get(stand_in).unwrap().hidden);
        assert_eq!(stage.parent(stand_in), Some(container));
        assert_eq!(
            stage.get(stand_in).unwrap().frame,
            Rect::new(10.0, 10.0, 50.0, 50.0)
        );
    }

    #[test]
    fn test_remove_restores_base_and_clears_container() {
        let (mut stage, container, el) = stage_with_element();
        let state = VisualState::new(el, "yellow");
        let stand_in = state.insert_stand_in(&mut stage, container, false).unwrap();

        state.remove_stand_in(&mut stage, stand_in);

        assert!(!stage.get(el).unwrap().hidden);
        assert!(!stage.contains(stand_in));
        assert!(stage.children(container).is_empty());

        // calling again must not re-hide or panic
        state.remove_stand_in(&mut stage, stand_in);
        assert!(!stage.get(el).unwrap().hidden);
    }

    #[test]
    fn test_custom_constructor_output_used_directly() {
        let (mut stage, container, el) = stage_with_element();
        let state = VisualState::custom(el, "yellow", |base| {
            Element::new(base.frame).with_background(Color::rgb(0.0, 1.0, 0.0))
        });

        let stand_in = state.insert_stand_in(&mut stage, container, false).unwrap();
        let built = stage.get(stand_in).unwrap();
        // appearance application restores the live element's background; the
        // custom content shape is preserved
        assert_eq!(built.content, ElementContent::Fill);
        assert!(stage.get(el).unwrap().hidden);
    }

    #[test]
    fn test_unrenderable_base_fails_replication() {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 400.0)));
        let empty = stage.insert(Element::new(Rect::new(0.0, 0.0, 0.0, 0.0)));
        let state = VisualState::new(empty, "ghost");

        let err = state.insert_stand_in(&mut stage, container, false);
        assert!(matches!(err, Err(ReplicationError::Snapshot { .. })));
        // failed insertion leaves the base visible
        assert!(!stage.get(empty).unwrap().hidden);
    }
}
