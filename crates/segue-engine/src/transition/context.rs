//! Boundary contracts between the host's scenes and the drivers.

use segue_core::{ElementId, Rect, Stage};

use crate::error::TransitionError;
use crate::shift::actions::ElementActions;
use crate::shift::visual_state::VisualState;

/// A scene able to power a shift transition. Implemented by the host's
/// screen objects; the driver only ever sees this capability.
pub trait ShiftTransitionable {
    /// The scene's root element.
    fn root(&self) -> ElementId;

    /// The ordered collection of states participating in shifting.
    fn shift_states(&self, stage: &Stage) -> Vec<VisualState>;

    /// Independent entrance/exit actions for non-shared elements.
    fn action_sets(&self, _stage: &Stage) -> Vec<ElementActions> {
        Vec::new()
    }
}

/// Optional capability: hooks around a transition run. Checked once at
/// setup; a scene that does not implement it is simply never called.
pub trait TransitionPreparable {
    /// Called before any stand-in exists or animation starts.
    fn prepare_for_transition(&self, _stage: &mut Stage) {}

    /// Called once the transition has been set in motion.
    fn complete_transition(&self, _stage: &mut Stage) {}
}

/// Host-provided parameters for one transition run.
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext {
    /// The shared overlay container stand-ins are inserted into.
    pub container: ElementId,
    /// Final geometry for the incoming scene's root, in the container's
    /// parent space.
    pub final_frame: Rect,
    /// Overall transition duration in milliseconds.
    pub duration_ms: f32,
}

impl TransitionContext {
    pub fn new(container: ElementId, final_frame: Rect, duration_ms: f32) -> Self {
        Self {
            container,
            final_frame,
            duration_ms,
        }
    }

    /// Check every precondition a driver relies on. Runs before anything
    /// mutates, so a malformed context aborts with both scenes exactly as
    /// they were.
    pub(crate) fn validate(
        &self,
        stage: &Stage,
        source_root: ElementId,
        destination_root: ElementId,
    ) -> Result<(), TransitionError> {
        if !stage.contains(self.container) {
            return Err(TransitionError::MissingContainer(self.container));
        }
        if !stage.contains(source_root) {
            return Err(TransitionError::MissingSceneRoot(source_root));
        }
        if !stage.contains(destination_root) {
            return Err(TransitionError::MissingSceneRoot(destination_root));
        }
        if self.duration_ms <= 0.0 {
            return Err(TransitionError::NonPositiveDuration(self.duration_ms));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segue_core::Element;

    #[test]
    fn test_validate_catches_each_precondition() {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let a = stage.insert(Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let b = stage.insert(Element::new(Rect::new(0.0, 0.0, 100.0, 100.0)));
        let gone = ElementId(999);

        let good = TransitionContext::new(container, Rect::new(0.0, 0.0, 100.0, 100.0), 400.0);
        assert!(good.validate(&stage, a, b).is_ok());

        let bad_container = TransitionContext::new(gone, good.final_frame, 400.0);
        assert!(matches!(
            bad_container.validate(&stage, a, b),
            Err(TransitionError::MissingContainer(_))
        ));

        assert!(matches!(
            good.validate(&stage, gone, b),
            Err(TransitionError::MissingSceneRoot(_))
        ));

        let zero = TransitionContext::new(container, good.final_frame, 0.0);
        assert!(matches!(
            zero.validate(&stage, a, b),
            Err(TransitionError::NonPositiveDuration(_))
        ));
    }
}
