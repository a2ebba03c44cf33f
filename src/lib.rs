//! Facade crate for the segue workspace.
//!
//! Re-exports the stage model from `segue-core` and the transition engine
//! from `segue-engine` under one roof, so hosts can depend on a single crate.

pub use segue_core::{Color, Element, ElementContent, ElementId, Point, Rect, Size, Stage};
pub use segue_engine::{
    Action, ActionAnimator, Appearance, DefaultCoordinator, ElementActions, PrecommitTransition,
    ReplicationStrategy, Shift, ShiftAnimator, ShiftCoordinator, ShiftTransition,
    ShiftTransitionable, SpringTimingParameters, TimingContext, TimingCurve, TransitionContext,
    TransitionError, TransitionOutcome, VisualState,
};
