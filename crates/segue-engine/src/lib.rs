//! segue-engine: shared-element scene transition choreography.
//!
//! Elements present in both an outgoing and an incoming scene are matched by
//! a stable identifier and animated continuously from their source
//! position/appearance to their destination position/appearance, while
//! non-shared elements run independent entrance/exit actions. The engine
//! covers:
//!
//! - **Matching**: [`ShiftCoordinator`] pairs source and destination
//!   [`VisualState`]s by identifier into [`Shift`]s
//! - **Replication**: stand-in visuals (snapshot or custom-built) that can
//!   move through a shared overlay container outside either scene's
//!   hierarchy
//! - **Timing**: cubic curves with relative sub-windows, or springs, behind
//!   one [`TimingContext`] type
//! - **Choreography**: [`ShiftAnimator`] and [`ActionAnimator`] advance on a
//!   single shared clock and report one aggregate completion each; the
//!   transition drivers compose them and commit or cancel atomically
//!
//! The engine mutates a [`segue_core::Stage`] and never draws; rendering and
//! scene presentation belong to the host.

pub mod animation;
pub mod error;
pub mod shift;
pub mod transition;

pub use animation::easing::TimingCurve;
pub use animation::events::{CompletionLatch, EventQueue, ShiftEvent};
pub use animation::interpolate::Interpolate;
pub use animation::spring::{SpringSimulation, SpringTimingParameters};
pub use animation::timing::{PlaybackState, TimingContext, TimingDriver};
pub use error::{ReplicationError, TransitionError};
pub use shift::actions::{Action, ActionAnimator, ElementActions};
pub use shift::animator::{AnimatorOutcome, AnimatorPhase, ShiftAnimator};
pub use shift::appearance::Appearance;
pub use shift::coordinator::{DefaultCoordinator, ShiftCoordinator};
pub use shift::pair::{ActiveShift, Shift, ShiftEndpoints};
pub use shift::visual_state::{ReplicationStrategy, VisualState};
pub use transition::context::{ShiftTransitionable, TransitionContext, TransitionPreparable};
pub use transition::driver::{ShiftTransition, TransitionOutcome};
pub use transition::precommit::PrecommitTransition;
