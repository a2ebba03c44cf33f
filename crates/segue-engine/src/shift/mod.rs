//! Shared-element shifting: matching, replication, and choreography.
//!
//! ```text
//! VisualState (element + identifier + replication strategy)
//!   └── ShiftCoordinator matches source/destination sets by identifier
//!         └── Shift (one matched pair + timing)
//!               └── ShiftAnimator (stand-ins in the overlay, one clock,
//!                   one aggregate completion)
//! ActionAnimator (independent entrance/exit actions, no matching)
//! ```

pub mod actions;
pub mod animator;
pub mod appearance;
pub mod coordinator;
pub mod pair;
pub mod visual_state;

pub use actions::{Action, ActionAnimator, ElementActions};
pub use animator::{AnimatorOutcome, AnimatorPhase, ShiftAnimator};
pub use appearance::Appearance;
pub use coordinator::{DefaultCoordinator, ShiftCoordinator};
pub use pair::{ActiveShift, Shift, ShiftEndpoints};
pub use visual_state::{ReplicationStrategy, VisualState};
