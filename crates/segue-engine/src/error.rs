//! Error taxonomy for transition setup and replication.
//!
//! Everything here surfaces synchronously at setup time. Once a transition
//! is animating, the only remaining outcomes are completion and
//! cancellation; there is no mid-flight error path.

use segue_core::{ElementId, SnapshotError};
use thiserror::Error;

/// A stand-in could not be produced for a participating element.
#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("cannot replicate `{identifier}`: {source}")]
    Snapshot {
        identifier: String,
        #[source]
        source: SnapshotError,
    },

    #[error("element {element:?} for `{identifier}` is not on the stage")]
    MissingElement {
        identifier: String,
        element: ElementId,
    },
}

/// A transition could not be set up. The stage is left untouched whenever
/// one of these is returned.
#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("overlay container {0:?} is not on the stage")]
    MissingContainer(ElementId),

    #[error("scene root {0:?} is not on the stage")]
    MissingSceneRoot(ElementId),

    #[error("transition duration must be positive, got {0}ms")]
    NonPositiveDuration(f32),
}
