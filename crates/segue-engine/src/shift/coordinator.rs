//! Matching source and destination visual states into shifts.

use std::collections::HashSet;

use crate::animation::timing::TimingContext;
use crate::shift::pair::Shift;
use crate::shift::visual_state::VisualState;

/// Builds the set of shifts for one transition from the two scenes'
/// participating states. Unmatched states on either side produce no shift;
/// they belong to the independent entrance/exit actions instead.
pub trait ShiftCoordinator {
    fn shifts(&self, sources: &[VisualState], destinations: &[VisualState]) -> Vec<Shift>;
}

/// Identifier matching with one timing context applied uniformly to every
/// produced shift.
///
/// Sources are walked in order; each matches the first destination with an
/// equal identifier. Duplicate identifiers on either side resolve to the
/// first occurrence, deterministically; later duplicates are silently
/// unmatched.
#[derive(Debug, Clone, Default)]
pub struct DefaultCoordinator {
    timing: TimingContext,
}

impl DefaultCoordinator {
    pub fn new(timing: TimingContext) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> TimingContext {
        self.timing
    }
}

impl ShiftCoordinator for DefaultCoordinator {
    fn shifts(&self, sources: &[VisualState], destinations: &[VisualState]) -> Vec<Shift> {
        let mut seen: HashSet<&str> = HashSet::new();
        sources
            .iter()
            .filter(|source| seen.insert(source.identifier.as_str()))
            .filter_map(|source| {
                let matched = destinations
                    .iter()
                    .find(|destination| *destination == source)?;
                Some(Shift::new(source.clone(), matched.clone(), self.timing))
            })
            .collect()
    }
}
