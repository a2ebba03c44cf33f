//! A matched source/destination pair and its runtime state.

use segue_core::{ElementId, Stage};

use crate::animation::interpolate::Interpolate;
use crate::animation::timing::{PlaybackState, TimingContext, TimingDriver};
use crate::error::ReplicationError;
use crate::shift::appearance::Appearance;
use crate::shift::visual_state::VisualState;

/// The two fixed ends of a shift's interpolation, both in the overlay
/// container's coordinate space. Captured once, before animation begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftEndpoints {
    pub start: Appearance,
    pub end: Appearance,
}

/// One matched pair of visual states sharing an identifier, plus the timing
/// context that drives its interpolation.
#[derive(Debug, Clone)]
pub struct Shift {
    pub source: VisualState,
    pub destination: VisualState,
    pub timing: TimingContext,
}

impl Shift {
    /// # Panics
    /// Panics if the two states' identifiers differ; a shift is by
    /// definition a same-identifier pairing.
    pub fn new(source: VisualState, destination: VisualState, timing: TimingContext) -> Self {
        assert_eq!(
            source.identifier, destination.identifier,
            "a shift pairs states with equal identifiers"
        );
        Self {
            source,
            destination,
            timing,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.source.identifier
    }

    /// Capture the interpolation endpoints: the source as currently
    /// rendered, the destination as it will finally appear, both in
    /// `container` space.
    pub fn capture_endpoints(
        &self,
        stage: &Stage,
        container: ElementId,
    ) -> Result<ShiftEndpoints, ReplicationError> {
        let start = self
            .source
            .current_appearance(stage, container)
            .ok_or_else(|| self.missing(&self.source))?;
        let end = self
            .destination
            .current_appearance(stage, container)
            .ok_or_else(|| self.missing(&self.destination))?;
        Ok(ShiftEndpoints { start, end })
    }

    /// Apply the end appearance to the source's live element immediately,
    /// with no animation. Used by the precommit transition flavor, where
    /// shared elements snap to their destination state while the container
    /// itself animates.
    pub fn commit(&self, stage: &mut Stage, container: ElementId) -> Result<(), ReplicationError> {
        let endpoints = self.capture_endpoints(stage, container)?;
        endpoints.end.apply(stage, container, self.source.element);
        Ok(())
    }

    fn missing(&self, state: &VisualState) -> ReplicationError {
        ReplicationError::MissingElement {
            identifier: state.identifier.clone(),
            element: state.element,
        }
    }
}

/// Runtime state of one shift inside an animator: its stand-in on the
/// stage, its fixed endpoints, and its progress driver.
#[derive(Debug)]
pub struct ActiveShift {
    shift: Shift,
    stand_in: ElementId,
    endpoints: ShiftEndpoints,
    driver: Option<TimingDriver>,
    state: PlaybackState,
}

impl ActiveShift {
    pub fn new(shift: Shift, stand_in: ElementId, endpoints: ShiftEndpoints) -> Self {
        Self {
            shift,
            stand_in,
            endpoints,
            driver: None,
            state: PlaybackState::Running,
        }
    }

    pub fn identifier(&self) -> &str {
        self.shift.identifier()
    }

    pub fn shift(&self) -> &Shift {
        &self.shift
    }

    pub fn stand_in(&self) -> ElementId {
        self.stand_in
    }

    pub fn endpoints(&self) -> &ShiftEndpoints {
        &self.endpoints
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Start interpolating under the shift's timing context, resolved
    /// against the transition's overall duration.
    pub fn begin(&mut self, total_duration_ms: f32) {
        self.driver = Some(self.shift.timing.driver(total_duration_ms));
    }

    /// Advance by `delta_ms`. Returns `true` while still running; flips to
    /// `Finished` on the tick that completes the interpolation.
    pub fn update(&mut self, delta_ms: f32) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let Some(driver) = &mut self.driver else {
            // prepared but not yet begun: holding at the start appearance
            return true;
        };
        if !driver.advance(delta_ms) {
            self.state = PlaybackState::Finished;
            return false;
        }
        true
    }

    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            self.state = PlaybackState::Cancelled;
        }
    }

    /// The interpolated appearance for the current progress.
    pub fn current_appearance(&self) -> Appearance {
        match self.state {
            PlaybackState::Finished => self.endpoints.end,
            _ => match &self.driver {
                Some(driver) => self
                    .endpoints
                    .start
                    .interpolate(&self.endpoints.end, driver.progress()),
                None => self.endpoints.start,
            },
        }
    }

    /// Write the current appearance onto the stand-in.
    pub fn apply(&self, stage: &mut Stage, container: ElementId) {
        self.current_appearance()
            .apply(stage, container, self.stand_in);
    }
}
