//! The precommit transition flavor.
//!
//! Contract: the outgoing scene animates its contents to a visual state
//! matching the destination, the shared elements having snapped there
//! instantly at time zero. The incoming root then slides up from below the
//! container while both scenes' action batches run alongside. Completion is
//! keyed to the slide alone: reaching the end position is success, being
//! sent back to the start is a revert.

use segue_core::{ElementId, Rect, Stage};

use crate::animation::easing::TimingCurve;
use crate::animation::events::ShiftEvent;
use crate::animation::interpolate::Interpolate;
use crate::animation::timing::{PlaybackState, TimingContext, TimingDriver};
use crate::error::TransitionError;
use crate::shift::actions::ActionAnimator;
use crate::shift::animator::ShiftAnimator;
use crate::shift::coordinator::ShiftCoordinator;
use crate::transition::context::{ShiftTransitionable, TransitionContext};
use crate::transition::driver::TransitionOutcome;

type Completion = Box<dyn FnOnce(TransitionOutcome) + Send>;

/// The incoming root's slide from below the container to its final frame.
#[derive(Debug)]
struct SlideIn {
    root: ElementId,
    start: Rect,
    end: Rect,
    driver: TimingDriver,
    state: PlaybackState,
}

/// Precommit entry point: shift endpoints snap to final state immediately,
/// the container slides, actions run concurrently.
pub struct PrecommitTransition {
    shift_animator: ShiftAnimator,
    outgoing: ActionAnimator,
    incoming: ActionAnimator,
    slide: SlideIn,
    completion: Option<Completion>,
    outcome: Option<TransitionOutcome>,
}

impl PrecommitTransition {
    /// Validate, commit every shift to its end appearance, offset the
    /// incoming root below the container, and start the slide plus both
    /// action batches. On `Err` the stage is untouched.
    pub fn begin(
        stage: &mut Stage,
        context: &TransitionContext,
        source: &dyn ShiftTransitionable,
        destination: &dyn ShiftTransitionable,
        coordinator: &dyn ShiftCoordinator,
        completion: impl FnOnce(TransitionOutcome) + Send + 'static,
    ) -> Result<Self, TransitionError> {
        context.validate(stage, source.root(), destination.root())?;
        let _span = tracing::debug_span!("precommit_transition", duration_ms = context.duration_ms)
            .entered();

        stage.request_frame(destination.root(), context.final_frame);
        stage.layout();

        let shifts = coordinator.shifts(
            &source.shift_states(stage),
            &destination.shift_states(stage),
        );
        log::debug!("precommit committing {} shift(s)", shifts.len());

        // Shift endpoints reach final state at time zero, independent of
        // the slide below.
        let mut shift_animator = ShiftAnimator::new(shifts, context.container);
        shift_animator.commit_shifts(stage);

        let container_height = stage
            .get(context.container)
            .map(|c| c.frame.h)
            .unwrap_or(0.0);
        let start = context.final_frame.translated(0.0, container_height);
        if let Some(root) = stage.get_mut(destination.root()) {
            root.frame = start;
        }

        let slide = SlideIn {
            root: destination.root(),
            start,
            end: context.final_frame,
            driver: TimingContext::cubic(TimingCurve::EaseInOut).driver(context.duration_ms),
            state: PlaybackState::Running,
        };

        let mut outgoing = ActionAnimator::new(source.action_sets(stage));
        outgoing.animate(stage, context.duration_ms, |_| {});

        let mut incoming = ActionAnimator::inverted(destination.action_sets(stage));
        incoming.animate(stage, context.duration_ms, |_| {});

        Ok(Self {
            shift_animator,
            outgoing,
            incoming,
            slide,
            completion: Some(Box::new(completion)),
            outcome: None,
        })
    }

    /// Advance the slide and both action batches. Fires the completion on
    /// the tick the slide reaches its end position.
    pub fn update(&mut self, stage: &mut Stage, delta_ms: f32) {
        self.outgoing.update(stage, delta_ms);
        self.incoming.update(stage, delta_ms);

        if self.slide.state.is_terminal() {
            return;
        }
        let still_running = self.slide.driver.advance(delta_ms);
        let frame = if still_running {
            self.slide
                .start
                .interpolate(&self.slide.end, self.slide.driver.progress())
        } else {
            self.slide.state = PlaybackState::Finished;
            self.slide.end
        };
        if let Some(root) = stage.get_mut(self.slide.root) {
            root.frame = frame;
        }
        if !still_running {
            self.finish(TransitionOutcome::Completed);
        }
    }

    /// Revert: send the incoming root back to its start position below the
    /// container, cut both action batches short, and report `Cancelled`.
    pub fn cancel(&mut self, stage: &mut Stage) {
        if self.slide.state.is_terminal() {
            return;
        }
        log::info!("precommit transition reverted");
        self.slide.state = PlaybackState::Cancelled;
        if let Some(root) = stage.get_mut(self.slide.root) {
            root.frame = self.slide.start;
        }
        self.outgoing.cancel(stage);
        self.incoming.cancel(stage);
        self.finish(TransitionOutcome::Cancelled);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<TransitionOutcome> {
        self.outcome
    }

    /// Events from the commit pass (dropped shifts surface here).
    pub fn drain_shift_events(&mut self) -> Vec<ShiftEvent> {
        self.shift_animator.drain_events().collect()
    }

    fn finish(&mut self, outcome: TransitionOutcome) {
        self.outcome = Some(outcome);
        if let Some(completion) = self.completion.take() {
            completion(outcome);
        }
    }
}

static_assertions::assert_impl_all!(PrecommitTransition: Send);
