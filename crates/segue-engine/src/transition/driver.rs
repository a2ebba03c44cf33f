//! The standard transition driver.
//!
//! Composes one [`ShiftAnimator`] and two [`ActionAnimator`]s (outgoing
//! departure, inverted incoming arrival) on a single clock and reports one
//! aggregate completion. The three child completions are joined with an
//! explicit countdown latch; any cancelled child makes the aggregate
//! outcome `Cancelled`.

use std::sync::{Arc, Mutex};

use segue_core::Stage;

use crate::animation::events::{CompletionLatch, ShiftEvent};
use crate::error::TransitionError;
use crate::shift::actions::ActionAnimator;
use crate::shift::animator::{AnimatorOutcome, ShiftAnimator};
use crate::shift::coordinator::ShiftCoordinator;
use crate::transition::context::{ShiftTransitionable, TransitionContext, TransitionPreparable};

/// Terminal result of a whole transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed,
    Cancelled,
}

impl From<AnimatorOutcome> for TransitionOutcome {
    fn from(outcome: AnimatorOutcome) -> Self {
        match outcome {
            AnimatorOutcome::Completed => Self::Completed,
            AnimatorOutcome::Cancelled => Self::Cancelled,
        }
    }
}

type Completion = Box<dyn FnOnce(TransitionOutcome) + Send>;

/// Joins the child animators' completions into the host's single callback.
struct AggregateCompletion {
    latch: CompletionLatch,
    any_cancelled: bool,
    completion: Option<Completion>,
    outcome: Option<TransitionOutcome>,
}

impl AggregateCompletion {
    fn new(children: usize, completion: Completion) -> Self {
        Self {
            latch: CompletionLatch::new(children),
            any_cancelled: false,
            completion: Some(completion),
            outcome: None,
        }
    }

    fn child_done(&mut self, outcome: AnimatorOutcome) {
        if outcome == AnimatorOutcome::Cancelled {
            self.any_cancelled = true;
        }
        if self.latch.complete_one() {
            let aggregate = if self.any_cancelled {
                TransitionOutcome::Cancelled
            } else {
                TransitionOutcome::Completed
            };
            self.outcome = Some(aggregate);
            if let Some(completion) = self.completion.take() {
                completion(aggregate);
            }
        }
    }
}

fn child_handler(
    shared: &Arc<Mutex<AggregateCompletion>>,
) -> impl FnOnce(AnimatorOutcome) + Send + 'static {
    let shared = Arc::clone(shared);
    move |outcome| {
        if let Ok(mut aggregate) = shared.lock() {
            aggregate.child_done(outcome);
        }
    }
}

/// One forward transition run between two scenes.
///
/// The host constructs it with [`begin`](Self::begin), then drives
/// [`update`](Self::update) once per frame until
/// [`is_finished`](Self::is_finished), or interrupts with
/// [`cancel`](Self::cancel). Either way every stand-in is released and both
/// scenes' live elements end up visible.
pub struct ShiftTransition {
    shift_animator: ShiftAnimator,
    outgoing: ActionAnimator,
    incoming: ActionAnimator,
    aggregate: Arc<Mutex<AggregateCompletion>>,
}

impl ShiftTransition {
    /// Validate, match, and set the whole transition in motion.
    ///
    /// Flow: place the incoming root at its final geometry and run layout;
    /// match shift states through the coordinator; insert every stand-in;
    /// then start the shift interpolations and both scenes' action batches
    /// on the shared clock. On `Err` the stage is untouched.
    pub fn begin(
        stage: &mut Stage,
        context: &TransitionContext,
        source: &dyn ShiftTransitionable,
        destination: &dyn ShiftTransitionable,
        coordinator: &dyn ShiftCoordinator,
        completion: impl FnOnce(TransitionOutcome) + Send + 'static,
    ) -> Result<Self, TransitionError> {
        Self::begin_with_hooks(
            stage,
            context,
            source,
            destination,
            coordinator,
            None,
            None,
            completion,
        )
    }

    /// [`begin`](Self::begin), plus optional prepare/complete hooks for
    /// scenes that implement the [`TransitionPreparable`] capability.
    #[allow(clippy::too_many_arguments)]
    pub fn begin_with_hooks(
        stage: &mut Stage,
        context: &TransitionContext,
        source: &dyn ShiftTransitionable,
        destination: &dyn ShiftTransitionable,
        coordinator: &dyn ShiftCoordinator,
        source_hooks: Option<&dyn TransitionPreparable>,
        destination_hooks: Option<&dyn TransitionPreparable>,
        completion: impl FnOnce(TransitionOutcome) + Send + 'static,
    ) -> Result<Self, TransitionError> {
        context.validate(stage, source.root(), destination.root())?;
        let _span = tracing::debug_span!("shift_transition", duration_ms = context.duration_ms)
            .entered();

        // Configure the destination ahead of its presentation, so endpoint
        // capture observes final geometry.
        stage.request_frame(destination.root(), context.final_frame);
        stage.layout();
        if let Some(hooks) = destination_hooks {
            hooks.prepare_for_transition(stage);
        }

        let shifts = coordinator.shifts(
            &source.shift_states(stage),
            &destination.shift_states(stage),
        );
        log::debug!("transition matched {} shift(s)", shifts.len());

        let aggregate = Arc::new(Mutex::new(AggregateCompletion::new(
            3,
            Box::new(completion),
        )));

        let mut shift_animator = ShiftAnimator::new(shifts, context.container);
        shift_animator.prepare(stage, true);
        shift_animator.animate(stage, context.duration_ms, child_handler(&aggregate));

        let mut outgoing = ActionAnimator::new(source.action_sets(stage));
        outgoing.animate(stage, context.duration_ms, child_handler(&aggregate));

        let mut incoming = ActionAnimator::inverted(destination.action_sets(stage));
        incoming.animate(stage, context.duration_ms, child_handler(&aggregate));

        // The transition is in motion; give both scenes their completion
        // hook before the driver goes quiet until teardown.
        if let Some(hooks) = destination_hooks {
            hooks.complete_transition(stage);
        }
        if let Some(hooks) = source_hooks {
            hooks.complete_transition(stage);
        }

        Ok(Self {
            shift_animator,
            outgoing,
            incoming,
            aggregate,
        })
    }

    /// Advance every child animator by `delta_ms` on the shared clock.
    pub fn update(&mut self, stage: &mut Stage, delta_ms: f32) {
        self.shift_animator.update(stage, delta_ms);
        self.outgoing.update(stage, delta_ms);
        self.incoming.update(stage, delta_ms);
    }

    /// Cancel every in-flight animation and tear down. The aggregate
    /// completion reports `Cancelled`.
    pub fn cancel(&mut self, stage: &mut Stage) {
        log::info!("transition cancelled");
        self.shift_animator.cancel(stage);
        self.outgoing.cancel(stage);
        self.incoming.cancel(stage);
    }

    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn outcome(&self) -> Option<TransitionOutcome> {
        self.aggregate.lock().ok().and_then(|a| a.outcome)
    }

    /// Per-shift lifecycle events accumulated since the last drain.
    pub fn drain_shift_events(&mut self) -> Vec<ShiftEvent> {
        self.shift_animator.drain_events().collect()
    }

    pub fn shift_count(&self) -> usize {
        self.shift_animator.shift_count()
    }
}

static_assertions::assert_impl_all!(ShiftTransition: Send);
