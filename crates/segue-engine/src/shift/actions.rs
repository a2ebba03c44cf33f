//! Independent per-element entrance/exit actions.
//!
//! Actions never match identifiers; they displace a single live element
//! from its natural resting state (or, inverted, arrive back at it). The
//! same action list therefore describes an outgoing element's departure
//! and, inverted, the incoming counterpart's arrival.

use segue_core::{ElementId, Stage};
use serde::{Deserialize, Serialize};

use crate::animation::events::CompletionLatch;
use crate::animation::interpolate::Interpolate;
use crate::animation::timing::{PlaybackState, TimingContext, TimingDriver};
use crate::shift::animator::{AnimatorOutcome, AnimatorPhase};
use crate::shift::appearance::Appearance;

/// One simple displacement of an element's appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    TranslateBy { dx: f32, dy: f32 },
    FadeTo { opacity: f32 },
    ScaleBy { factor: f32 },
}

impl Action {
    /// The appearance after applying this action to `appearance`.
    fn displace(&self, appearance: Appearance) -> Appearance {
        match *self {
            Self::TranslateBy { dx, dy } => Appearance {
                frame: appearance.frame.translated(dx, dy),
                ..appearance
            },
            Self::FadeTo { opacity } => Appearance {
                opacity,
                ..appearance
            },
            Self::ScaleBy { factor } => Appearance {
                frame: appearance.frame.scaled_about_center(factor),
                ..appearance
            },
        }
    }
}

/// An element's queued action list plus the timing that schedules it on the
/// transition timeline. All actions in the list run jointly over the same
/// window.
#[derive(Debug, Clone)]
pub struct ElementActions {
    pub element: ElementId,
    pub actions: Vec<Action>,
    pub timing: TimingContext,
}

impl ElementActions {
    pub fn new(element: ElementId, actions: Vec<Action>) -> Self {
        Self {
            element,
            actions,
            timing: TimingContext::default(),
        }
    }

    pub fn with_timing(mut self, timing: TimingContext) -> Self {
        self.timing = timing;
        self
    }

    /// The fully displaced appearance: every action folded over `natural`.
    fn displaced(&self, natural: Appearance) -> Appearance {
        self.actions
            .iter()
            .fold(natural, |appearance, action| action.displace(appearance))
    }
}

#[derive(Debug)]
struct ActiveAction {
    element: ElementId,
    natural: Appearance,
    from: Appearance,
    to: Appearance,
    driver: TimingDriver,
    state: PlaybackState,
}

type Completion = Box<dyn FnOnce(AnimatorOutcome) + Send>;

/// Runs a batch of per-element actions on the shared transition clock.
///
/// Appearances here are in each element's own parent space; no overlay or
/// stand-ins are involved.
pub struct ActionAnimator {
    items: Vec<ElementActions>,
    inverted: bool,
    active: Vec<ActiveAction>,
    phase: AnimatorPhase,
    latch: CompletionLatch,
    completion: Option<Completion>,
    outcome: Option<AnimatorOutcome>,
}

impl ActionAnimator {
    /// Animate elements from their resting state into the displaced state
    /// (an outgoing scene's departure).
    pub fn new(items: Vec<ElementActions>) -> Self {
        Self {
            items,
            inverted: false,
            active: Vec::new(),
            phase: AnimatorPhase::Idle,
            latch: CompletionLatch::new(0),
            completion: None,
            outcome: None,
        }
    }

    /// Animate elements from the displaced state back to their resting
    /// state (an incoming scene's arrival).
    pub fn inverted(items: Vec<ElementActions>) -> Self {
        Self {
            inverted: true,
            ..Self::new(items)
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn phase(&self) -> AnimatorPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<AnimatorOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Begin all actions concurrently over the given duration.
    ///
    /// Inverted runs snap each element to its displaced state immediately,
    /// then animate home. Elements missing from the stage are skipped.
    pub fn animate(
        &mut self,
        stage: &mut Stage,
        duration_ms: f32,
        completion: impl FnOnce(AnimatorOutcome) + Send + 'static,
    ) {
        if self.phase != AnimatorPhase::Idle {
            log::warn!("animate called in {:?}; ignoring", self.phase);
            return;
        }

        for item in std::mem::take(&mut self.items) {
            let Some(natural) = local_appearance(stage, item.element) else {
                log::warn!("skipping actions for missing element {:?}", item.element);
                continue;
            };
            let displaced = item.displaced(natural);
            let (from, to) = if self.inverted {
                (displaced, natural)
            } else {
                (natural, displaced)
            };
            if self.inverted {
                apply_local(stage, item.element, &from);
            }
            self.active.push(ActiveAction {
                element: item.element,
                natural,
                from,
                to,
                driver: item.timing.driver(duration_ms),
                state: PlaybackState::Running,
            });
        }

        self.completion = Some(Box::new(completion));
        self.latch = CompletionLatch::new(self.active.len());
        self.phase = AnimatorPhase::Animating;

        if self.latch.is_complete() {
            self.finish(AnimatorOutcome::Completed);
        }
    }

    /// Advance all running actions and write interpolated appearances onto
    /// their elements.
    pub fn update(&mut self, stage: &mut Stage, delta_ms: f32) {
        if self.phase != AnimatorPhase::Animating {
            return;
        }

        let mut all_done = false;
        for active in &mut self.active {
            if active.state.is_terminal() {
                continue;
            }
            let still_running = active.driver.advance(delta_ms);
            let appearance = if still_running {
                active.from.interpolate(&active.to, active.driver.progress())
            } else {
                active.state = PlaybackState::Finished;
                active.to
            };
            apply_local(stage, active.element, &appearance);
            if !still_running && self.latch.complete_one() {
                all_done = true;
            }
        }

        if all_done {
            self.finish(AnimatorOutcome::Completed);
        }
    }

    /// Cut every action short and leave each element at its natural
    /// resting layout, so neither scene keeps a stranded offset or faded
    /// state after the host snaps to the winning scene.
    pub fn cancel(&mut self, stage: &mut Stage) {
        if self.phase != AnimatorPhase::Animating {
            return;
        }
        for active in &mut self.active {
            if !active.state.is_terminal() {
                active.state = PlaybackState::Cancelled;
            }
            apply_local(stage, active.element, &active.natural);
        }
        self.finish(AnimatorOutcome::Cancelled);
    }

    fn finish(&mut self, outcome: AnimatorOutcome) {
        self.phase = match outcome {
            AnimatorOutcome::Completed => AnimatorPhase::Completed,
            AnimatorOutcome::Cancelled => AnimatorPhase::Cancelled,
        };
        self.outcome = Some(outcome);
        if let Some(completion) = self.completion.take() {
            completion(outcome);
        }
    }
}

static_assertions::assert_impl_all!(ActionAnimator: Send);

/// The element's appearance in its own parent's coordinate space.
fn local_appearance(stage: &Stage, id: ElementId) -> Option<Appearance> {
    let el = stage.get(id)?;
    Some(Appearance {
        frame: el.frame,
        opacity: el.opacity,
        corner_radius: el.corner_radius,
        background: el.background,
    })
}

fn apply_local(stage: &mut Stage, id: ElementId, appearance: &Appearance) {
    if let Some(el) = stage.get_mut(id) {
        el.frame = appearance.frame;
        el.opacity = appearance.opacity;
        el.corner_radius = appearance.corner_radius;
        el.background = appearance.background;
    }
}
