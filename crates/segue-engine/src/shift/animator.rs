//! Drives the full set of shifts for one transition.
//!
//! Lifecycle: `Idle → Preparing → Animating → {Completed | Cancelled} →
//! TornDown`. Every stand-in is inserted, positioned at its start
//! appearance, before any shift begins interpolating; teardown runs only
//! after every shift has finished or been cancelled, and on both exits it
//! removes every stand-in and restores every live element.

use segue_core::{ElementId, Stage};

use crate::animation::events::{CompletionLatch, EventQueue, ShiftEvent};
use crate::shift::pair::{ActiveShift, Shift};

/// How an animator's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorOutcome {
    Completed,
    Cancelled,
}

/// Where the animator is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorPhase {
    Idle,
    Preparing,
    Animating,
    Completed,
    Cancelled,
    TornDown,
}

type Completion = Box<dyn FnOnce(AnimatorOutcome) + Send>;

/// Owns one transition's shifts and their stand-ins in the shared overlay
/// container, advances them on a single clock, and reports one aggregate
/// completion through an explicit countdown latch.
pub struct ShiftAnimator {
    container: ElementId,
    pending: Vec<Shift>,
    active: Vec<ActiveShift>,
    phase: AnimatorPhase,
    latch: CompletionLatch,
    completion: Option<Completion>,
    outcome: Option<AnimatorOutcome>,
    events: EventQueue,
}

impl ShiftAnimator {
    pub fn new(shifts: Vec<Shift>, container: ElementId) -> Self {
        Self {
            container,
            pending: shifts,
            active: Vec::new(),
            phase: AnimatorPhase::Idle,
            latch: CompletionLatch::new(0),
            completion: None,
            outcome: None,
            events: EventQueue::new(),
        }
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

    /// Shifts still participating (dropped ones excluded once prepared).
    pub fn shift_count(&self) -> usize {
        match self.phase {
            AnimatorPhase::Idle => self.pending.len(),
            _ => self.active.len(),
        }
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = ShiftEvent> + '_ {
        self.events.drain()
    }

    /// Insert every shift's stand-in into the overlay, positioned at its
    /// start appearance. Shifts whose endpoints or stand-in cannot be
    /// produced are dropped here, before anything animates, so a single
    /// stale element never aborts the whole transition.
    pub fn prepare(&mut self, stage: &mut Stage, after_layout: bool) {
        if self.phase != AnimatorPhase::Idle {
            return;
        }
        for shift in std::mem::take(&mut self.pending) {
            let endpoints = match shift.capture_endpoints(stage, self.container) {
                Ok(endpoints) => endpoints,
                Err(err) => {
                    log::warn!("dropping shift `{}`: {err}", shift.identifier());
                    self.events.push(ShiftEvent::Dropped {
                        identifier: shift.identifier().to_owned(),
                    });
                    continue;
                }
            };
            let stand_in = match shift
                .source
                .insert_stand_in(stage, self.container, after_layout)
            {
                Ok(id) => id,
                Err(err) => {
                    log::warn!("dropping shift `{}`: {err}", shift.identifier());
                    self.events.push(ShiftEvent::Dropped {
                        identifier: shift.identifier().to_owned(),
                    });
                    continue;
                }
            };
            self.active.push(ActiveShift::new(shift, stand_in, endpoints));
        }
        self.phase = AnimatorPhase::Preparing;
    }

    /// Begin every shift's interpolation concurrently under one shared
    /// duration. The aggregate `completion` fires exactly once: after the
    /// last shift reports done, or immediately for an empty shift set.
    pub fn animate(
        &mut self,
        stage: &mut Stage,
        duration_ms: f32,
        completion: impl FnOnce(AnimatorOutcome) + Send + 'static,
    ) {
        if self.phase == AnimatorPhase::Idle {
            self.prepare(stage, true);
        }
        if self.phase != AnimatorPhase::Preparing {
            log::warn!("animate called in {:?}; ignoring", self.phase);
            return;
        }

        self.completion = Some(Box::new(completion));
        self.latch = CompletionLatch::new(self.active.len());
        for active in &mut self.active {
            active.begin(duration_ms);
            self.events.push(ShiftEvent::Started {
                identifier: active.identifier().to_owned(),
            });
        }
        self.phase = AnimatorPhase::Animating;

        if self.latch.is_complete() {
            // nothing to animate: complete with zero elapsed time
            self.finish(stage, AnimatorOutcome::Completed);
        }
    }

    /// Advance every running shift by `delta_ms` and write interpolated
    /// appearances onto the stand-ins. Fires the aggregate completion on
    /// the tick the last shift finishes.
    pub fn update(&mut self, stage: &mut Stage, delta_ms: f32) {
        if self.phase != AnimatorPhase::Animating {
            return;
        }

        let mut all_done = false;
        for active in &mut self.active {
            if active.state().is_terminal() {
                continue;
            }
            let still_running = active.update(delta_ms);
            active.apply(stage, self.container);
            if !still_running {
                self.events.push(ShiftEvent::Ended {
                    identifier: active.identifier().to_owned(),
                });
                if self.latch.complete_one() {
                    all_done = true;
                }
            }
        }

        if all_done {
            self.phase = AnimatorPhase::Completed;
            self.finish(stage, AnimatorOutcome::Completed);
        }
    }

    /// Cut every in-flight shift short and tear down. The aggregate
    /// completion reports `Cancelled`; final visual positions are
    /// irrelevant because the host snaps to whichever scene wins.
    pub fn cancel(&mut self, stage: &mut Stage) {
        match self.phase {
            AnimatorPhase::Idle
            | AnimatorPhase::Preparing
            | AnimatorPhase::Animating => {
                for active in &mut self.active {
                    if !active.state().is_terminal() {
                        active.cancel();
                        self.events.push(ShiftEvent::Cancelled {
                            identifier: active.identifier().to_owned(),
                        });
                    }
                }
                self.phase = AnimatorPhase::Cancelled;
                self.finish(stage, AnimatorOutcome::Cancelled);
            }
            _ => {}
        }
    }

    /// Precommit entry point: apply every shift's end appearance to its
    /// source element immediately, with no stand-ins and no animation.
    /// Failing shifts are dropped; the animator is spent afterwards.
    pub fn commit_shifts(&mut self, stage: &mut Stage) {
        if self.phase != AnimatorPhase::Idle {
            return;
        }
        for shift in std::mem::take(&mut self.pending) {
            if let Err(err) = shift.commit(stage, self.container) {
                log::warn!("dropping shift `{}` from commit: {err}", shift.identifier());
                self.events.push(ShiftEvent::Dropped {
                    identifier: shift.identifier().to_owned(),
                });
            }
        }
        self.phase = AnimatorPhase::TornDown;
    }

    fn finish(&mut self, stage: &mut Stage, outcome: AnimatorOutcome) {
        self.teardown(stage);
        self.outcome = Some(outcome);
        if let Some(completion) = self.completion.take() {
            completion(outcome);
        }
    }

    /// Remove every stand-in and restore every live element to visible.
    /// Unconditional and idempotent: a second call finds the phase already
    /// terminal and leaves the stage alone.
    fn teardown(&mut self, stage: &mut Stage) {
        if self.phase == AnimatorPhase::TornDown {
            return;
        }
        for active in &self.active {
            active
                .shift()
                .source
                .remove_stand_in(stage, active.stand_in());
        }
        self.phase = AnimatorPhase::TornDown;
    }
}

static_assertions::assert_impl_all!(ShiftAnimator: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::easing::TimingCurve;
    use crate::animation::timing::TimingContext;
    use crate::shift::coordinator::{DefaultCoordinator, ShiftCoordinator};
    use crate::shift::visual_state::VisualState;
    use segue_core::{Color, Element, Rect};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Fixture {
        stage: Stage,
        container: ElementId,
        src_yellow: ElementId,
        src_orange: ElementId,
        dst_yellow: ElementId,
        dst_orange: ElementId,
    }

    fn fixture() -> Fixture {
        let mut stage = Stage::new();
        let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
        let scene_a = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
        let scene_b = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
        let src_yellow = stage.insert_child(
            scene_a,
            Element::new(Rect::new(0.0, 0.0, 100.0, 100.0))
                .with_background(Color::rgb(1.0, 0.9, 0.2)),
        );
        let src_orange = stage.insert_child(
            scene_a,
            Element::new(Rect::new(0.0, 200.0, 50.0, 50.0))
                .with_background(Color::rgb(1.0, 0.5, 0.1)),
        );
        let dst_yellow = stage.insert_child(
            scene_b,
            Element::new(Rect::new(300.0, 700.0, 40.0, 40.0))
                .with_background(Color::rgb(1.0, 0.9, 0.2)),
        );
        let dst_orange = stage.insert_child(
            scene_b,
            Element::new(Rect::new(100.0, 100.0, 200.0, 200.0))
                .with_background(Color::rgb(1.0, 0.5, 0.1)),
        );
        Fixture {
            stage,
            container,
            src_yellow,
            src_orange,
            dst_yellow,
            dst_orange,
        }
    }

    fn linear() -> TimingContext {
        TimingContext::cubic(TimingCurve::Linear)
    }

    fn shifts_for(f: &Fixture, timing: TimingContext) -> Vec<Shift> {
        let coordinator = DefaultCoordinator::new(timing);
        coordinator.shifts(
            &[
                VisualState::new(f.src_yellow, "yellow"),
                VisualState::new(f.src_orange, "orange"),
            ],
            &[
                VisualState::new(f.dst_yellow, "yellow"),
                VisualState::new(f.dst_orange, "orange"),
            ],
        )
    }

    fn outcome_recorder() -> (Arc<Mutex<Vec<AnimatorOutcome>>>, Arc<AtomicUsize>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicUsize::new(0)))
    }

    #[test]
    fn test_empty_shift_set_completes_immediately_without_mutation() {
        let mut f = fixture();
        let mut animator = ShiftAnimator::new(Vec::new(), f.container);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in = fired.clone();
        let recorded = Arc::new(Mutex::new(Vec::new()));
        let recorded_in = recorded.clone();

        animator.animate(&mut f.stage, 400.0, move |outcome| {
            fired_in.fetch_add(1, Ordering::SeqCst);
            recorded_in.lock().unwrap().push(outcome);
        });

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(recorded.lock().unwrap()[0], AnimatorOutcome::Completed);
        assert!(f.stage.children(f.container).is_empty());
        assert_eq!(animator.phase(), AnimatorPhase::TornDown);
    }

    #[test]
    fn test_full_run_interpolates_and_cleans_up() {
        let mut f = fixture();
        let shifts = shifts_for(&f, linear());
        let mut animator = ShiftAnimator::new(shifts, f.container);
        let (recorded, fired) = outcome_recorder();
        let (r, c) = (recorded.clone(), fired.clone());

        animator.animate(&mut f.stage, 400.0, move |outcome| {
            c.fetch_add(1, Ordering::SeqCst);
            r.lock().unwrap().push(outcome);
        });

        // stand-ins in the overlay, bases hidden
        assert_eq!(f.stage.children(f.container).len(), 2);
        assert!(f.stage.get(f.src_yellow).unwrap().hidden);
        assert!(f.stage.get(f.src_orange).unwrap().hidden);

        // halfway: yellow stand-in between (0,0,100) and (300,700,40)
        animator.update(&mut f.stage, 200.0);
        let stand_in = f.stage.children(f.container)[0];
        let frame = f.stage.get(stand_in).unwrap().frame;
        assert!((frame.x - 150.0).abs() < 1e-2);
        assert!((frame.y - 350.0).abs() < 1e-2);
        assert!((frame.w - 70.0).abs() < 1e-2);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        // run to completion
        animator.update(&mut f.stage, 200.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(recorded.lock().unwrap()[0], AnimatorOutcome::Completed);
        assert!(f.stage.children(f.container).is_empty());
        assert!(!f.stage.get(f.src_yellow).unwrap().hidden);
        assert!(!f.stage.get(f.src_orange).unwrap().hidden);

        // further updates are inert
        animator.update(&mut f.stage, 200.0);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_cancel_mid_flight_tears_down_and_reports_cancelled() {
        let mut f = fixture();
        let shifts = shifts_for(&f, linear());
        let mut animator = ShiftAnimator::new(shifts, f.container);
        let (recorded, fired) = outcome_recorder();
        let (r, c) = (recorded.clone(), fired.clone());

        animator.animate(&mut f.stage, 400.0, move |outcome| {
            c.fetch_add(1, Ordering::SeqCst);
            r.lock().unwrap().push(outcome);
        });
        animator.update(&mut f.stage, 100.0);

        animator.cancel(&mut f.stage);

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(recorded.lock().unwrap()[0], AnimatorOutcome::Cancelled);
        assert!(f.stage.children(f.container).is_empty());
        assert!(!f.stage.get(f.src_yellow).unwrap().hidden);
        assert!(!f.stage.get(f.src_orange).unwrap().hidden);

        // cancelling again is a no-op
        animator.cancel(&mut f.stage);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unreplicable_shift_is_dropped_and_rest_continue() {
        let mut f = fixture();
        // add a zero-size source that cannot snapshot
        let scene_a = f.stage.parent(f.src_yellow).unwrap();
        let ghost_src = f
            .stage
            .insert_child(scene_a, Element::new(Rect::new(0.0, 0.0, 0.0, 0.0)));
        let ghost_dst = f
            .stage
            .insert_child(scene_a, Element::new(Rect::new(5.0, 5.0, 5.0, 5.0)));

        let mut shifts = shifts_for(&f, linear());
        shifts.push(Shift::new(
            VisualState::new(ghost_src, "ghost"),
            VisualState::new(ghost_dst, "ghost"),
            linear(),
        ));

        let mut animator = ShiftAnimator::new(shifts, f.container);
        animator.prepare(&mut f.stage, false);

        assert_eq!(animator.shift_count(), 2);
        let events: Vec<_> = animator.drain_events().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, ShiftEvent::Dropped { identifier } if identifier == "ghost")));
    }

    #[test]
    fn test_windowed_shift_holds_then_moves() {
        let mut f = fixture();
        // yellow shifts only in the second half of the 400ms timeline
        let timing = linear().windowed(0.5, 1.0);
        let shifts = shifts_for(&f, timing);
        let mut animator = ShiftAnimator::new(shifts, f.container);
        animator.animate(&mut f.stage, 400.0, |_| {});

        let stand_in = f.stage.children(f.container)[0];
        let start_frame = f.stage.get(stand_in).unwrap().frame;

        // first half: holding at the start appearance
        animator.update(&mut f.stage, 199.0);
        assert_eq!(f.stage.get(stand_in).unwrap().frame, start_frame);

        // 300ms elapsed = halfway through the window
        animator.update(&mut f.stage, 101.0);
        let frame = f.stage.get(stand_in).unwrap().frame;
        assert!((frame.x - 150.0).abs() < 2.0);

        // 400ms: finished
        animator.update(&mut f.stage, 100.0);
        assert!(animator.is_finished());
    }

    #[test]
    fn test_event_stream_covers_lifecycle() {
        let mut f = fixture();
        let shifts = shifts_for(&f, linear());
        let mut animator = ShiftAnimator::new(shifts, f.container);
        animator.animate(&mut f.stage, 100.0, |_| {});
        animator.update(&mut f.stage, 150.0);

        let events: Vec<_> = animator.drain_events().collect();
        let started = events
            .iter()
            .filter(|e| matches!(e, ShiftEvent::Started { .. }))
            .count();
        let ended = events
            .iter()
            .filter(|e| matches!(e, ShiftEvent::Ended { .. }))
            .count();
        assert_eq!(started, 2);
        assert_eq!(ended, 2);
    }
}
