//! Drives one full shift transition on a synthetic stage and logs the
//! choreography, stepping the clock manually at 60fps.
//!
//! Two scenes share a `yellow` and an `orange` element; the destination
//! adds a `purple` element that only performs an entrance action. Run with
//! `--precommit` for the commit-then-slide flavor, `--spring` for spring
//! timing on the shifts.

use anyhow::Result;
use segue_core::{Color, Element, ElementId, Rect, Stage};
use segue_engine::{
    Action, DefaultCoordinator, ElementActions, PrecommitTransition, ShiftTransition,
    ShiftTransitionable, SpringTimingParameters, TimingContext, TimingCurve, TransitionContext,
    VisualState,
};

const FRAME_MS: f32 = 1000.0 / 60.0;

struct SceneA {
    root: ElementId,
    yellow: ElementId,
    orange: ElementId,
    button: ElementId,
}

struct SceneB {
    root: ElementId,
    yellow: ElementId,
    orange: ElementId,
    purple: ElementId,
}

impl SceneA {
    fn build(stage: &mut Stage) -> Self {
        let root = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
        let yellow = stage.insert_child(
            root,
            Element::new(Rect::new(20.0, 60.0, 120.0, 120.0))
                .with_background(Color::from_rgb_u8(250, 220, 60))
                .with_corner_radius(12.0),
        );
        let orange = stage.insert_child(
            root,
            Element::new(Rect::new(260.0, 60.0, 80.0, 80.0))
                .with_background(Color::from_rgb_u8(245, 140, 30)),
        );
        let button = stage.insert_child(
            root,
            Element::new(Rect::new(150.0, 700.0, 100.0, 44.0))
                .with_background(Color::from_rgb_u8(60, 60, 60)),
        );
        Self {
            root,
            yellow,
            orange,
            button,
        }
    }
}

impl SceneB {
    fn build(stage: &mut Stage) -> Self {
        let root = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
        let yellow = stage.insert_child(
            root,
            Element::new(Rect::new(140.0, 600.0, 60.0, 60.0))
                .with_background(Color::from_rgb_u8(250, 220, 60))
                .with_corner_radius(30.0),
        );
        let orange = stage.insert_child(
            root,
            Element::new(Rect::new(40.0, 300.0, 200.0, 200.0))
                .with_background(Color::from_rgb_u8(245, 140, 30)),
        );
        let purple = stage.insert_child(
            root,
            Element::new(Rect::new(300.0, 40.0, 60.0, 60.0))
                .with_background(Color::from_rgb_u8(150, 60, 200)),
        );
        Self {
            root,
            yellow,
            orange,
            purple,
        }
    }
}

impl ShiftTransitionable for SceneA {
    fn root(&self) -> ElementId {
        self.root
    }

    fn shift_states(&self, _stage: &Stage) -> Vec<VisualState> {
        vec![
            VisualState::new(self.yellow, "yellow"),
            VisualState::new(self.orange, "orange"),
        ]
    }

    fn action_sets(&self, _stage: &Stage) -> Vec<ElementActions> {
        // the button slides down and fades out as the scene departs
        vec![ElementActions::new(
            self.button,
            vec![
                Action::TranslateBy { dx: 0.0, dy: 50.0 },
                Action::FadeTo { opacity: 0.0 },
            ],
        )]
    }
}

impl ShiftTransitionable for SceneB {
    fn root(&self) -> ElementId {
        self.root
    }

    fn shift_states(&self, _stage: &Stage) -> Vec<VisualState> {
        vec![
            VisualState::new(self.yellow, "yellow"),
            VisualState::new(self.orange, "orange"),
        ]
    }

    fn action_sets(&self, _stage: &Stage) -> Vec<ElementActions> {
        // purple fades in from nothing as the scene arrives
        vec![ElementActions::new(
            self.purple,
            vec![Action::FadeTo { opacity: 0.0 }],
        )]
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let precommit = std::env::args().any(|a| a == "--precommit");
    let spring = std::env::args().any(|a| a == "--spring");

    let mut stage = Stage::new();
    let container = stage.insert(Element::new(Rect::new(0.0, 0.0, 400.0, 800.0)));
    let source = SceneA::build(&mut stage);
    let destination = SceneB::build(&mut stage);

    let timing = if spring {
        TimingContext::spring(SpringTimingParameters::gentle())
    } else {
        TimingContext::cubic(TimingCurve::EaseInOut)
    };
    let coordinator = DefaultCoordinator::new(timing);
    let context = TransitionContext::new(container, Rect::new(0.0, 0.0, 400.0, 800.0), 400.0);

    if precommit {
        run_precommit(&mut stage, &context, &source, &destination, &coordinator)
    } else {
        run_shift(&mut stage, &context, &source, &destination, &coordinator)
    }
}

fn run_shift(
    stage: &mut Stage,
    context: &TransitionContext,
    source: &SceneA,
    destination: &SceneB,
    coordinator: &DefaultCoordinator,
) -> Result<()> {
    log::info!("starting shift transition ({}ms)", context.duration_ms);
    let mut transition = ShiftTransition::begin(
        stage,
        context,
        source,
        destination,
        coordinator,
        |outcome| log::info!("transition finished: {outcome:?}"),
    )?;
    log::info!("{} shift(s) matched", transition.shift_count());

    let mut elapsed = 0.0f32;
    while !transition.is_finished() {
        transition.update(stage, FRAME_MS);
        elapsed += FRAME_MS;
        for event in transition.drain_shift_events() {
            log::info!("[{elapsed:6.1}ms] {event:?}");
        }
        if let Some(yellow) = stage.frame_in(source.yellow, context.container) {
            log::debug!("[{elapsed:6.1}ms] yellow at {yellow:?}");
        }
    }

    log::info!(
        "purple arrived at opacity {}",
        stage
            .get(destination.purple)
            .map(|e| e.opacity)
            .unwrap_or_default()
    );
    Ok(())
}

fn run_precommit(
    stage: &mut Stage,
    context: &TransitionContext,
    source: &SceneA,
    destination: &SceneB,
    coordinator: &DefaultCoordinator,
) -> Result<()> {
    log::info!("starting precommit transition ({}ms)", context.duration_ms);
    let mut transition = PrecommitTransition::begin(
        stage,
        context,
        source,
        destination,
        coordinator,
        |outcome| log::info!("transition finished: {outcome:?}"),
    )?;

    let mut elapsed = 0.0f32;
    while !transition.is_finished() {
        transition.update(stage, FRAME_MS);
        elapsed += FRAME_MS;
        if let Some(root) = stage.get(destination.root) {
            log::debug!("[{elapsed:6.1}ms] incoming root at y={}", root.frame.y);
        }
    }
    Ok(())
}
