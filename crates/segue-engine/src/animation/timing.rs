//! Timing contexts: how one animation's progress maps onto the transition
//! timeline.
//!
//! Two flavors:
//!
//! - **Cubic**: a bezier curve plus an optional relative window inside the
//!   overall duration, both ends expressed as fractions in [0, 1]. Windows
//!   let several shifts or actions stagger inside one transition.
//! - **Spring**: physical parameters; starts immediately and settles on its
//!   own schedule, ignoring the configured duration.
//!
//! Windowing is a cubic-only feature. Asking a spring context for a window
//! silently leaves it unwindowed and running the full timeline; a known
//! platform limitation, not an error.

use serde::{Deserialize, Serialize};

use super::easing::TimingCurve;
use super::spring::{SpringSimulation, SpringTimingParameters};

/// Immutable description of how property mutations are scheduled on the
/// transition timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimingContext {
    Cubic {
        curve: TimingCurve,
        /// Fraction of the overall duration at which mutation begins.
        relative_start: f32,
        /// Fraction of the overall duration at which mutation ends.
        relative_end: f32,
    },
    Spring { parameters: SpringTimingParameters },
}

impl Default for TimingContext {
    fn default() -> Self {
        Self::cubic(TimingCurve::EaseInOut)
    }
}

impl TimingContext {
    /// A cubic context occupying the full transition duration.
    pub fn cubic(curve: TimingCurve) -> Self {
        Self::Cubic {
            curve,
            relative_start: 0.0,
            relative_end: 1.0,
        }
    }

    /// A spring context.
    pub fn spring(parameters: SpringTimingParameters) -> Self {
        Self::Spring { parameters }
    }

    /// Restrict a cubic context to a sub-window of the overall duration.
    ///
    /// On a spring context this is a no-op (springs do not window); the
    /// animation degrades silently to an immediate, full-duration run.
    ///
    /// # Panics
    /// Panics unless `0 <= start <= end <= 1`.
    pub fn windowed(self, relative_start: f32, relative_end: f32) -> Self {
        assert!(
            (0.0..=1.0).contains(&relative_start)
                && (0.0..=1.0).contains(&relative_end)
                && relative_start <= relative_end,
            "relative window must satisfy 0 <= start <= end <= 1"
        );
        match self {
            Self::Cubic { curve, .. } => Self::Cubic {
                curve,
                relative_start,
                relative_end,
            },
            Self::Spring { .. } => {
                log::warn!("relative windowing is unsupported for spring timing; ignoring");
                self
            }
        }
    }

    pub fn is_spring(&self) -> bool {
        matches!(self, Self::Spring { .. })
    }

    /// Resolve this context against an overall duration into a runtime
    /// driver.
    pub fn driver(&self, total_duration_ms: f32) -> TimingDriver {
        match *self {
            Self::Cubic {
                curve,
                relative_start,
                relative_end,
            } => TimingDriver::Curve {
                curve,
                delay_ms: relative_start * total_duration_ms,
                duration_ms: (relative_end - relative_start) * total_duration_ms,
                elapsed_ms: 0.0,
            },
            Self::Spring { parameters } => TimingDriver::Spring {
                simulation: SpringSimulation::unit(parameters),
            },
        }
    }
}

/// Where an animation is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Running,
    Finished,
    Cancelled,
}

impl PlaybackState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Cancelled)
    }
}

/// Runtime progress source for one animation.
#[derive(Debug, Clone)]
pub enum TimingDriver {
    Curve {
        curve: TimingCurve,
        delay_ms: f32,
        duration_ms: f32,
        elapsed_ms: f32,
    },
    Spring { simulation: SpringSimulation },
}

impl TimingDriver {
    /// Advance by `delta_ms`. Returns `true` while still running.
    pub fn advance(&mut self, delta_ms: f32) -> bool {
        match self {
            Self::Curve {
                delay_ms,
                duration_ms,
                elapsed_ms,
                ..
            } => {
                *elapsed_ms += delta_ms;
                *elapsed_ms < *delay_ms + *duration_ms
            }
            Self::Spring { simulation } => {
                simulation.step(delta_ms / 1000.0);
                !simulation.is_settled()
            }
        }
    }

    /// Current eased progress. Zero until a windowed curve's delay has
    /// elapsed; springs may exceed 1.0 while overshooting.
    pub fn progress(&self) -> f32 {
        match self {
            Self::Curve {
                curve,
                delay_ms,
                duration_ms,
                elapsed_ms,
            } => {
                let active = (elapsed_ms - delay_ms).max(0.0);
                let linear = if *duration_ms > 0.0 {
                    (active / duration_ms).clamp(0.0, 1.0)
                } else if *elapsed_ms >= *delay_ms {
                    1.0
                } else {
                    0.0
                };
                curve.evaluate(linear)
            }
            Self::Spring { simulation } => simulation.value(),
        }
    }

    /// Whether mutation has begun (a windowed curve holds at its start
    /// appearance until its delay elapses).
    pub fn has_begun(&self) -> bool {
        match self {
            Self::Curve {
                delay_ms,
                elapsed_ms,
                ..
            } => elapsed_ms >= delay_ms,
            Self::Spring { .. } => true,
        }
    }

    /// Jump to the end state.
    pub fn finish(&mut self) {
        match self {
            Self::Curve {
                delay_ms,
                duration_ms,
                elapsed_ms,
                ..
            } => *elapsed_ms = *delay_ms + *duration_ms,
            Self::Spring { simulation } => simulation.finish(),
        }
    }
}
