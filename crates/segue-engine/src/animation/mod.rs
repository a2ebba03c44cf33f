//! Timing and interpolation primitives for the transition engine.
//!
//! ```text
//! TimingContext (cubic curve + relative window | spring parameters)
//!   └── TimingDriver (per-animation runtime: elapsed/progress)
//!         └── Interpolate (applies progress to appearances)
//! ```

pub mod easing;
pub mod events;
pub mod interpolate;
pub mod spring;
pub mod timing;

pub use easing::TimingCurve;
pub use events::{CompletionLatch, EventQueue, ShiftEvent};
pub use interpolate::Interpolate;
pub use spring::{SpringSimulation, SpringTimingParameters};
pub use timing::{PlaybackState, TimingContext, TimingDriver};
