//! Spring timing: RK4-integrated damped spring driving animation progress.
//!
//! A spring context has no fixed duration; the animation runs until the
//! spring settles. Progress is simulated in the unit domain (0 at rest,
//! 1 at target) and may overshoot past 1 for underdamped parameters.

use serde::{Deserialize, Serialize};

/// Physical parameters of a spring timing context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringTimingParameters {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringTimingParameters {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// A soft spring with visible overshoot, suited to large shared elements.
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A tight spring with minimal overshoot, suited to small controls.
    pub fn snappy() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Damping at which the spring stops oscillating fastest.
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Underdamped springs overshoot their target before settling.
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringTimingParameters {
    fn default() -> Self {
        Self::snappy()
    }
}

/// Runtime state of one spring-driven progress value.
#[derive(Debug, Clone, Copy)]
pub struct SpringSimulation {
    params: SpringTimingParameters,
    value: f32,
    velocity: f32,
    target: f32,
}

// Settling thresholds in the unit progress domain: within 0.1% of target
// and nearly at rest reads as finished.
const SETTLE_EPSILON: f32 = 0.001;
const SETTLE_VELOCITY: f32 = 0.01;

impl SpringSimulation {
    /// A spring at `initial`, heading for `target`.
    pub fn new(params: SpringTimingParameters, initial: f32, target: f32) -> Self {
        Self {
            params,
            value: initial,
            velocity: 0.0,
            target,
        }
    }

    /// A spring driving progress from 0 to 1.
    pub fn unit(params: SpringTimingParameters) -> Self {
        Self::new(params, 0.0, 1.0)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < SETTLE_EPSILON
            && self.velocity.abs() < SETTLE_VELOCITY
    }

    /// Advance the simulation by `dt` seconds using RK4 integration.
    ///
    /// Snaps exactly to the target once settled so downstream interpolation
    /// lands on the end value.
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    /// Jump straight to the settled state.
    pub fn finish(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.params.stiffness * (x - self.target);
        let damping_force = -self.params.damping * v;
        (spring_force + damping_force) / self.params.mass
    }
}
