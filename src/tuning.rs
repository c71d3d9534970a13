//! Data-driven physics balance
//!
//! Keep this separate from session configuration (colors, dot counts).

use serde::{Deserialize, Serialize};

use crate::consts::DOT_RADIUS;

/// Constants for the per-frame stepper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsTuning {
    /// Dot radius used for walls and spacing
    pub dot_radius: f64,
    /// Pointer influence radius
    pub pointer_radius: f64,
    /// Impulse at the pointer centre before the speed multiplier
    pub pointer_force: f64,
    /// Only repel while the pointer is pressed
    pub require_press: bool,

    /// Per-frame velocity damping
    pub friction: f64,
    /// Speed cap in units per frame
    pub max_speed: f64,
    /// Velocity kept (and inverted) on a wall hit
    pub wall_restitution: f64,

    /// Extra clearance between dots
    pub padding: f64,
    /// Relaxation passes over all pairs per frame
    pub separation_iterations: u32,
    /// Share of the overlap resolved per pass
    pub separation_force: f64,
    /// Damping of the normal velocity exchange between touching dots
    pub exchange_damping: f64,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            dot_radius: DOT_RADIUS,
            pointer_radius: 48.0,
            pointer_force: 0.2,
            require_press: false,

            friction: 0.99,
            max_speed: 3.2,
            wall_restitution: 0.21,

            padding: 2.0,
            separation_iterations: 2,
            separation_force: 0.6,
            exchange_damping: 0.3,
        }
    }
}

impl PhysicsTuning {
    /// Centre distance below which two dots are pushed apart
    pub fn min_separation(&self) -> f64 {
        2.0 * self.dot_radius + self.padding
    }
}
