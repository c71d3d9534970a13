//! Deterministic simulation module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - One step per frame, unit timestep
//! - Seeded RNG only
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod generate;
pub mod rng;
pub mod session;
pub mod state;
pub mod tick;
pub mod win;

pub use autopilot::Autopilot;
pub use generate::{generate_dots, generate_for};
pub use rng::Mulberry32;
pub use session::{FrameOutcome, Session, WinStabilizer};
pub use state::{Bounds, Dot, DotId, PointerState, SessionEvent, SessionStatus, SimulationConfig};
pub use tick::{step, step_with};
pub use win::{
    ClusterStat, OutlierReference, RulesVersion, WinRules, cluster_stats, is_solved,
    is_solved_with, percentile,
};
