//! Simulation entity and input types
//!
//! Everything a frame reads or writes lives here. The front end owns the
//! values; the simulation only receives and returns them.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Stable identity of a dot within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DotId(pub u32);

/// A simulated dot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dot {
    pub id: DotId,
    /// Color index into the session's active palette
    pub color: usize,
    pub pos: DVec2,
    /// Velocity in canvas units per frame
    pub vel: DVec2,
}

impl Dot {
    pub fn new(id: DotId, color: usize, pos: DVec2, vel: DVec2) -> Self {
        Self { id, color, pos, vel }
    }

    /// A dot at rest
    pub fn at_rest(id: u32, color: usize, x: f64, y: f64) -> Self {
        Self::new(DotId(id), color, DVec2::new(x, y), DVec2::ZERO)
    }

    pub fn speed(&self) -> f64 {
        self.vel.length()
    }
}

/// Canvas extents; the play field spans `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Pointer snapshot for a single frame
///
/// Sampled once by the input layer and passed by value into the stepper,
/// so x and y always come from the same event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub pos: DVec2,
    pub pressed: bool,
}

impl PointerState {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            pressed: false,
        }
    }

    pub fn pressed_at(x: f64, y: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            pressed: true,
        }
    }
}

/// Immutable per-session parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of colors (at least 2)
    pub color_count: usize,
    /// Dots per color (at least 1)
    pub dots_per_color: usize,
    pub bounds: Bounds,
    /// Pointer force multiplier
    pub speed: f64,
}

impl SimulationConfig {
    /// Population size for the whole session
    pub fn dot_count(&self) -> usize {
        self.color_count * self.dots_per_color
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Settings screen, no simulation running
    #[default]
    Menu,
    /// Dots are live and the clock is running
    Playing,
    /// Solved; clock frozen until restart or menu
    Won,
}

/// Events that move a session between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Begin a new session from the menu
    Start,
    /// Win detector held true for the stabilization window
    Won,
    /// Regenerate with the same seed
    Restart,
    /// Back to settings
    Menu,
}

impl SessionStatus {
    /// Status after `event`, or `None` if the event is not valid here
    pub fn apply(self, event: SessionEvent) -> Option<SessionStatus> {
        use SessionEvent as E;
        use SessionStatus as S;

        match (self, event) {
            (S::Menu, E::Start) => Some(S::Playing),
            (S::Playing, E::Won) => Some(S::Won),
            (S::Playing | S::Won, E::Restart) => Some(S::Playing),
            (_, E::Menu) => Some(S::Menu),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Menu => "menu",
            SessionStatus::Playing => "playing",
            SessionStatus::Won => "won",
        }
    }
}
