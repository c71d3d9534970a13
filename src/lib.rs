//! Dot Sort - a color-sorting particle puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, physics, win detection, session)
//! - `tuning`: Data-driven physics constants
//! - `settings`: Player-facing configuration surface
//!
//! Rendering, input capture and palettes belong to the embedding front end.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::PhysicsTuning;

/// Simulation constants
pub mod consts {
    /// Dot radius in canvas units
    pub const DOT_RADIUS: f64 = 8.0;
    /// Distance kept clear of every canvas edge when scattering dots
    pub const SPAWN_MARGIN: f64 = 80.0;
    /// Maximum initial speed per velocity component
    pub const SPAWN_MAX_SPEED: f64 = 0.2;

    /// Smallest canvas the front end should hand to the generator
    pub const MIN_CANVAS_WIDTH: f64 = 640.0;
    pub const MIN_CANVAS_HEIGHT: f64 = 480.0;
    /// Share of the viewport height given to the play field
    pub const CANVAS_HEIGHT_RATIO: f64 = 0.7;

    /// Frame rate assumed by the headless runner (one step per frame)
    pub const FRAME_RATE: f64 = 60.0;
}
