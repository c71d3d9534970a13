//! Session driver
//!
//! Ties generation, stepping and win detection to the menu/playing/won
//! lifecycle. Time is always supplied by the caller (seconds), so a session
//! replays identically from the same seed and inputs.

use serde::{Deserialize, Serialize};

use super::generate::generate_for;
use super::state::{Dot, PointerState, SessionEvent, SessionStatus, SimulationConfig};
use super::tick::step_with;
use super::win::{WinRules, is_solved_with};
use crate::tuning::PhysicsTuning;

/// Default time the solved condition must hold before the session is won
pub const DEFAULT_STABILIZATION_WINDOW: f64 = 0.05;

/// Debounces the per-frame solved flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinStabilizer {
    /// Seconds the condition must hold continuously
    pub window: f64,
    solved_since: Option<f64>,
}

impl Default for WinStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_STABILIZATION_WINDOW)
    }
}

impl WinStabilizer {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            solved_since: None,
        }
    }

    /// Feed one frame's result; true once it has held for the full window
    pub fn update(&mut self, solved: bool, now: f64) -> bool {
        if !solved {
            self.solved_since = None;
            return false;
        }
        let since = *self.solved_since.get_or_insert(now);
        now - since >= self.window
    }

    pub fn reset(&mut self) {
        self.solved_since = None;
    }

    /// Start of the current solved streak
    pub fn solved_since(&self) -> Option<f64> {
        self.solved_since
    }
}

/// Result of a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameOutcome {
    /// Raw win-detector output this frame
    pub solved: bool,
    /// The session transitioned to `Won` on this frame
    pub won: bool,
}

/// A single puzzle session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    pub dots: Vec<Dot>,
    pub seed: u32,
    pub config: SimulationConfig,
    pub rules: WinRules,
    pub tuning: PhysicsTuning,
    /// Clock start; `None` outside `Playing`
    pub started_at: Option<f64>,
    /// Seconds since start, frozen on win
    pub elapsed: f64,
    pub stabilizer: WinStabilizer,
}

impl Session {
    /// A session sitting in the menu
    pub fn new(config: SimulationConfig, seed: u32) -> Self {
        Self {
            status: SessionStatus::Menu,
            dots: Vec::new(),
            seed,
            config,
            rules: WinRules::default(),
            tuning: PhysicsTuning::default(),
            started_at: None,
            elapsed: 0.0,
            stabilizer: WinStabilizer::default(),
        }
    }

    pub fn with_rules(mut self, rules: WinRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_tuning(mut self, tuning: PhysicsTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_stabilizer(mut self, stabilizer: WinStabilizer) -> Self {
        self.stabilizer = stabilizer;
        self
    }

    /// Create a session and start it immediately
    pub fn start(config: SimulationConfig, seed: u32, now: f64) -> Self {
        let mut session = Self::new(config, seed);
        session.begin(now);
        session
    }

    /// Menu -> Playing. Returns false if not in the menu.
    pub fn begin(&mut self, now: f64) -> bool {
        if !self.transition(SessionEvent::Start) {
            return false;
        }
        self.populate(now);
        log::info!(
            "Session started with seed {} ({} colors x {} dots)",
            self.seed,
            self.config.color_count,
            self.config.dots_per_color
        );
        true
    }

    /// Regenerate from the same seed and restart the clock
    pub fn restart(&mut self, now: f64) -> bool {
        if !self.transition(SessionEvent::Restart) {
            return false;
        }
        self.populate(now);
        log::info!("Session restarted with seed {}", self.seed);
        true
    }

    /// Drop the current dots and go back to settings
    pub fn return_to_menu(&mut self) {
        self.transition(SessionEvent::Menu);
        self.dots.clear();
        self.started_at = None;
        self.elapsed = 0.0;
        self.stabilizer.reset();
    }

    /// Advance one frame; a no-op unless playing
    pub fn frame(&mut self, pointer: &PointerState, now: f64) -> FrameOutcome {
        if self.status != SessionStatus::Playing {
            return FrameOutcome::default();
        }

        self.dots = step_with(
            &self.dots,
            pointer,
            self.config.speed,
            self.config.bounds,
            &self.tuning,
        );
        if let Some(started_at) = self.started_at {
            self.elapsed = now - started_at;
        }

        let solved = is_solved_with(&self.dots, self.config.color_count, &self.rules);
        if solved && self.stabilizer.solved_since().is_none() {
            log::debug!("Solved condition reached at {:.3}s", self.elapsed);
        }

        let won = self.stabilizer.update(solved, now);
        if won {
            self.transition(SessionEvent::Won);
            self.started_at = None;
            log::info!("Puzzle solved in {:.2}s", self.elapsed);
        }

        FrameOutcome { solved, won }
    }

    fn populate(&mut self, now: f64) {
        self.dots = generate_for(&self.config, self.seed);
        self.started_at = Some(now);
        self.elapsed = 0.0;
        self.stabilizer.reset();
    }

    fn transition(&mut self, event: SessionEvent) -> bool {
        match self.status.apply(event) {
            Some(next) => {
                self.status = next;
                true
            }
            None => false,
        }
    }
}
