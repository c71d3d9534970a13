//! Puzzle settings
//!
//! The player-facing knobs. Values are clamped into their supported ranges
//! before they reach the simulation.

use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CANVAS_HEIGHT_RATIO, MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};
use crate::sim::{Bounds, RulesVersion, SimulationConfig, WinRules};

pub const COLOR_COUNT_RANGE: RangeInclusive<usize> = 2..=6;
pub const DOTS_PER_COLOR_RANGE: RangeInclusive<usize> = 3..=20;
pub const SPEED_RANGE: RangeInclusive<f64> = 0.6..=2.0;

/// Upper bound (exclusive) for randomly chosen seeds
const RANDOM_SEED_LIMIT: u32 = 1_000_000_000;

/// Puzzle settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed seed; a fresh random one is drawn per session when unset
    pub seed: Option<u32>,
    pub color_count: usize,
    pub dots_per_color: usize,
    /// Pointer force multiplier
    pub speed: f64,
    /// Which revision of the win rules to play by
    pub rules: RulesVersion,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            color_count: 3,
            dots_per_color: 6,
            speed: 1.0,
            rules: RulesVersion::default(),
        }
    }
}

impl Settings {
    /// Copy with every field inside its supported range
    pub fn clamped(&self) -> Self {
        let speed = if self.speed.is_finite() {
            self.speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
        } else {
            Self::default().speed
        };

        Self {
            seed: self.seed,
            color_count: self
                .color_count
                .clamp(*COLOR_COUNT_RANGE.start(), *COLOR_COUNT_RANGE.end()),
            dots_per_color: self
                .dots_per_color
                .clamp(*DOTS_PER_COLOR_RANGE.start(), *DOTS_PER_COLOR_RANGE.end()),
            speed,
            rules: self.rules,
        }
    }

    /// Explicit seed, or a random one
    pub fn resolve_seed(&self) -> u32 {
        self.seed
            .unwrap_or_else(|| rand::rng().random_range(0..RANDOM_SEED_LIMIT))
    }

    pub fn win_rules(&self) -> WinRules {
        WinRules::for_version(self.rules)
    }

    /// Session config for a canvas of the given size
    pub fn to_config(&self, width: f64, height: f64) -> SimulationConfig {
        let s = self.clamped();
        SimulationConfig {
            color_count: s.color_count,
            dots_per_color: s.dots_per_color,
            bounds: Bounds::new(width, height),
            speed: s.speed,
        }
    }

    /// Parse settings JSON, filling missing fields with defaults
    pub fn try_from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(|s| s.clamped())
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match Self::try_from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Play field size for a viewport, never below the minimum canvas
pub fn canvas_size(viewport_width: f64, viewport_height: f64) -> Bounds {
    Bounds::new(
        viewport_width.max(MIN_CANVAS_WIDTH),
        (viewport_height * CANVAS_HEIGHT_RATIO).max(MIN_CANVAS_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.seed, None);
        assert_eq!(s.color_count, 3);
        assert_eq!(s.dots_per_color, 6);
        assert_eq!(s.speed, 1.0);
        assert_eq!(s.rules, RulesVersion::Adaptive);
        assert_eq!(s.clamped(), s);
    }

    #[test]
    fn test_clamped() {
        let s = Settings {
            seed: Some(5),
            color_count: 12,
            dots_per_color: 1,
            speed: 9.0,
            rules: RulesVersion::Strict,
        }
        .clamped();

        assert_eq!(s.seed, Some(5));
        assert_eq!(s.color_count, 6);
        assert_eq!(s.dots_per_color, 3);
        assert_eq!(s.speed, 2.0);
        assert_eq!(s.rules, RulesVersion::Strict);
    }

    #[test]
    fn test_non_finite_speed() {
        let s = Settings {
            speed: f64::NAN,
            ..Default::default()
        };
        assert_eq!(s.clamped().speed, 1.0);
    }

    #[test]
    fn test_resolve_seed() {
        let fixed = Settings {
            seed: Some(1234),
            ..Default::default()
        };
        assert_eq!(fixed.resolve_seed(), 1234);

        let random = Settings::default().resolve_seed();
        assert!(random < RANDOM_SEED_LIMIT);
    }

    #[test]
    fn test_to_config() {
        let s = Settings {
            color_count: 4,
            dots_per_color: 10,
            speed: 1.5,
            ..Default::default()
        };
        let config = s.to_config(1024.0, 700.0);
        assert_eq!(config.color_count, 4);
        assert_eq!(config.dots_per_color, 10);
        assert_eq!(config.speed, 1.5);
        assert_eq!(config.bounds, Bounds::new(1024.0, 700.0));
    }

    #[test]
    fn test_canvas_size_floor() {
        assert_eq!(canvas_size(320.0, 400.0), Bounds::new(640.0, 480.0));
        assert_eq!(canvas_size(1920.0, 1000.0), Bounds::new(1920.0, 700.0));
    }

    #[test]
    fn test_json() {
        let s = Settings {
            seed: Some(77),
            color_count: 5,
            ..Default::default()
        };
        let json = s.to_json().unwrap();
        assert_eq!(Settings::from_json(&json), s);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"color_count": 2}"#);
        assert_eq!(s.color_count, 2);
        assert_eq!(s.dots_per_color, 6);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn test_malformed_json() {
        assert!(Settings::try_from_json("{ not json").is_err());
        assert_eq!(Settings::from_json("{ not json"), Settings::default());
    }
}
