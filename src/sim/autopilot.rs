//! Scripted pointer for headless runs
//!
//! Herds the worst straggler back toward its color's centroid by hovering
//! just behind it. Not a solver; good enough to drive demos and soak tests.

use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Bounds, Dot, PointerState};
use super::win::{WinRules, cluster_stats};

/// How far behind the target dot the pointer sits
const PUSH_OFFSET: f64 = 20.0;
/// Random wobble added to the pointer so herding does not lock into loops
const JITTER: f64 = 4.0;

/// Deterministic pointer driver
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Pointer for the next frame
    pub fn steer(&mut self, dots: &[Dot], color_count: usize, bounds: Bounds) -> PointerState {
        let stats = cluster_stats(dots, color_count, &WinRules::default());

        let target = dots
            .iter()
            .filter_map(|d| {
                let c = stats.get(d.color)?;
                Some((d, c.centroid, d.pos.distance(c.centroid)))
            })
            .max_by(|a, b| a.2.total_cmp(&b.2));

        let Some((dot, centroid, _)) = target else {
            return PointerState::at(bounds.width * 2.0, bounds.height * 2.0);
        };

        let away = (dot.pos - centroid).normalize_or_zero();
        let jitter = DVec2::new(
            self.rng.random_range(-JITTER..=JITTER),
            self.rng.random_range(-JITTER..=JITTER),
        );
        let pos = dot.pos + away * PUSH_OFFSET + jitter;
        PointerState::pressed_at(pos.x, pos.y)
    }
}
