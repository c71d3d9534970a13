//! Initial dot scatter
//!
//! RNG consumption order is part of the contract: color-major, then
//! index-major, exactly four draws per dot (x, y, vx, vy).

use glam::DVec2;

use super::rng::Mulberry32;
use super::state::{Dot, DotId, SimulationConfig};
use crate::consts::{SPAWN_MARGIN, SPAWN_MAX_SPEED};

/// Scatter `color_count * per_color` dots inside the margin-inset canvas
///
/// A canvas smaller than twice the margin collapses the spawn area to a
/// point at `(margin, margin)` rather than failing.
pub fn generate_dots(
    seed: u32,
    color_count: usize,
    per_color: usize,
    width: f64,
    height: f64,
) -> Vec<Dot> {
    let mut rng = Mulberry32::new(seed);
    let area_w = (width - SPAWN_MARGIN * 2.0).max(0.0);
    let area_h = (height - SPAWN_MARGIN * 2.0).max(0.0);

    let mut dots = Vec::with_capacity(color_count * per_color);
    let mut next_id = 0u32;
    for color in 0..color_count {
        for _ in 0..per_color {
            let x = SPAWN_MARGIN + rng.next_f64() * area_w;
            let y = SPAWN_MARGIN + rng.next_f64() * area_h;
            let vx = (rng.next_f64() * 2.0 - 1.0) * SPAWN_MAX_SPEED;
            let vy = (rng.next_f64() * 2.0 - 1.0) * SPAWN_MAX_SPEED;

            dots.push(Dot::new(
                DotId(next_id),
                color,
                DVec2::new(x, y),
                DVec2::new(vx, vy),
            ));
            next_id += 1;
        }
    }

    log::debug!(
        "Generated {} dots (seed {}, {} colors x {})",
        dots.len(),
        seed,
        color_count,
        per_color
    );
    dots
}

/// Generate the population for a session config
pub fn generate_for(config: &SimulationConfig, seed: u32) -> Vec<Dot> {
    generate_dots(
        seed,
        config.color_count,
        config.dots_per_color,
        config.bounds.width,
        config.bounds.height,
    )
}
