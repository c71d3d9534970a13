//! Per-frame simulation step
//!
//! Advances every dot by one unit timestep. Pure: the input slice is never
//! mutated and the same inputs always produce the same output.

use glam::DVec2;

use super::state::{Bounds, Dot, PointerState};
use crate::tuning::PhysicsTuning;

/// Advance `dots` by one frame with default tuning
pub fn step(dots: &[Dot], pointer: &PointerState, speed: f64, bounds: Bounds) -> Vec<Dot> {
    step_with(dots, pointer, speed, bounds, &PhysicsTuning::default())
}

/// Advance `dots` by one frame
///
/// Each dot is moved independently first (pointer, integration, speed cap,
/// friction, walls), then overlapping pairs are relaxed.
pub fn step_with(
    dots: &[Dot],
    pointer: &PointerState,
    speed: f64,
    bounds: Bounds,
    tuning: &PhysicsTuning,
) -> Vec<Dot> {
    let repel = !tuning.require_press || pointer.pressed;

    let mut next: Vec<Dot> = dots
        .iter()
        .map(|dot| {
            let mut dot = dot.clone();
            if repel {
                apply_pointer(&mut dot, pointer.pos, speed, tuning);
            }
            integrate(&mut dot, tuning);
            resolve_walls(&mut dot, bounds, tuning);
            dot
        })
        .collect();

    separate(&mut next, tuning);
    next
}

/// Push the dot away from the pointer, stronger near the centre
fn apply_pointer(dot: &mut Dot, pointer: DVec2, speed: f64, tuning: &PhysicsTuning) {
    let delta = dot.pos - pointer;
    let dist = delta.length();
    if dist >= tuning.pointer_radius {
        return;
    }

    let k = ((tuning.pointer_radius - dist) / tuning.pointer_radius) * tuning.pointer_force * speed;
    // Pointer exactly on the centre has no direction
    let normal = if dist > 0.0 { delta / dist } else { DVec2::ZERO };
    dot.vel += normal * k;
}

/// Euler step, then speed cap and friction
fn integrate(dot: &mut Dot, tuning: &PhysicsTuning) {
    dot.pos += dot.vel;

    let sp = dot.vel.length();
    if sp > tuning.max_speed {
        dot.vel *= tuning.max_speed / sp;
    }

    dot.vel *= tuning.friction;
}

/// Clamp into the field and bounce inelastically off each wall
fn resolve_walls(dot: &mut Dot, bounds: Bounds, tuning: &PhysicsTuning) {
    let r = tuning.dot_radius;

    if dot.pos.x < r {
        dot.pos.x = r;
        dot.vel.x *= -tuning.wall_restitution;
    }
    if dot.pos.y < r {
        dot.pos.y = r;
        dot.vel.y *= -tuning.wall_restitution;
    }
    if dot.pos.x > bounds.width - r {
        dot.pos.x = bounds.width - r;
        dot.vel.x *= -tuning.wall_restitution;
    }
    if dot.pos.y > bounds.height - r {
        dot.pos.y = bounds.height - r;
        dot.vel.y *= -tuning.wall_restitution;
    }
}

/// Iterative pairwise relaxation
///
/// O(n^2) per pass over pairs `i < j` in generation order. Fine for the
/// tens of dots a puzzle uses; a spatial grid would be needed far beyond
/// that, and would change the pair order.
fn separate(dots: &mut [Dot], tuning: &PhysicsTuning) {
    let min_dist = tuning.min_separation();

    for _ in 0..tuning.separation_iterations {
        for i in 0..dots.len() {
            for j in (i + 1)..dots.len() {
                let (head, tail) = dots.split_at_mut(j);
                resolve_pair(&mut head[i], &mut tail[0], min_dist, tuning);
            }
        }
    }
}

fn resolve_pair(a: &mut Dot, b: &mut Dot, min_dist: f64, tuning: &PhysicsTuning) {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist >= min_dist {
        return;
    }

    // Coincident dots split along +x
    let normal = if dist > 0.0 { delta / dist } else { DVec2::X };
    let overlap = min_dist - dist;
    let push = overlap * 0.5 * tuning.separation_force;

    a.pos -= normal * push;
    b.pos += normal * push;

    let avn = a.vel.dot(normal);
    let bvn = b.vel.dot(normal);
    let imp = (bvn - avn) * 0.5 * tuning.exchange_damping;
    a.vel += normal * imp;
    b.vel -= normal * imp;
}
