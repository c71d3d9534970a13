//! Dot Sort - headless runner
//!
//! Plays a session with the autopilot pointer and logs progress. The
//! interactive front end embeds the library instead.
//!
//! Usage: `dot-sort [seed] [settings.json]`

use dot_sort::consts::FRAME_RATE;
use dot_sort::settings::canvas_size;
use dot_sort::sim::{Autopilot, Session, SessionStatus, cluster_stats};
use dot_sort::Settings;

/// Give up after this many frames (five minutes at 60 Hz)
const MAX_FRAMES: u64 = 5 * 60 * 60;
/// Progress log interval in frames
const REPORT_EVERY: u64 = 600;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dot Sort (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed_arg = args.next().and_then(|s| match s.parse::<u32>() {
        Ok(seed) => Some(seed),
        Err(_) => {
            log::warn!("Ignoring invalid seed '{}'", s);
            None
        }
    });

    let mut settings = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    if seed_arg.is_some() {
        settings.seed = seed_arg;
    }

    let settings = settings.clamped();
    let seed = settings.resolve_seed();
    let bounds = canvas_size(1280.0, 1000.0);
    let config = settings.to_config(bounds.width, bounds.height);

    let mut session = Session::new(config, seed).with_rules(settings.win_rules());
    session.begin(0.0);
    let mut pilot = Autopilot::new(u64::from(seed));

    for frame in 1..=MAX_FRAMES {
        let now = frame as f64 / FRAME_RATE;
        let pointer = pilot.steer(&session.dots, config.color_count, bounds);
        session.frame(&pointer, now);

        if session.status == SessionStatus::Won {
            break;
        }

        if frame % REPORT_EVERY == 0 {
            let stats = cluster_stats(&session.dots, config.color_count, &session.rules);
            let worst = stats.iter().map(|c| c.radius).fold(0.0, f64::max);
            let outliers: usize = stats.iter().map(|c| c.outliers).sum();
            log::info!(
                "t={:.0}s widest cluster r={:.1}, outliers={}",
                session.elapsed,
                worst,
                outliers
            );
        }
    }

    match session.status {
        SessionStatus::Won => println!(
            "Seed {}: sorted {} dots in {:.2}s",
            seed,
            session.dots.len(),
            session.elapsed
        ),
        _ => println!(
            "Seed {}: not sorted after {:.0}s",
            seed, session.elapsed
        ),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web front end links the library directly
}
