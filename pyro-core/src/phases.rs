//! High-level operations for the firework system.
//!
//! The typical frame looks like:
//! 1. [`spawn_firework`]: on a point-input event, launch one (sometimes
//!    two) rockets toward a target apex.
//! 2. [`step_phase`]: once per display refresh, integrate every particle,
//!    explode finished rockets into spark rings and emit glitter children.
//! 3. [`crate::render::render_phase`]: draw the store into a surface.
//!
//! All randomness flows through the caller's RNG, so tests can drive the
//! system with a seeded generator.

use glam::Vec2;
use rand::Rng;
use std::f32::consts::TAU;

use crate::{
    color::{self, Palette, Rgb},
    config::Config,
    particle::{Particle, Rocket, Spark},
    store::ParticleStore,
};

/// Sparks in the wide outer ring of an explosion.
const OUTER_SPARKS: usize = 140;
/// Sparks in the tight inner ring.
const INNER_SPARKS: usize = 45;
/// Chance that an outer-ring spark carries the glitter flag.
const GLITTER_CHANCE: f64 = 0.25;
/// Per-frame chance that a glitter spark emits one child.
const GLITTER_RATE: f64 = 0.18;

/// Counters reported by [`step_phase`] for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Rockets that reached a terminal condition and burst this frame.
    pub explosions: u32,
    /// Sparks removed after their normalized age reached 1.
    pub expired_sparks: u32,
    /// Glitter children emitted this frame.
    pub glitter_children: u32,
}

/// Launches a firework at the given point.
///
/// Picks a random palette and appends one rocket with a randomized upward
/// velocity, horizontal drift and target apex. With probability
/// `cfg.twin_chance` a second, slightly offset rocket sharing the palette
/// is appended as well (a double burst).
///
/// Non-finite coordinates are dropped, and launches are dropped while the
/// store is at `cfg.max_particles`.
pub fn spawn_firework(store: &mut ParticleStore, cfg: &Config, at: Vec2, rng: &mut impl Rng) {
    if !at.is_finite() {
        return;
    }
    if store.len() >= cfg.max_particles {
        return;
    }

    let palette = color::random_palette(rng);

    let vel = Vec2::new(
        rng.random_range(-cfg.launch_drift..=cfg.launch_drift),
        -(cfg.launch_speed + rng.random::<f32>() * cfg.launch_speed_jitter),
    );
    let apex = (at.y - (cfg.apex_rise + rng.random::<f32>() * cfg.apex_rise_jitter))
        .max(cfg.apex_floor);
    store.particles.push(Particle::Rocket(Rocket::launch(
        at,
        vel,
        apex,
        palette,
        cfg.rocket_lifetime,
    )));

    // Occasional twin, offset sideways with a wilder launch, same palette.
    if rng.random_bool(cfg.twin_chance) {
        let offset = Vec2::new(rng.random_range(-70.0..=70.0), 0.0);
        let vel = Vec2::new(
            rng.random_range(-35.0..=35.0),
            -(480.0 + rng.random::<f32>() * 260.0),
        );
        let apex = (at.y - (160.0 + rng.random::<f32>() * 280.0)).max(cfg.apex_floor);
        store.particles.push(Particle::Rocket(Rocket::launch(
            at + offset,
            vel,
            apex,
            palette,
            cfg.rocket_lifetime,
        )));
    }
}

/// Bursts at a point, appending exactly 140 outer plus 45 inner sparks.
///
/// The outer ring spreads fast glittery sparks over jittered evenly-spaced
/// angles; the inner ring is slower, brighter and short-lived. Spark colors
/// are drawn uniformly from the palette.
pub fn explode(store: &mut ParticleStore, at: Vec2, palette: Palette, rng: &mut impl Rng) {
    explode_into(&mut store.particles, at, palette, rng);
}

fn explode_into(out: &mut Vec<Particle>, at: Vec2, palette: Palette, rng: &mut impl Rng) {
    for i in 0..OUTER_SPARKS {
        let angle = TAU * i as f32 / OUTER_SPARKS as f32 + rng.random_range(-0.05..0.05);
        let speed = rng.random_range(180.0..440.0);
        out.push(Particle::Spark(Spark {
            pos: at,
            prev: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            gravity: 520.0,
            drag: 0.986 - rng.random::<f32>() * 0.008,
            ttl: rng.random_range(1.8..2.7),
            life: 0.0,
            width: rng.random_range(1.0..2.8),
            color: palette[rng.random_range(0..palette.len())],
            glow: rng.random_range(1.2..2.7),
            glitter: rng.random_bool(GLITTER_CHANCE),
        }));
    }

    for i in 0..INNER_SPARKS {
        let angle = TAU * i as f32 / INNER_SPARKS as f32;
        let speed = rng.random_range(80.0..210.0);
        out.push(Particle::Spark(Spark {
            pos: at,
            prev: at,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            gravity: 400.0,
            drag: 0.975,
            ttl: rng.random_range(1.0..1.5),
            life: 0.0,
            width: rng.random_range(1.3..3.2),
            color: palette[rng.random_range(0..palette.len())],
            glow: rng.random_range(1.7..3.9),
            glitter: false,
        }));
    }
}

fn glitter_child(at: Vec2, color: Rgb, rng: &mut impl Rng) -> Particle {
    Particle::Spark(Spark {
        pos: at,
        prev: at,
        vel: Vec2::new(
            rng.random_range(-60.0..=60.0),
            rng.random_range(-60.0..=60.0),
        ),
        gravity: 480.0,
        drag: 0.92,
        ttl: rng.random_range(0.3..0.5),
        life: 0.0,
        width: rng.random_range(0.6..1.3),
        color,
        glow: 1.0,
        glitter: false,
    })
}

/// What happens to a particle after integrating one frame.
enum Fate {
    Keep,
    Explode(Vec2, Palette),
    Expire,
}

/// Advances every particle by one frame.
///
/// `dt` is the measured elapsed time; it is clamped to `cfg.max_dt` so a
/// slow frame (e.g. after a tab switch) cannot destabilize the
/// integration, and a non-finite value is treated as zero.
///
/// The store is walked in reverse so removal is same-frame safe. Particles
/// created during the pass (explosion rings, glitter children) collect in
/// a separate buffer and merge in only after the walk completes, so the
/// loop never grows the vector it is iterating.
///
/// Rockets integrate gravity and explode at the earliest of: apex height
/// reached, vertical velocity no longer upward, or lifetime expiry. Sparks
/// accumulate life and are removed the frame their normalized age reaches
/// 1; live sparks decay velocity by `drag^(dt * 60)` (frame-rate
/// independent, calibrated to a 60 Hz baseline), fall, and may emit one
/// glitter child.
pub fn step_phase(
    store: &mut ParticleStore,
    cfg: &Config,
    dt: f32,
    rng: &mut impl Rng,
) -> StepStats {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, cfg.max_dt)
    } else {
        0.0
    };

    let mut stats = StepStats::default();
    let mut spawned: Vec<Particle> = Vec::new();

    let mut i = store.particles.len();
    while i > 0 {
        i -= 1;

        let at_capacity = store.particles.len() + spawned.len() >= cfg.max_particles;

        let fate = match &mut store.particles[i] {
            Particle::Rocket(r) => {
                r.life -= dt;
                r.prev = r.pos;
                r.vel.y += cfg.rocket_gravity * dt;
                r.pos += r.vel * dt;

                if r.pos.y <= r.apex_y || r.vel.y >= 0.0 || r.life <= 0.0 {
                    Fate::Explode(r.pos, r.palette)
                } else {
                    Fate::Keep
                }
            }

            Particle::Spark(s) => {
                s.life += dt;
                if s.age() >= 1.0 {
                    Fate::Expire
                } else {
                    s.prev = s.pos;
                    s.vel *= s.drag.powf(dt * 60.0);
                    s.vel.y += s.gravity * dt;
                    s.pos += s.vel * dt;

                    if s.glitter && !at_capacity && rng.random_bool(GLITTER_RATE) {
                        spawned.push(glitter_child(s.pos, s.color, rng));
                        stats.glitter_children += 1;
                    }
                    Fate::Keep
                }
            }
        };

        match fate {
            Fate::Keep => {}
            Fate::Explode(at, palette) => {
                // The element swapped into slot i comes from the tail and
                // was already visited.
                store.particles.swap_remove(i);
                explode_into(&mut spawned, at, palette, rng);
                stats.explosions += 1;
            }
            Fate::Expire => {
                store.particles.swap_remove(i);
                stats.expired_sparks += 1;
            }
        }
    }

    store.particles.append(&mut spawned);
    stats
}
