use crate::color::Rgb;

#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Downward acceleration on ascending rockets, px/s^2.
    pub rocket_gravity: f32,
    /// Safety cutoff for rockets that never reach apex, seconds.
    pub rocket_lifetime: f32,
    /// Base upward launch speed, px/s.
    pub launch_speed: f32,
    /// Random extra launch speed on top of the base, px/s.
    pub launch_speed_jitter: f32,
    /// Maximum horizontal launch velocity in either direction, px/s.
    pub launch_drift: f32,
    /// Apex height is never above this many pixels from the top.
    pub apex_floor: f32,
    /// Minimum rise above the launch point, px.
    pub apex_rise: f32,
    /// Random extra rise, px.
    pub apex_rise_jitter: f32,
    /// Chance that a launch produces a second, offset rocket.
    pub twin_chance: f64,
    /// Upper bound on the measured frame delta, seconds.
    pub max_dt: f32,
    /// Live-particle cap; launches and glitter children are dropped at capacity.
    pub max_particles: usize,
    /// Per-frame blend toward the background, producing the motion-blur trail.
    pub trail_fade: f32,
    pub background: Rgb,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rocket_gravity: 220.0,
            rocket_lifetime: 1.25,
            launch_speed: 520.0,
            launch_speed_jitter: 220.0,
            launch_drift: 25.0,
            apex_floor: 80.0,
            apex_rise: 180.0,
            apex_rise_jitter: 240.0,
            twin_chance: 0.35,
            max_dt: 0.02,
            max_particles: 4000,
            trail_fade: 0.12,
            background: Rgb::new(5, 10, 15),
        }
    }
}
