use crate::color::{Palette, Rgb};
use glam::Vec2;

/// A live entity in the display.
///
/// Every site that processes particles matches on this exhaustively, so a
/// new particle kind cannot be added without the compiler flagging each
/// handling site.
#[derive(Clone, Debug)]
pub enum Particle {
    Rocket(Rocket),
    Spark(Spark),
}

/// A launched shell ascending toward its apex.
#[derive(Clone, Debug)]
pub struct Rocket {
    pub pos: Vec2,
    /// Position on the previous frame, used to draw the motion streak.
    pub prev: Vec2,
    pub vel: Vec2,
    /// Height at which the rocket is done ascending and explodes.
    pub apex_y: f32,
    pub palette: Palette,
    /// Remaining lifetime in seconds; a cutoff in case the apex and
    /// velocity conditions never trigger.
    pub life: f32,
}

/// A short-lived explosion fragment under gravity and drag.
#[derive(Clone, Debug)]
pub struct Spark {
    pub pos: Vec2,
    pub prev: Vec2,
    pub vel: Vec2,
    /// Downward acceleration, px/s^2.
    pub gravity: f32,
    /// Multiplicative velocity decay per 1/60 s.
    pub drag: f32,
    /// Total time to live, seconds.
    pub ttl: f32,
    /// Elapsed life, seconds.
    pub life: f32,
    /// Stroke width of the trail, px.
    pub width: f32,
    pub color: Rgb,
    /// Glow intensity multiplier for the halo around the trail.
    pub glow: f32,
    /// Eligible to emit one non-glitter child spark per frame.
    pub glitter: bool,
}

impl Rocket {
    pub fn launch(pos: Vec2, vel: Vec2, apex_y: f32, palette: Palette, life: f32) -> Self {
        Self {
            pos,
            prev: pos,
            vel,
            apex_y,
            palette,
            life,
        }
    }
}

impl Spark {
    /// Normalized age; the spark expires when this reaches 1.
    #[inline]
    pub fn age(&self) -> f32 {
        self.life / self.ttl
    }

    /// Render alpha, easing out as the spark ages.
    #[inline]
    pub fn fade_alpha(&self) -> f32 {
        (1.0 - self.age()).max(0.0).powf(1.5)
    }
}

impl Particle {
    pub fn pos(&self) -> Vec2 {
        match self {
            Particle::Rocket(r) => r.pos,
            Particle::Spark(s) => s.pos,
        }
    }
}
