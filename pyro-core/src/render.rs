//! Software renderer for the particle store.
//!
//! Drawing goes into an owned RGBA pixel buffer ([`Surface`]) that the
//! embedding layer uploads as a texture. Instead of clearing, every frame
//! first blends the whole buffer a little toward the background color, so
//! the previous frames linger as fading motion-blur trails; particles are
//! then drawn with additive (saturating) blending, so overlapping sparks
//! brighten rather than occlude.
//!
//! Particle coordinates are logical; the surface maps them to device
//! pixels with its scale factor, so a resize never requires touching
//! particle state.

use glam::Vec2;

use crate::{color::Rgb, config::Config, particle::Particle, store::ParticleStore};

/// An off-screen RGBA8 drawing target.
///
/// Starts unsized; every drawing call is a no-op until [`Surface::resize`]
/// gives it dimensions. The buffer is allocated in device pixels
/// (logical size times the device pixel ratio, capped at
/// [`Surface::MAX_SCALE`]).
#[derive(Debug)]
pub struct Surface {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<u8>,
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface {
    /// Largest device-pixel-ratio the renderer honors.
    pub const MAX_SCALE: f32 = 2.0;

    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            pixels: Vec::new(),
        }
    }

    fn device_dims(logical: Vec2, scale: f32) -> (usize, usize, f32) {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale.min(Self::MAX_SCALE)
        } else {
            1.0
        };
        let w = (logical.x.max(0.0) * scale).floor() as usize;
        let h = (logical.y.max(0.0) * scale).floor() as usize;
        (w, h, scale)
    }

    /// Reallocates the backing buffer for a new logical size and device
    /// pixel ratio, filled with the background color.
    ///
    /// Existing buffer content is discarded (as a canvas resize does);
    /// particle positions are logical coordinates and are not rescaled.
    pub fn resize(&mut self, logical: Vec2, scale: f32, background: Rgb) {
        let (w, h, scale) = Self::device_dims(logical, scale);
        self.width = w;
        self.height = h;
        self.scale = scale;
        self.pixels = vec![0; w * h * 4];
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = background.r;
            px[1] = background.g;
            px[2] = background.b;
            px[3] = 255;
        }
    }

    /// Whether the surface already matches the given logical size and
    /// device pixel ratio.
    pub fn matches(&self, logical: Vec2, scale: f32) -> bool {
        let (w, h, scale) = Self::device_dims(logical, scale);
        self.width == w && self.height == h && self.scale == scale
    }

    /// Device-pixel width of the buffer.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Device-pixel height of the buffer.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// `true` while the surface has no drawable area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA8 pixels, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Blends every pixel toward `background` by `amount`, fading the
    /// previous frames into trails.
    pub fn fade(&mut self, background: Rgb, amount: f32) {
        let t = amount.clamp(0.0, 1.0);
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = lerp_u8(px[0], background.r, t);
            px[1] = lerp_u8(px[1], background.g, t);
            px[2] = lerp_u8(px[2], background.b, t);
            px[3] = 255;
        }
    }

    fn blend_add(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        self.pixels[i] = self.pixels[i].saturating_add((color.r as f32 * a) as u8);
        self.pixels[i + 1] = self.pixels[i + 1].saturating_add((color.g as f32 * a) as u8);
        self.pixels[i + 2] = self.pixels[i + 2].saturating_add((color.b as f32 * a) as u8);
    }

    /// Stamps a soft disc (radial falloff) in device space.
    fn stamp(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 || alpha <= 0.0 {
            return;
        }
        let x0 = (center.x - radius).floor() as i32;
        let x1 = (center.x + radius).ceil() as i32;
        let y0 = (center.y - radius).floor() as i32;
        let y1 = (center.y + radius).ceil() as i32;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(center);
                if d < radius {
                    let falloff = 1.0 - d / radius;
                    self.blend_add(x, y, color, alpha * falloff * falloff);
                }
            }
        }
    }

    /// Draws a soft glow dot at a logical position.
    pub fn glow(&mut self, at: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if self.is_empty() {
            return;
        }
        let s = self.scale;
        self.stamp(at * s, radius * s, color, alpha);
    }

    /// Draws a streak between two logical positions by stamping
    /// overlapping discs along the segment.
    pub fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgb, alpha: f32) {
        if self.is_empty() {
            return;
        }
        let s = self.scale;
        let a = from * s;
        let b = to * s;
        let radius = (width * s * 0.5).max(0.5);

        let len = a.distance(b);
        if len < 1e-3 {
            self.stamp(a, radius, color, alpha);
            return;
        }
        // One stamp per half-radius keeps the streak continuous without
        // re-touching pixels too often. Long segments are capped; a streak
        // longer than that reads as a blur anyway.
        let steps = ((len / radius.max(0.5)) * 2.0).ceil().min(512.0) as usize;
        for i in 0..=steps {
            let p = a.lerp(b, i as f32 / steps as f32);
            self.stamp(p, radius, color, alpha);
        }
    }
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t).round() as u8
}

/// Draws the whole store into the surface.
///
/// A read-only pass over the particles: a trail-fade fill, then one streak
/// and one glow head per particle. Silently does nothing while the surface
/// is unsized, so the simulation can run before the drawable area exists.
pub fn render_phase(store: &ParticleStore, cfg: &Config, surface: &mut Surface) {
    if surface.is_empty() {
        return;
    }

    surface.fade(cfg.background, cfg.trail_fade);

    for p in &store.particles {
        match p {
            Particle::Rocket(r) => {
                let color = r.palette[0];
                let delta = r.pos - r.prev;

                if delta.length_squared() > 0.01 {
                    // Gradient streak behind the head, brightest nearest it.
                    let tail = r.pos - delta * 12.0;
                    let fades = [(0.0f32, 0.45, 0.9), (0.45, 0.8, 0.45), (0.8, 1.0, 0.15)];
                    for (t0, t1, alpha) in fades {
                        surface.line(
                            r.pos.lerp(tail, t0),
                            r.pos.lerp(tail, t1),
                            2.5,
                            color,
                            alpha,
                        );
                    }
                }

                surface.glow(r.pos, 8.0, color, 0.30);
                surface.glow(r.pos, 2.4, color, 1.0);
            }

            Particle::Spark(s) => {
                let alpha = s.fade_alpha();
                let lw = s.width * (0.7 + 0.3 * alpha);

                if (s.pos - s.prev).length_squared() > 0.01 {
                    surface.line(s.prev, s.pos, lw, s.color, alpha);
                }

                // Colored halo scaled by the glow multiplier, with a
                // white-hot core on top.
                surface.glow(s.pos, 2.0 + 2.0 * s.glow, s.color, 0.25 * alpha);
                surface.glow(s.pos, (lw * 0.9).max(0.8), Rgb::WHITE, 0.15 * alpha);
            }
        }
    }
}
