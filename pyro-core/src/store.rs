use crate::particle::Particle;

/// The shared particle state.
///
/// Owned by the surrounding component and passed by reference into
/// [`crate::phases::spawn_firework`], [`crate::phases::step_phase`] and
/// [`crate::render::render_phase`]; exactly one actor (the frame callback)
/// mutates it, so no synchronization is involved.
#[derive(Debug, Default)]
pub struct ParticleStore {
    pub particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn rocket_count(&self) -> usize {
        self.particles
            .iter()
            .filter(|p| matches!(p, Particle::Rocket(_)))
            .count()
    }

    pub fn spark_count(&self) -> usize {
        self.particles
            .iter()
            .filter(|p| matches!(p, Particle::Spark(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{PALETTES, Rgb};
    use crate::particle::{Rocket, Spark};
    use glam::Vec2;

    fn test_spark() -> Particle {
        Particle::Spark(Spark {
            pos: Vec2::ZERO,
            prev: Vec2::ZERO,
            vel: Vec2::ZERO,
            gravity: 0.0,
            drag: 1.0,
            ttl: 1.0,
            life: 0.0,
            width: 1.0,
            color: Rgb::WHITE,
            glow: 1.0,
            glitter: false,
        })
    }

    #[test]
    fn counts_split_by_variant() {
        let mut store = ParticleStore::new();
        assert!(store.is_empty());

        store.particles.push(Particle::Rocket(Rocket::launch(
            Vec2::ZERO,
            Vec2::ZERO,
            80.0,
            PALETTES[0],
            1.25,
        )));
        store.particles.push(test_spark());
        store.particles.push(test_spark());

        assert_eq!(store.len(), 3);
        assert_eq!(store.rocket_count(), 1);
        assert_eq!(store.spark_count(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
