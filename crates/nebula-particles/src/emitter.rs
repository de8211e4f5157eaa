//! Spawns particles around an origin from a caller-supplied seeded RNG.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::particle::{Particle, ParticleBehavior};

/// Spawn parameters shared by every particle an emitter creates.
#[derive(Clone, Debug, PartialEq)]
pub struct Emitter {
    /// Centre of the spawn sphere.
    pub origin: Vec3,
    /// Radius of the spawn sphere.
    pub spread: f32,
    /// Lower bound of the initial speed.
    pub min_speed: f32,
    /// Upper bound of the initial speed.
    pub max_speed: f32,
    /// Lower bound of the lifetime in seconds.
    pub min_lifetime: f32,
    /// Upper bound of the lifetime in seconds.
    pub max_lifetime: f32,
    /// Constant acceleration applied to every particle.
    pub gravity: Vec3,
    /// Initial billboard size.
    pub size: f32,
    /// Initial RGBA color.
    pub color: [f32; 4],
    /// Behavior given to every particle.
    pub behavior: ParticleBehavior,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            spread: 0.5,
            min_speed: 1.0,
            max_speed: 4.0,
            min_lifetime: 1.0,
            max_lifetime: 3.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            size: 0.25,
            color: [1.0, 0.8, 0.4, 1.0],
            behavior: ParticleBehavior::Decay,
        }
    }
}

/// Uniform sample in `[min, max)`, or `min` when the range is empty.
fn sample_range(rng: &mut ChaCha8Rng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

/// Uniformly distributed unit vector.
fn unit_direction(rng: &mut ChaCha8Rng) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin())
}

impl Emitter {
    /// Spawn one particle. Consumes a fixed number of draws from `rng`, so a
    /// given seed always produces the same sequence of particles.
    pub fn emit(&self, rng: &mut ChaCha8Rng) -> Particle {
        let offset = unit_direction(rng) * self.spread.max(0.0) * rng.random::<f32>().cbrt();
        let velocity = unit_direction(rng) * sample_range(rng, self.min_speed, self.max_speed);
        let lifetime = sample_range(rng, self.min_lifetime, self.max_lifetime);

        Particle::new(self.origin + offset, velocity, lifetime)
            .with_acceleration(self.gravity)
            .with_color(self.color)
            .with_size(self.size)
            .with_behavior(self.behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawns_inside_sphere_with_ranges() {
        let emitter = Emitter {
            origin: Vec3::new(3.0, 8.0, -2.0),
            spread: 1.5,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let p = emitter.emit(&mut rng);
            assert!(p.position().distance(emitter.origin) <= emitter.spread + 1e-4);
            let speed = p.velocity().length();
            assert!((emitter.min_speed - 1e-4..=emitter.max_speed + 1e-4).contains(&speed));
            assert!((emitter.min_lifetime..emitter.max_lifetime).contains(&p.lifetime()));
            assert!(!p.is_dead());
        }
    }

    #[test]
    fn test_same_seed_same_particles() {
        let emitter = Emitter::default();
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(emitter.emit(&mut a), emitter.emit(&mut b));
        }
    }

    #[test]
    fn test_empty_ranges_use_minimum() {
        let emitter = Emitter {
            spread: 0.0,
            min_speed: 2.0,
            max_speed: 2.0,
            min_lifetime: 1.5,
            max_lifetime: 0.5,
            ..Default::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let p = emitter.emit(&mut rng);
        assert_eq!(p.position(), emitter.origin);
        assert!((p.velocity().length() - 2.0).abs() < 1e-5);
        assert_eq!(p.lifetime(), 1.5);
    }

    #[test]
    fn test_particles_inherit_appearance() {
        let emitter = Emitter {
            size: 0.75,
            color: [0.1, 0.2, 0.3, 0.4],
            ..Default::default()
        };
        let p = emitter.emit(&mut ChaCha8Rng::seed_from_u64(0));
        assert_eq!(p.size(), 0.75);
        assert_eq!(p.color(), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(p.behavior(), ParticleBehavior::Decay);
    }
}
