//! A single simulated point mass with a finite lifetime.

use glam::Vec3;
use nebula_render::{ParticleSprite, RenderSurface};

/// Per-particle motion and fading rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParticleBehavior {
    /// Ballistic motion; alpha and size fade linearly to zero over the lifetime.
    Decay,
    /// Accelerates toward `target` with constant magnitude `strength`; alpha
    /// fades, size is kept.
    Attract {
        /// Point the particle is pulled toward.
        target: Vec3,
        /// Magnitude of the pull in units per second squared.
        strength: f32,
    },
}

impl ParticleBehavior {
    fn pull(&self, position: Vec3) -> Vec3 {
        match *self {
            Self::Decay => Vec3::ZERO,
            Self::Attract { target, strength } => (target - position).normalize_or_zero() * strength,
        }
    }
}

/// A particle. Alive while `age < lifetime`, dead afterwards.
///
/// Dead is terminal: once [`is_dead`](Self::is_dead) holds, [`update`](Self::update)
/// leaves the particle frozen. Systems replace dead particles with new ones
/// instead of reviving them.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    age: f32,
    lifetime: f32,
    color: [f32; 4],
    size: f32,
    start_color: [f32; 4],
    start_size: f32,
    behavior: ParticleBehavior,
}

impl Particle {
    /// Create a white, unit-size [`ParticleBehavior::Decay`] particle.
    pub fn new(position: Vec3, velocity: Vec3, lifetime: f32) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec3::ZERO,
            age: 0.0,
            lifetime,
            color: [1.0; 4],
            size: 1.0,
            start_color: [1.0; 4],
            start_size: 1.0,
            behavior: ParticleBehavior::Decay,
        }
    }

    /// Set a constant acceleration (e.g. gravity).
    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the initial color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self.start_color = color;
        self
    }

    /// Set the initial size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self.start_size = size;
        self
    }

    /// Set the behavior.
    pub fn with_behavior(mut self, behavior: ParticleBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Advance the particle by `dt` seconds.
    ///
    /// Explicit Euler: position integrates the velocity from the start of the
    /// step, then velocity integrates the acceleration. A non-positive `dt`
    /// or a dead particle leaves every field unchanged.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 || self.is_dead() {
            return;
        }
        let acceleration = self.acceleration + self.behavior.pull(self.position);
        self.position += self.velocity * dt;
        self.velocity += acceleration * dt;
        self.age += dt;

        let remaining = self.remaining_fraction();
        self.color[3] = self.start_color[3] * remaining;
        if let ParticleBehavior::Decay = self.behavior {
            self.size = self.start_size * remaining;
        }
    }

    /// Whether the particle's age has reached its lifetime.
    pub fn is_dead(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Fraction of the lifetime still ahead, in `[0, 1]`.
    pub fn remaining_fraction(&self) -> f32 {
        if self.lifetime <= 0.0 {
            0.0
        } else {
            (1.0 - self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    /// Current visual state.
    pub fn sprite(&self) -> ParticleSprite {
        ParticleSprite {
            position: self.position,
            color: self.color,
            size: self.size,
        }
    }

    /// Hand the current visual state to the renderer.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.draw_particle(&self.sprite());
    }

    /// Current position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current velocity.
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Seconds simulated so far.
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Age at which the particle dies.
    pub fn lifetime(&self) -> f32 {
        self.lifetime
    }

    /// Current RGBA color.
    pub fn color(&self) -> [f32; 4] {
        self.color
    }

    /// Current billboard size.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Motion and fading rule.
    pub fn behavior(&self) -> ParticleBehavior {
        self.behavior
    }
}
