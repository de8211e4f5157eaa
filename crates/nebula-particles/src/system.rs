//! A population of particles ticked and rendered as one unit.

use glam::Vec3;
use nebula_render::RenderSurface;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::emitter::Emitter;
use crate::particle::Particle;

/// What happens to a particle slot once its particle dies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RespawnPolicy {
    /// Dead particles stay dead; the system dies with its last particle.
    #[default]
    Once,
    /// Dead particles are replaced in place by a freshly emitted particle at
    /// the start of the next tick.
    Recycle,
}

/// Aggregates over the particles alive after the last tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SystemStats {
    /// Number of live particles.
    pub alive: usize,
    /// Mean position of the live particles.
    pub centroid: Option<Vec3>,
    /// Axis-aligned `(min, max)` of the live particles.
    pub bounds: Option<(Vec3, Vec3)>,
}

/// Owns a set of particles and advances them in index order.
///
/// The system is dead when no particle is alive; an empty system is dead.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    emitter: Emitter,
    rng: ChaCha8Rng,
    policy: RespawnPolicy,
    stats: SystemStats,
    respawned: u64,
}

impl ParticleSystem {
    /// Emit `count` particles from `emitter` using an RNG seeded with `seed`.
    pub fn new(emitter: Emitter, count: usize, seed: u64, policy: RespawnPolicy) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let particles = (0..count).map(|_| emitter.emit(&mut rng)).collect();
        Self::with_rng(particles, emitter, rng, policy)
    }

    /// Adopt an existing set of particles. `emitter` and `seed` are only used
    /// for respawning under [`RespawnPolicy::Recycle`].
    pub fn from_particles(
        particles: Vec<Particle>,
        emitter: Emitter,
        seed: u64,
        policy: RespawnPolicy,
    ) -> Self {
        Self::with_rng(particles, emitter, ChaCha8Rng::seed_from_u64(seed), policy)
    }

    fn with_rng(
        particles: Vec<Particle>,
        emitter: Emitter,
        rng: ChaCha8Rng,
        policy: RespawnPolicy,
    ) -> Self {
        let mut system = Self {
            particles,
            emitter,
            rng,
            policy,
            stats: SystemStats::default(),
            respawned: 0,
        };
        system.stats = system.collect_stats();
        system
    }

    /// Advance every particle by `dt` seconds.
    ///
    /// Under [`RespawnPolicy::Recycle`] dead slots are refilled first, then
    /// each particle is updated in index order and the stats are rebuilt in
    /// the same pass. A non-positive `dt` leaves the system unchanged.
    pub fn update(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        if self.policy == RespawnPolicy::Recycle {
            for slot in self.particles.iter_mut().filter(|p| p.is_dead()) {
                *slot = self.emitter.emit(&mut self.rng);
                self.respawned += 1;
            }
        }

        let mut acc = StatsAccumulator::default();
        for particle in &mut self.particles {
            particle.update(dt);
            acc.add(particle);
        }
        self.stats = acc.finish();
        log::trace!(
            "particle tick: {}/{} alive",
            self.stats.alive,
            self.particles.len()
        );
    }

    /// Whether no particle is alive.
    ///
    /// Under [`RespawnPolicy::Recycle`] this can hold between ticks when every
    /// particle expired on the same tick; the next `update` refills the slots.
    pub fn is_dead(&self) -> bool {
        self.particles.iter().all(Particle::is_dead)
    }

    /// Render every particle in index order.
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        for particle in &self.particles {
            particle.render(surface);
        }
    }

    /// All particles, dead ones included, in index order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particle slots.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the system has no particle slots.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of live particles right now.
    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.is_dead()).count()
    }

    /// Stats as of the last [`update`](Self::update) (or construction).
    pub fn stats(&self) -> SystemStats {
        self.stats
    }

    /// Total number of slots refilled by respawning.
    pub fn respawned(&self) -> u64 {
        self.respawned
    }

    /// What happens to dead slots.
    pub fn policy(&self) -> RespawnPolicy {
        self.policy
    }

    /// Emitter used for respawning.
    pub fn emitter(&self) -> &Emitter {
        &self.emitter
    }

    fn collect_stats(&self) -> SystemStats {
        let mut acc = StatsAccumulator::default();
        for particle in &self.particles {
            acc.add(particle);
        }
        acc.finish()
    }
}

#[derive(Default)]
struct StatsAccumulator {
    alive: usize,
    sum: Vec3,
    bounds: Option<(Vec3, Vec3)>,
}

impl StatsAccumulator {
    fn add(&mut self, particle: &Particle) {
        if particle.is_dead() {
            return;
        }
        let p = particle.position();
        self.alive += 1;
        self.sum += p;
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(p), max.max(p)),
            None => (p, p),
        });
    }

    fn finish(self) -> SystemStats {
        SystemStats {
            alive: self.alive,
            centroid: (self.alive > 0).then(|| self.sum / self.alive as f32),
            bounds: self.bounds,
        }
    }
}
