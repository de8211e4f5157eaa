//! Coherent gradient noise and octave turbulence.
//!
//! The gradient/permutation table is built once from the configured seed and
//! never changes afterwards, so a [`NoiseEngine`] can be shared across threads
//! for parallel heightfield construction. The octave tunables are read on
//! every [`NoiseEngine::turbulence`] call.

use nebula_config::NoiseConfig;
use noise::{NoiseFn, Perlin};

/// Deterministic 3D Perlin noise with turbulence accumulation.
#[derive(Clone, Debug)]
pub struct NoiseEngine {
    perlin: Perlin,
    config: NoiseConfig,
}

impl NoiseEngine {
    /// Build the gradient table for `config.seed`.
    pub fn new(config: NoiseConfig) -> Self {
        let perlin = Perlin::new(config.seed);
        log::debug!(
            "noise table seeded with {} (octaves={}, lacunarity={})",
            config.seed,
            config.octaves,
            config.lacunarity
        );
        Self { perlin, config }
    }

    /// Coherent noise at `(x, y, z)`, in `[-1, 1]`.
    ///
    /// Zero at every integer lattice point. Inputs must be finite.
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        self.perlin.get([x, y, z]).clamp(-1.0, 1.0)
    }

    /// Octave-summed absolute noise:
    /// `sum over o in [0, octaves) of |noise(p * lacunarity^o)| / 2^o`.
    ///
    /// Returns `0.0` (the empty sum) when `octaves <= 0`. The result lies in
    /// `[0, max_turbulence()]`.
    pub fn turbulence(&self, x: f64, y: f64, z: f64) -> f64 {
        let octaves = self.config.octaves;
        let lacunarity = self.config.lacunarity;

        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..octaves.max(0) {
            total += self.noise(x * frequency, y * frequency, z * frequency).abs() * amplitude;
            frequency *= lacunarity;
            amplitude *= 0.5;
        }
        total
    }

    /// Upper bound of [`turbulence`](Self::turbulence) for the current octave count.
    pub fn max_turbulence(&self) -> f64 {
        (0..self.config.octaves.max(0)).map(|o| 0.5_f64.powi(o)).sum()
    }

    /// Seed the gradient table was built from.
    pub fn seed(&self) -> u32 {
        self.config.seed
    }

    /// Current tunables.
    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    /// Change the octave count used by subsequent turbulence calls.
    pub fn set_octaves(&mut self, octaves: i32) {
        self.config.octaves = octaves;
    }

    /// Change the lacunarity used by subsequent turbulence calls.
    pub fn set_lacunarity(&mut self, lacunarity: f64) {
        self.config.lacunarity = lacunarity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn engine(octaves: i32) -> NoiseEngine {
        NoiseEngine::new(NoiseConfig {
            seed: 42,
            octaves,
            lacunarity: 2.0,
        })
    }

    fn sample_points() -> impl Iterator<Item = (f64, f64, f64)> {
        (0..200).map(|i| {
            let t = i as f64;
            (t * 0.173 + 0.31, t * 0.057 - 1.9, t * 0.291 + 0.77)
        })
    }

    #[test]
    fn test_noise_is_bit_identical_across_calls() {
        let a = engine(3);
        let b = engine(3);
        for (x, y, z) in sample_points() {
            let n1 = a.noise(x, y, z);
            let n2 = a.noise(x, y, z);
            let n3 = b.noise(x, y, z);
            assert_eq!(n1.to_bits(), n2.to_bits());
            assert_eq!(n1.to_bits(), n3.to_bits());
        }
    }

    #[test]
    fn test_noise_within_unit_range() {
        let e = engine(1);
        for (x, y, z) in sample_points() {
            let n = e.noise(x, y, z);
            assert!((-1.0..=1.0).contains(&n), "noise {n} out of range at ({x}, {y}, {z})");
        }
    }

    #[test]
    fn test_noise_vanishes_on_lattice() {
        let e = engine(1);
        assert!(e.noise(3.0, -2.0, 7.0).abs() < EPSILON);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = engine(1);
        let b = NoiseEngine::new(NoiseConfig {
            seed: 7,
            ..a.config().clone()
        });
        let differs = sample_points().any(|(x, y, z)| a.noise(x, y, z) != b.noise(x, y, z));
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_single_octave_turbulence_is_abs_noise() {
        let e = engine(1);
        for (x, y, z) in sample_points() {
            assert_eq!(e.turbulence(x, y, z), e.noise(x, y, z).abs());
        }
    }

    #[test]
    fn test_turbulence_matches_explicit_sum() {
        let e = engine(3);
        let (x, y, z) = (0.37, 1.21, -0.68);
        let expected = e.noise(x, y, z).abs()
            + e.noise(2.0 * x, 2.0 * y, 2.0 * z).abs() / 2.0
            + e.noise(4.0 * x, 4.0 * y, 4.0 * z).abs() / 4.0;
        assert!((e.turbulence(x, y, z) - expected).abs() < EPSILON);
    }

    #[test]
    fn test_non_positive_octaves_yield_zero() {
        for octaves in [0, -1, -100] {
            let e = engine(octaves);
            assert_eq!(e.turbulence(0.3, 0.4, 0.5), 0.0);
            assert_eq!(e.max_turbulence(), 0.0);
        }
    }

    #[test]
    fn test_turbulence_bounded() {
        let e = engine(5);
        let max = e.max_turbulence();
        assert!((max - 1.9375).abs() < EPSILON);
        for (x, y, z) in sample_points() {
            let t = e.turbulence(x, y, z);
            assert!((0.0..=max).contains(&t), "turbulence {t} outside [0, {max}]");
        }
    }

    #[test]
    fn test_tunables_read_at_call_time() {
        let mut e = engine(1);
        let (x, y, z) = (0.3, 0.7, 0.1);
        let one = e.turbulence(x, y, z);

        e.set_octaves(4);
        let four = e.turbulence(x, y, z);
        assert!(four > one, "adding octaves should add energy: {one} vs {four}");

        e.set_lacunarity(3.0);
        assert_ne!(e.turbulence(x, y, z), four);
        assert_eq!(e.config().lacunarity, 3.0);
    }

    #[test]
    fn test_concurrent_reads_match_serial() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoiseEngine>();

        let e = engine(4);
        let serial: Vec<f64> = sample_points().map(|(x, y, z)| e.turbulence(x, y, z)).collect();
        let parallel: Vec<Vec<f64>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        sample_points()
                            .map(|(x, y, z)| e.turbulence(x, y, z))
                            .collect::<Vec<f64>>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for run in parallel {
            assert_eq!(run, serial);
        }
    }
}
