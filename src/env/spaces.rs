//! Action and observation spaces

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::observation::{OBS_SIZE, Observation};
use crate::consts::*;

/// Discrete space `{0, 1, ..., n - 1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrete {
    pub n: i64,
}

impl Discrete {
    pub fn new(n: i64) -> Self {
        Self { n }
    }

    pub fn contains(&self, value: i64) -> bool {
        (0..self.n).contains(&value)
    }

    /// Uniform sample
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.random_range(0..self.n)
    }
}

/// Per-dimension bounds of the observation vector.
///
/// Bounds describe the typical operating range, not a clamp: velocity can
/// briefly leave `[-10, 10]` (e.g. a long free fall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    pub low: [f32; OBS_SIZE],
    pub high: [f32; OBS_SIZE],
}

impl Default for BoxSpace {
    fn default() -> Self {
        Self {
            low: [0.0, -10.0, 0.0, 0.0],
            high: [SCREEN_HEIGHT, 10.0, SCREEN_WIDTH, SCREEN_HEIGHT],
        }
    }
}

impl BoxSpace {
    /// True when every component lies within its bounds
    pub fn contains(&self, obs: &Observation) -> bool {
        obs.to_array()
            .iter()
            .zip(self.low.iter().zip(self.high.iter()))
            .all(|(v, (lo, hi))| v >= lo && v <= hi)
    }

    /// Scale each component so the declared range maps to `[0, 1]`.
    /// Values outside the range scale linearly past the ends.
    pub fn normalize(&self, obs: &Observation) -> [f32; OBS_SIZE] {
        let mut out = obs.to_array();
        for (i, v) in out.iter_mut().enumerate() {
            let span = self.high[i] - self.low[i];
            *v = if span > 0.0 { (*v - self.low[i]) / span } else { 0.0 };
        }
        out
    }

    /// Clamp each component into its bounds
    pub fn clip(&self, obs: &Observation) -> Observation {
        let mut out = obs.to_array();
        for (i, v) in out.iter_mut().enumerate() {
            *v = v.clamp(self.low[i], self.high[i]);
        }
        Observation::from_array(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_discrete_contains() {
        let space = Discrete::new(2);
        assert!(space.contains(0));
        assert!(space.contains(1));
        assert!(!space.contains(2));
        assert!(!space.contains(-1));
    }

    #[test]
    fn test_discrete_sample_covers_space() {
        let space = Discrete::new(2);
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen = [0usize; 2];
        for _ in 0..200 {
            let a = space.sample(&mut rng);
            assert!(space.contains(a));
            seen[a as usize] += 1;
        }
        assert!(seen[0] > 0 && seen[1] > 0);
    }

    #[test]
    fn test_box_bounds_and_normalize() {
        let space = BoxSpace::default();
        let obs = Observation::from_array([300.0, 0.0, 400.0, 150.0]);
        assert!(space.contains(&obs));
        assert_eq!(space.normalize(&obs), [0.5, 0.5, 1.0, 0.25]);

        // Velocity past the soft bound is not clamped by normalize
        let fast = Observation::from_array([300.0, 16.0, 400.0, 150.0]);
        assert!(!space.contains(&fast));
        assert!(space.normalize(&fast)[1] > 1.0);
        assert_eq!(space.clip(&fast).bird_vel, 10.0);
    }
}
