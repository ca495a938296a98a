//! Decision makers that map observations to actions
//!
//! - `RandomPolicy`: uniform samples from the action space (headless testing)
//! - `AutopilotPolicy`: hand-tuned gap follower, no artifact needed
//! - `LinearPolicy`: learned weights loaded from a JSON artifact

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::env::{BoxSpace, Discrete, OBS_SIZE, Observation};
use crate::sim::Action;

/// Artifact format tag accepted by [`LinearPolicy::load`]
pub const ARTIFACT_FORMAT: &str = "flappy-gym/linear";
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("no policy artifact at {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read policy artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("policy artifact {} is not valid JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("policy artifact {} is incompatible: {reason}", .path.display())]
    Incompatible { path: PathBuf, reason: String },
}

/// Anything that picks one action per observation
pub trait Policy {
    fn name(&self) -> &str;

    fn act(&mut self, obs: &Observation) -> Action;
}

/// Uniformly random actions
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: Pcg32,
    space: Discrete,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            space: Discrete::new(2),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _obs: &Observation) -> Action {
        match self.space.sample(&mut self.rng) {
            1 => Action::Flap,
            _ => Action::Noop,
        }
    }
}

/// Flaps whenever the bird is falling into the bottom of the front gap.
///
/// A flap rises 105 px to its apex, so flapping once the bird is within
/// `margin` of the lower segment keeps it oscillating inside the gap.
#[derive(Debug, Clone)]
pub struct AutopilotPolicy {
    pub margin: f32,
}

impl Default for AutopilotPolicy {
    fn default() -> Self {
        Self { margin: 15.0 }
    }
}

impl Policy for AutopilotPolicy {
    fn name(&self) -> &str {
        "autopilot"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        let floor = obs.pipe_top + PIPE_GAP - BIRD_HEIGHT - self.margin;
        Action::from(obs.bird_y > floor && obs.bird_vel > 0.0)
    }
}

/// On-disk form of a linear policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub format: String,
    pub version: u32,
    /// One weight per normalized observation component
    pub weights: Vec<f32>,
    pub bias: f32,
}

/// Flaps when `w . normalize(obs) + b > 0`
#[derive(Debug, Clone)]
pub struct LinearPolicy {
    weights: [f32; OBS_SIZE],
    bias: f32,
    space: BoxSpace,
}

impl LinearPolicy {
    pub fn new(weights: [f32; OBS_SIZE], bias: f32) -> Self {
        Self {
            weights,
            bias,
            space: BoxSpace::default(),
        }
    }

    /// Load and validate an artifact
    pub fn load(path: &Path) -> Result<Self, PolicyError> {
        if !path.exists() {
            return Err(PolicyError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: LinearArtifact =
            serde_json::from_str(&text).map_err(|source| PolicyError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let policy = Self::from_artifact(&artifact).map_err(|reason| PolicyError::Incompatible {
            path: path.to_path_buf(),
            reason,
        })?;
        log::info!("Loaded {} policy from {}", ARTIFACT_FORMAT, path.display());
        Ok(policy)
    }

    fn from_artifact(artifact: &LinearArtifact) -> Result<Self, String> {
        if artifact.format != ARTIFACT_FORMAT {
            return Err(format!(
                "format {:?}, expected {:?}",
                artifact.format, ARTIFACT_FORMAT
            ));
        }
        if artifact.version != ARTIFACT_VERSION {
            return Err(format!(
                "version {}, expected {}",
                artifact.version, ARTIFACT_VERSION
            ));
        }
        let weights: [f32; OBS_SIZE] = artifact.weights.as_slice().try_into().map_err(|_| {
            format!(
                "{} weights, expected {}",
                artifact.weights.len(),
                OBS_SIZE
            )
        })?;
        if !weights.iter().chain([&artifact.bias]).all(|w| w.is_finite()) {
            return Err("non-finite parameter".to_string());
        }
        Ok(Self::new(weights, artifact.bias))
    }

    /// Decision value for an observation
    pub fn logit(&self, obs: &Observation) -> f32 {
        let x = self.space.normalize(obs);
        self.weights.iter().zip(x.iter()).map(|(w, v)| w * v).sum::<f32>() + self.bias
    }
}

impl Policy for LinearPolicy {
    fn name(&self) -> &str {
        "linear"
    }

    fn act(&mut self, obs: &Observation) -> Action {
        Action::from(self.logit(obs) > 0.0)
    }
}
