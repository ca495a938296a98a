//! Domain errors raised by the simulation and the environment adapter

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// Action outside the two-valued action space
    #[error("invalid action {0}: expected 0 (no-op) or 1 (flap)")]
    InvalidAction(i64),
    /// `step` called after a terminal transition without a `reset`
    #[error("episode has terminated; call reset() before stepping again")]
    EpisodeTerminated,
}
