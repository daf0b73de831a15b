//! Environment.
use super::{Act, Obs, Step};
use anyhow::Result;

/// Represents an environment, typically an MDP.
///
/// The environment may be vectorized, in which case observations, actions,
/// rewards and done flags of a [`Step`] carry one entry per sub-environment.
pub trait Env {
    /// Observation of the environment.
    type Obs: Obs;

    /// Action of the environment.
    type Act: Act;

    /// Resets the environment and returns the initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performes an environment step.
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Remaining lives reported by the environment.
    ///
    /// For vectorized environments, this is the counter of the first sub-environment.
    fn lives(&self) -> u32;

    /// Releases resources held by the environment.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
