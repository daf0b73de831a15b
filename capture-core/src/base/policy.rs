//! Policy.
use super::Env;
use anyhow::Result;
use std::path::Path;

/// A trained policy on an environment.
///
/// Policy is a mapping from an observation to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Sample an action given an observation.
    fn sample(&mut self, obs: &E::Obs) -> E::Act;

    /// Save the parameters of the policy to the given path.
    fn save_params(&self, path: &Path) -> Result<()>;
}
