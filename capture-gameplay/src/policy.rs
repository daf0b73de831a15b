use crate::arcade::N_ACTIONS;
use anyhow::{ensure, Result};
use capture_core::{DiscreteAct, Env, Obs, Policy};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Parameters of [`RandomPolicy`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomPolicyConfig {
    /// Number of actions.
    pub n_actions: i64,

    /// Seed of the action sampler.
    pub seed: u64,
}

/// Chooses actions uniformly at random, independently in every slot.
pub struct RandomPolicy {
    config: RandomPolicyConfig,
    rng: fastrand::Rng,
}

impl RandomPolicy {
    /// Builds the policy.
    ///
    /// `n_actions` must be in `1..=N_ACTIONS`.
    pub fn build(config: RandomPolicyConfig) -> Result<Self> {
        ensure!(
            0 < config.n_actions && config.n_actions <= N_ACTIONS,
            "n_actions must be in 1..={}, got {}",
            N_ACTIONS,
            config.n_actions
        );
        let rng = fastrand::Rng::with_seed(config.seed);
        Ok(Self { config, rng })
    }

    /// Builds the policy with the parameters in the YAML file of the given path.
    pub fn build_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let rdr = BufReader::new(File::open(path)?);
        let config = serde_yaml::from_reader(rdr)?;
        Self::build(config)
    }
}

impl<E> Policy<E> for RandomPolicy
where
    E: Env<Act = DiscreteAct>,
{
    fn sample(&mut self, obs: &E::Obs) -> DiscreteAct {
        let n_actions = self.config.n_actions;
        let act = (0..obs.len())
            .map(|_| self.rng.i64(0..n_actions))
            .collect();
        DiscreteAct::new(act)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        let wtr = BufWriter::new(File::create(path)?);
        serde_yaml::to_writer(wtr, &self.config)?;
        Ok(())
    }
}
