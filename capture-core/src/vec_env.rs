//! Vectorized environment stepping sub-environments in lockstep.
use crate::{error::CaptureError, Act, Env, InfoMap, Obs, Step, StepInfo};
use anyhow::{ensure, Result};
use log::trace;

/// Runs a number of environments as a single one.
///
/// Observations are stacked in slot order and the step info is a
/// [`StepInfo::Slots`] list. A sub-environment reporting done is reset
/// immediately and its initial observation replaces the terminal one.
pub struct VecEnv<E: Env> {
    envs: Vec<E>,
}

impl<E: Env> VecEnv<E> {
    /// Constructs a vectorized environment from at least one sub-environment.
    pub fn new(envs: Vec<E>) -> Result<Self> {
        if envs.is_empty() {
            return Err(CaptureError::EmptyVecEnv.into());
        }
        Ok(Self { envs })
    }

    /// Number of sub-environments.
    pub fn n_envs(&self) -> usize {
        self.envs.len()
    }

    /// Returns the sub-environments.
    pub fn envs(&self) -> &[E] {
        &self.envs
    }
}

impl<E: Env> Env for VecEnv<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self) -> Result<E::Obs> {
        trace!("VecEnv::reset()");
        let obs = self
            .envs
            .iter_mut()
            .map(|env| env.reset())
            .collect::<Result<Vec<_>>>()?;
        Ok(E::Obs::stack(obs))
    }

    fn step(&mut self, a: &E::Act) -> Result<Step<Self>> {
        ensure!(
            a.len() == self.envs.len(),
            "expected {} actions, got {}",
            self.envs.len(),
            a.len()
        );

        let n = self.envs.len();
        let mut obs = Vec::with_capacity(n);
        let mut reward = Vec::with_capacity(n);
        let mut is_done = Vec::with_capacity(n);
        let mut infos = Vec::with_capacity(n);

        for (ix, env) in self.envs.iter_mut().enumerate() {
            let step = env.step(&a.slot(ix))?;
            let done = step.is_done.iter().any(|&d| d == 1);
            reward.extend(step.reward);
            is_done.extend(step.is_done);
            match step.info {
                StepInfo::Slots(v) => infos.extend(v),
                StepInfo::Map(m) => infos.push(m),
                StepInfo::Empty => infos.push(InfoMap::default()),
            }
            obs.push(if done { env.reset()? } else { step.obs });
        }

        Ok(Step::new(
            E::Obs::stack(obs),
            a.clone(),
            reward,
            is_done,
            StepInfo::Slots(infos),
        ))
    }

    fn lives(&self) -> u32 {
        self.envs[0].lives()
    }

    fn close(&mut self) -> Result<()> {
        for env in self.envs.iter_mut() {
            env.close()?;
        }
        Ok(())
    }
}
