//! Environment wrapper exposing the score of the current game.
//!
//! Emulators report reward incrementally: every tick yields only what was
//! gained during that tick. [`ScoreTracking`] accumulates these increments into
//! a running score and reports it in the step info, next to the life counter.
use crate::{error::CaptureError, DiscreteAct, Env, InfoMap, Obs, Step, StepInfo};
use anyhow::Result;
use log::trace;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Native interface of an arcade emulator.
pub trait Emulator {
    /// Observation of the emulator.
    type Obs: Obs;

    /// Native actions available in the game; action indices point into this set.
    fn action_set(&self) -> &[i64];

    /// Advances the game by one tick and returns the reward gained during it.
    fn act(&mut self, action: i64) -> f32;

    /// Returns `true` when all lives are exhausted.
    fn game_over(&self) -> bool;

    /// Remaining lives.
    fn lives(&self) -> u32;

    /// Current observation.
    fn observe(&self) -> Self::Obs;

    /// Starts a new game.
    fn reset_game(&mut self);
}

/// Number of emulator ticks per environment step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameSkip {
    /// Always the same number of ticks.
    Fixed(u32),

    /// Uniformly sampled from `low..high`.
    Random {
        /// Inclusive lower bound.
        low: u32,
        /// Exclusive upper bound.
        high: u32,
    },
}

impl Default for FrameSkip {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Wraps an [`Emulator`] and reports the running score in [`InfoMap::score`].
///
/// The reported score lags by one step: it is the sum of the rewards of all
/// previous steps of the current game, excluding the reward of the step that
/// reports it. When the game is over, the running score restarts from zero.
pub struct ScoreTracking<M: Emulator> {
    emulator: M,
    frame_skip: FrameSkip,
    rng: fastrand::Rng,
    running_score: Option<f32>,
}

impl<M: Emulator> ScoreTracking<M> {
    /// Wraps `emulator` with one tick per step.
    pub fn new(emulator: M) -> Self {
        Self {
            emulator,
            frame_skip: FrameSkip::default(),
            rng: fastrand::Rng::new(),
            running_score: None,
        }
    }

    /// Sets the number of ticks per step.
    pub fn frame_skip(mut self, frame_skip: FrameSkip) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// Seeds the sampler of [`FrameSkip::Random`].
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Score accumulated so far in the current game.
    pub fn running_score(&self) -> f32 {
        self.running_score.unwrap_or(0.0)
    }

    /// Returns the wrapped emulator.
    pub fn emulator(&self) -> &M {
        &self.emulator
    }

    fn n_ticks(&mut self) -> u32 {
        match self.frame_skip {
            FrameSkip::Fixed(n) => n,
            FrameSkip::Random { low, high } if high > low => self.rng.u32(low..high),
            FrameSkip::Random { low, .. } => low,
        }
    }

    fn native_action(&self, a: &DiscreteAct) -> Result<i64, CaptureError> {
        let actions = self.emulator.action_set();
        let index = a.act.first().copied().unwrap_or(-1);
        usize::try_from(index)
            .ok()
            .and_then(|ix| actions.get(ix))
            .copied()
            .ok_or(CaptureError::InvalidAction {
                index,
                n_actions: actions.len(),
            })
    }
}

impl<M: Emulator> Env for ScoreTracking<M> {
    type Obs = M::Obs;
    type Act = DiscreteAct;

    fn reset(&mut self) -> Result<M::Obs> {
        self.emulator.reset_game();
        Ok(self.emulator.observe())
    }

    fn step(&mut self, a: &DiscreteAct) -> Result<Step<Self>> {
        let action = self.native_action(a)?;
        let mut reward = 0f32;
        for _ in 0..self.n_ticks() {
            reward += self.emulator.act(action);
        }
        let obs = self.emulator.observe();
        let done = self.emulator.game_over();

        let score = self.running_score();
        self.running_score = Some(if done { 0.0 } else { score + reward });
        trace!("reward = {}, done = {}, score = {}", reward, done, score);

        let info = InfoMap {
            lives: Some(self.emulator.lives()),
            score: Some(score),
        };
        Ok(Step::new(
            obs,
            a.clone(),
            vec![reward],
            vec![done as i8],
            StepInfo::Map(info),
        ))
    }

    fn lives(&self) -> u32 {
        self.emulator.lives()
    }
}
