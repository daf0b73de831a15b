//! Scripted environments and policies, used for tests.
use crate::{
    score_tracking::Emulator, DiscreteAct, Env, InfoMap, Obs, Policy, Step, StepInfo,
};
use anyhow::Result;
use std::path::Path;

/// Observation holding the tick counter of each slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickObs(pub Vec<usize>);

impl Obs for TickObs {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn stack(slots: Vec<Self>) -> Self {
        TickObs(slots.into_iter().flat_map(|o| o.0).collect())
    }
}

/// Emulator replaying a fixed reward per tick.
///
/// The game is over once `game_over_at` ticks have elapsed since the last reset,
/// or when no life is left. Ticks past the end of `rewards` yield zero reward.
#[derive(Clone, Debug)]
pub struct ScriptedEmulator {
    rewards: Vec<f32>,
    game_over_at: Option<usize>,
    lives: u32,
    life_lost_at: Vec<usize>,
    tick: usize,
    action_set: Vec<i64>,
    acted: Vec<i64>,
}

impl ScriptedEmulator {
    /// Constructs the emulator.
    pub fn new(rewards: Vec<f32>, game_over_at: Option<usize>, lives: u32) -> Self {
        Self {
            rewards,
            game_over_at,
            lives,
            life_lost_at: vec![],
            tick: 0,
            action_set: vec![0, 1, 3, 4],
            acted: vec![],
        }
    }

    /// Makes a life be lost once each of the given tick counts is reached.
    pub fn life_lost_at(mut self, ticks: Vec<usize>) -> Self {
        self.life_lost_at = ticks;
        self
    }

    /// Number of ticks since the last reset.
    pub fn tick(&self) -> usize {
        self.tick
    }

    /// Native actions received so far.
    pub fn acted(&self) -> &[i64] {
        &self.acted
    }
}

impl Emulator for ScriptedEmulator {
    type Obs = TickObs;

    fn action_set(&self) -> &[i64] {
        &self.action_set
    }

    fn act(&mut self, action: i64) -> f32 {
        let reward = self.rewards.get(self.tick).copied().unwrap_or(0.0);
        self.acted.push(action);
        self.tick += 1;
        reward
    }

    fn game_over(&self) -> bool {
        self.lives() == 0 || matches!(self.game_over_at, Some(n) if self.tick >= n)
    }

    fn lives(&self) -> u32 {
        let lost = self.life_lost_at.iter().filter(|&&t| t <= self.tick).count();
        self.lives.saturating_sub(lost as u32)
    }

    fn observe(&self) -> TickObs {
        TickObs(vec![self.tick])
    }

    fn reset_game(&mut self) {
        self.tick = 0;
    }
}

/// One step of a [`ScriptedEnv`].
#[derive(Clone, Debug)]
pub struct ScriptedStep {
    /// Lives reported before the step is taken.
    pub lives: u32,

    /// Native done flag.
    pub done: bool,

    /// Metadata of the step.
    pub info: StepInfo,
}

impl ScriptedStep {
    /// A step whose info is a single-slot list carrying `score`.
    pub fn slot_score(lives: u32, done: bool, score: f32) -> Self {
        Self {
            lives,
            done,
            info: StepInfo::Slots(vec![InfoMap {
                lives: Some(lives),
                score: Some(score),
            }]),
        }
    }
}

/// Environment replaying a script of steps, cycling when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedEnv {
    script: Vec<ScriptedStep>,
    pos: usize,
    /// Number of calls to [`Env::reset`].
    pub n_resets: usize,
    /// Number of calls to [`Env::close`].
    pub n_closes: usize,
}

impl ScriptedEnv {
    /// Constructs the environment. `script` must not be empty.
    pub fn new(script: Vec<ScriptedStep>) -> Self {
        assert!(!script.is_empty());
        Self {
            script,
            pos: 0,
            n_resets: 0,
            n_closes: 0,
        }
    }

    fn current(&self) -> &ScriptedStep {
        &self.script[self.pos % self.script.len()]
    }
}

impl Env for ScriptedEnv {
    type Obs = TickObs;
    type Act = DiscreteAct;

    fn reset(&mut self) -> Result<TickObs> {
        self.n_resets += 1;
        Ok(TickObs(vec![self.pos]))
    }

    fn step(&mut self, a: &DiscreteAct) -> Result<Step<Self>> {
        let current = self.current().clone();
        self.pos += 1;
        Ok(Step::new(
            TickObs(vec![self.pos]),
            a.clone(),
            vec![0.0],
            vec![current.done as i8],
            current.info,
        ))
    }

    fn lives(&self) -> u32 {
        self.current().lives
    }

    fn close(&mut self) -> Result<()> {
        self.n_closes += 1;
        Ok(())
    }
}

/// Policy choosing the same action in every slot.
#[derive(Clone, Debug)]
pub struct ConstantPolicy {
    act: i64,
    /// Number of calls to [`Policy::sample`].
    pub n_samples: usize,
}

impl ConstantPolicy {
    /// Constructs the policy.
    pub fn new(act: i64) -> Self {
        Self { act, n_samples: 0 }
    }
}

impl<E> Policy<E> for ConstantPolicy
where
    E: Env<Obs = TickObs, Act = DiscreteAct>,
{
    fn sample(&mut self, obs: &TickObs) -> DiscreteAct {
        self.n_samples += 1;
        DiscreteAct::new(vec![self.act; obs.len()])
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.act.to_string())?;
        Ok(())
    }
}

