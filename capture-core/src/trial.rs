//! Runs a policy for a fixed number of complete games and records their scores.
use crate::{error::CaptureError, Env, Policy, StepInfo};
use anyhow::Result;
use log::{info, trace};
use ordered_float::OrderedFloat;
use std::{collections::HashSet, ops::Range};

/// Score observed when the step info has neither a list nor a mapping shape.
pub const MISSING_SCORE: f32 = -1.0;

/// A score reading extracted from the info of one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScoreObservation {
    /// A numeric score.
    Value(OrderedFloat<f32>),

    /// The key name `score` in place of a value.
    ///
    /// A single (non-vectorized) mapping yields the key name rather than the
    /// value it holds. Such an observation cannot be ordered against numbers,
    /// so finalizing a life-span that contains one fails.
    KeyName,
}

impl ScoreObservation {
    /// Reads the score of a step.
    ///
    /// For a per-slot list this is the mean of the slot scores.
    pub fn from_info(info: &StepInfo) -> Result<Self, CaptureError> {
        match info {
            StepInfo::Slots(slots) if !slots.is_empty() => {
                let mut total = 0f32;
                for (slot, m) in slots.iter().enumerate() {
                    total += m.score.ok_or(CaptureError::MissingScore { slot })?;
                }
                Ok(Self::value(total / slots.len() as f32))
            }
            StepInfo::Map(_) => Ok(Self::KeyName),
            _ => Ok(Self::value(MISSING_SCORE)),
        }
    }

    fn value(v: f32) -> Self {
        Self::Value(OrderedFloat(v))
    }
}

/// Distinct score observations since the current game began.
#[derive(Debug, Default)]
pub struct SessionScores(HashSet<ScoreObservation>);

impl SessionScores {
    /// Adds an observation; repeated values are kept once.
    pub fn observe(&mut self, obs: ScoreObservation) {
        self.0.insert(obs);
    }

    /// Number of distinct observations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was observed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the highest observation and clears the set.
    pub fn finalize(&mut self) -> Result<f32, CaptureError> {
        let observations = std::mem::take(&mut self.0);
        debug_assert!(!observations.is_empty());
        if observations.contains(&ScoreObservation::KeyName) {
            return Err(CaptureError::NonNumericScore);
        }
        Ok(observations
            .into_iter()
            .filter_map(|o| match o {
                ScoreObservation::Value(v) => Some(v),
                ScoreObservation::KeyName => None,
            })
            .max()
            .map_or(MISSING_SCORE, |v| v.into_inner()))
    }
}

/// A completed game.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSample {
    /// Final score.
    pub score: f32,

    /// Indices of the game's actions in [`TrialOutcome::actions`].
    pub steps: Range<usize>,
}

/// Output of [`TrialHarness::run`].
#[derive(Clone, Debug)]
pub struct TrialOutcome<A> {
    /// Completed games, in order of completion.
    pub episodes: Vec<EpisodeSample>,

    /// Every action taken, across all games.
    pub actions: Vec<A>,
}

impl<A> Default for TrialOutcome<A> {
    fn default() -> Self {
        Self {
            episodes: vec![],
            actions: vec![],
        }
    }
}

impl<A> TrialOutcome<A> {
    /// Scores of the completed games.
    pub fn scores(&self) -> Vec<f32> {
        self.episodes.iter().map(|e| e.score).collect()
    }

    /// Actions taken during the `ix`-th game.
    pub fn episode_actions(&self, ix: usize) -> &[A] {
        &self.actions[self.episodes[ix].steps.clone()]
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Plays complete games until a fixed number of them has been collected.
///
/// Environments may report done when a single life is lost. A step only ends
/// a game when it is done and the environment had one life left before it:
///
/// ```mermaid
/// stateDiagram-v2
///     InEpisode --> InEpisode: not done, or lives > 1
///     InEpisode --> EpisodeBoundary: done and lives == 1
///     EpisodeBoundary --> InEpisode: record max score, reset
/// ```
///
/// The score of a game is the highest distinct score observed during it.
/// Every action is kept in the outcome, whether or not it belongs to a
/// completed game.
///
/// The loop only returns once `n_trials` games are complete; an environment
/// that never reports done on its last life keeps it running.
pub struct TrialHarness {
    n_trials: usize,
}

impl TrialHarness {
    /// Constructs a harness collecting `n_trials` games.
    pub fn new(n_trials: usize) -> Self {
        Self { n_trials }
    }

    /// Runs `policy` on `env`.
    pub fn run<E, P>(&self, env: &mut E, policy: &mut P) -> Result<TrialOutcome<E::Act>>
    where
        E: Env,
        P: Policy<E>,
    {
        let mut outcome = TrialOutcome::default();
        if self.n_trials == 0 {
            return Ok(outcome);
        }

        let mut session = SessionScores::default();
        let mut obs = env.reset()?;
        let mut episode_start = 0;
        // The first frame is a start screen in some games, so indexing starts below zero.
        let mut count_step: i64 = -1;

        while outcome.episodes.len() < self.n_trials {
            count_step += 1;

            let act = policy.sample(&obs);
            outcome.actions.push(act.clone());

            let lives = env.lives();
            let step = env.step(&act)?;
            let done = lives == 1 && step.is_done();

            let observation = ScoreObservation::from_info(&step.info)?;
            trace!("step {}: lives = {}, score = {:?}", count_step, lives, observation);
            session.observe(observation);

            if done {
                let score = session.finalize()?;
                let episode_end = outcome.actions.len();
                outcome.episodes.push(EpisodeSample {
                    score,
                    steps: episode_start..episode_end,
                });
                info!("game {}: {}", outcome.episodes.len(), score);

                episode_start = episode_end;
                count_step = 0;
                obs = env.reset()?;
            } else {
                obs = step.obs;
            }
        }

        Ok(outcome)
    }
}

/// Runs `policy` on `env` until `n_trials` games are complete.
pub fn run_trials<E, P>(env: &mut E, policy: &mut P, n_trials: usize) -> Result<TrialOutcome<E::Act>>
where
    E: Env,
    P: Policy<E>,
{
    TrialHarness::new(n_trials).run(env, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{ConstantPolicy, ScriptedEnv, ScriptedStep},
        InfoMap,
    };
    use test_log::test;

    fn obs(v: f32) -> ScoreObservation {
        ScoreObservation::Value(OrderedFloat(v))
    }

    #[test]
    fn test_observation_is_mean_of_slots() {
        let info = StepInfo::Slots(vec![
            InfoMap {
                lives: Some(3),
                score: Some(10.0),
            },
            InfoMap {
                lives: Some(1),
                score: Some(20.0),
            },
        ]);
        assert_eq!(ScoreObservation::from_info(&info).unwrap(), obs(15.0));
    }

    #[test]
    fn test_observation_of_single_mapping_is_key_name() {
        // A mapping holding a numeric score still yields the key name.
        let info = StepInfo::Map(InfoMap {
            lives: Some(1),
            score: Some(42.0),
        });
        assert_eq!(ScoreObservation::from_info(&info).unwrap(), ScoreObservation::KeyName);
    }

    #[test]
    fn test_observation_without_mapping_is_sentinel() {
        assert_eq!(ScoreObservation::from_info(&StepInfo::Empty).unwrap(), obs(-1.0));
    }

    #[test]
    fn test_missing_slot_score() {
        let info = StepInfo::Slots(vec![
            InfoMap {
                lives: None,
                score: Some(1.0),
            },
            InfoMap::default(),
        ]);
        match ScoreObservation::from_info(&info) {
            Err(CaptureError::MissingScore { slot }) => assert_eq!(slot, 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_session_scores_deduplicate_and_take_max() {
        let mut session = SessionScores::default();
        for v in &[0.0, 5.0, 5.0, 3.0, -1.0, 5.0] {
            session.observe(obs(*v));
        }
        assert_eq!(session.len(), 4);
        assert_eq!(session.finalize().unwrap(), 5.0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_session_with_key_name_cannot_finalize() {
        let mut session = SessionScores::default();
        session.observe(obs(2.0));
        session.observe(ScoreObservation::KeyName);
        assert!(matches!(session.finalize(), Err(CaptureError::NonNumericScore)));
        assert!(session.is_empty());
    }

    #[test]
    fn test_intermediate_life_losses_are_not_games() -> Result<()> {
        // Three lives; done is flagged at every life loss.
        let mut env = ScriptedEnv::new(vec![
            ScriptedStep::slot_score(3, false, 0.0),
            ScriptedStep::slot_score(3, true, 4.0),
            ScriptedStep::slot_score(2, false, 0.0),
            ScriptedStep::slot_score(2, true, 6.0),
            ScriptedStep::slot_score(1, false, 0.0),
            ScriptedStep::slot_score(1, true, 2.0),
        ]);
        let mut policy = ConstantPolicy::new(1);
        let outcome = run_trials(&mut env, &mut policy, 2)?;

        assert_eq!(outcome.scores(), vec![6.0, 6.0]);
        assert_eq!(outcome.actions.len(), 12);
        assert_eq!(outcome.episodes[1].steps, 6..12);
        assert_eq!(outcome.episode_actions(0).len(), 6);
        // One initial reset, one per completed game.
        assert_eq!(env.n_resets, 3);
        Ok(())
    }

    #[test]
    fn test_exact_number_of_games() -> Result<()> {
        let mut env = ScriptedEnv::new(vec![
            ScriptedStep::slot_score(2, true, 1.0),
            ScriptedStep::slot_score(1, false, 3.0),
            ScriptedStep::slot_score(1, true, 3.0),
        ]);
        let mut policy = ConstantPolicy::new(0);
        for n in 1..6 {
            let outcome = run_trials(&mut env, &mut policy, n)?;
            assert_eq!(outcome.episodes.len(), n);
            assert!(outcome.scores().iter().all(|&s| s == 3.0));
        }
        Ok(())
    }

    #[test]
    fn test_zero_trials() -> Result<()> {
        let mut env = ScriptedEnv::new(vec![ScriptedStep::slot_score(1, true, 1.0)]);
        let mut policy = ConstantPolicy::new(0);
        let outcome = run_trials(&mut env, &mut policy, 0)?;
        assert!(outcome.episodes.is_empty());
        assert_eq!(policy.n_samples, 0);
        assert_eq!(env.n_resets, 0);
        Ok(())
    }

    #[test]
    fn test_single_mapping_info_fails_at_game_end() {
        let mut env = ScriptedEnv::new(vec![ScriptedStep {
            lives: 1,
            done: true,
            info: StepInfo::Map(InfoMap {
                lives: Some(1),
                score: Some(9.0),
            }),
        }]);
        let mut policy = ConstantPolicy::new(0);
        let err = run_trials(&mut env, &mut policy, 1).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::NonNumericScore)
        ));
    }

    #[test]
    fn test_info_without_mapping_scores_sentinel() -> Result<()> {
        let mut env = ScriptedEnv::new(vec![ScriptedStep {
            lives: 1,
            done: true,
            info: StepInfo::Empty,
        }]);
        let mut policy = ConstantPolicy::new(0);
        let outcome = run_trials(&mut env, &mut policy, 2)?;
        assert_eq!(outcome.scores(), vec![-1.0, -1.0]);
        Ok(())
    }
}
