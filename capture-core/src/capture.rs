//! Evaluation of a trained model with persisted results.
use crate::{
    error::CaptureError,
    record::{actions_path, save_actions, save_scores, scores_path},
    stats::{summarize, Summary},
    trial::{TrialHarness, TrialOutcome},
    CaptureConfig, Env, Policy,
};
use anyhow::Result;
use log::info;
use std::path::{Path, PathBuf};

/// Derives the model id from a load path of the form `<dir>/<model-id>/...`.
pub fn model_id(load_path: &Path) -> Result<String, CaptureError> {
    let invalid = || CaptureError::InvalidLoadPath(load_path.display().to_string());
    let s = load_path.to_str().ok_or_else(invalid)?;
    match s.split('/').nth(1) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(invalid()),
    }
}

/// Results of [`Capture::run`].
#[derive(Debug)]
pub struct CaptureReport<A> {
    /// Model id.
    pub model_id: String,

    /// Summary of the scores.
    pub summary: Summary,

    /// Completed games and actions.
    pub outcome: TrialOutcome<A>,

    /// Where the score table was written.
    pub scores_path: PathBuf,

    /// Where the action log was written.
    pub actions_path: PathBuf,
}

/// Plays a trained model and records its scores and actions.
pub struct Capture {
    config: CaptureConfig,
    model_id: String,
}

impl Capture {
    /// Constructs the capture, deriving the model id from the load path.
    pub fn new(config: CaptureConfig) -> Result<Self, CaptureError> {
        let model_id = model_id(&config.load_path)?;
        Ok(Self { config, model_id })
    }

    /// Model id.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Configuration.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Path of the score table.
    pub fn scores_path(&self) -> PathBuf {
        scores_path(&self.config.data_dir, &self.model_id)
    }

    /// Path of the action log.
    pub fn actions_path(&self) -> PathBuf {
        actions_path(&self.config.gameplay_dir, &self.model_id)
    }

    /// Returns `true` when the model exists and has not been evaluated yet.
    pub fn is_pending(&self) -> bool {
        self.config.load_path.exists() && !self.scores_path().exists()
    }

    /// Plays `config.n_trials` games, then writes the score table and the action log.
    ///
    /// `env` is closed once the games are over.
    pub fn run<E, P>(&self, env: &mut E, policy: &mut P) -> Result<CaptureReport<E::Act>>
    where
        E: Env,
        P: Policy<E>,
    {
        if let Some(save_path) = &self.config.save_path {
            if let Some(parent) = save_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            policy.save_params(save_path)?;
        }

        info!("Running trained model {}", self.model_id);
        let outcome = TrialHarness::new(self.config.n_trials).run(env, policy)?;
        env.close()?;

        let scores = outcome.scores();
        let summary = summarize(&scores)?;
        for line in summary.to_string().lines() {
            info!("{}", line);
        }

        let scores_path = self.scores_path();
        let actions_path = self.actions_path();
        save_scores(&scores_path, &self.model_id, &scores)?;
        save_actions(&actions_path, &self.model_id, &outcome.actions)?;
        info!("Saved {}", scores_path.display());

        Ok(CaptureReport {
            model_id: self.model_id.clone(),
            summary,
            outcome,
            scores_path,
            actions_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{ConstantPolicy, ScriptedEmulator},
        score_tracking::ScoreTracking,
        VecEnv,
    };

    #[test]
    fn test_model_id_is_second_component() {
        assert_eq!(model_id(Path::new("models/ppo2_pong_0/model")).unwrap(), "ppo2_pong_0");
        assert_eq!(model_id(Path::new("models/abc")).unwrap(), "abc");
    }

    #[test]
    fn test_model_id_needs_two_components() {
        assert!(matches!(
            model_id(Path::new("model.pkl")),
            Err(CaptureError::InvalidLoadPath(_))
        ));
        assert!(model_id(Path::new("models//x")).is_err());
    }

    #[test]
    fn test_single_game_writes_nothing() -> Result<()> {
        let tmp_dir = tempdir::TempDir::new("capture")?;
        let config = CaptureConfig::new("Catcher-v0", "models/one_game/model")
            .n_trials(1)
            .data_dir(tmp_dir.path().join("data"))
            .gameplay_dir(tmp_dir.path().join("gameplay"));
        let capture = Capture::new(config)?;

        let emulator = ScriptedEmulator::new(vec![1.0; 3], Some(3), 1);
        let mut env = VecEnv::new(vec![ScoreTracking::new(emulator)])?;
        let mut policy = ConstantPolicy::new(0);
        let err = capture.run(&mut env, &mut policy).err().unwrap();

        assert!(matches!(
            err.downcast_ref::<CaptureError>(),
            Some(CaptureError::InsufficientSample(1))
        ));
        assert!(!capture.scores_path().exists());
        assert!(!capture.actions_path().exists());
        Ok(())
    }
}
