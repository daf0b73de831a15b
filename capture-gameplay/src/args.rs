use anyhow::{Context, Result};
use capture_core::CaptureConfig;
use clap::Parser;
use std::path::PathBuf;

/// Play a trained policy and record its scores and actions
#[derive(Clone, Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// YAML file with the whole configuration.
    /// When given, the other options are ignored.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Environment id or family name
    #[arg(long)]
    pub env: Option<String>,

    /// Path of the trained model, `<dir>/<model-id>/...`
    #[arg(long)]
    pub load_path: Option<PathBuf>,

    /// Where to save the policy before playing
    #[arg(long)]
    pub save_path: Option<PathBuf>,

    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    pub n_trials: usize,

    /// Number of sub-environments
    #[arg(long, default_value_t = 1)]
    pub num_env: usize,

    /// Seed of the environments
    #[arg(long, default_value_t = 9874)]
    pub seed: i64,

    /// Directory of the score tables
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory of the action logs
    #[arg(long, default_value = "gameplay")]
    pub gameplay_dir: PathBuf,
}

impl Args {
    /// Builds the configuration from the YAML file or the options.
    pub fn capture_config(&self) -> Result<CaptureConfig> {
        if let Some(path) = &self.config {
            return CaptureConfig::build_from_path(path)
                .with_context(|| format!("failed to load {}", path.display()));
        }

        let env = self.env.clone().context("--env is required without --config")?;
        let load_path = self
            .load_path
            .clone()
            .context("--load-path is required without --config")?;
        Ok(CaptureConfig::new(env, load_path)
            .save_path(self.save_path.clone())
            .n_trials(self.n_trials)
            .num_env(self.num_env)
            .seed(self.seed)
            .data_dir(self.data_dir.clone())
            .gameplay_dir(self.gameplay_dir.clone()))
    }
}
