//! Configuration of [`Capture`](crate::Capture).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

fn default_n_trials() -> usize {
    100
}

fn default_num_env() -> usize {
    1
}

fn default_seed() -> i64 {
    9874
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_gameplay_dir() -> PathBuf {
    PathBuf::from("gameplay")
}

/// Configuration of a gameplay capture run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Environment id or family name.
    pub env: String,

    /// Path of the trained model, in the form `<dir>/<model-id>/...`.
    pub load_path: PathBuf,

    /// If set, the policy is saved here before it is evaluated.
    #[serde(default)]
    pub save_path: Option<PathBuf>,

    /// Number of games to play.
    #[serde(default = "default_n_trials")]
    pub n_trials: usize,

    /// Number of sub-environments.
    #[serde(default = "default_num_env")]
    pub num_env: usize,

    /// Seed of the environments, shared by every evaluated model.
    #[serde(default = "default_seed")]
    pub seed: i64,

    /// Directory of the score tables.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory of the action logs.
    #[serde(default = "default_gameplay_dir")]
    pub gameplay_dir: PathBuf,
}

impl CaptureConfig {
    /// Constructs a configuration with default values.
    pub fn new(env: impl Into<String>, load_path: impl Into<PathBuf>) -> Self {
        Self {
            env: env.into(),
            load_path: load_path.into(),
            save_path: None,
            n_trials: default_n_trials(),
            num_env: default_num_env(),
            seed: default_seed(),
            data_dir: default_data_dir(),
            gameplay_dir: default_gameplay_dir(),
        }
    }

    /// Loads the configuration from a YAML file.
    pub fn build_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Sets the save path.
    pub fn save_path(mut self, v: Option<PathBuf>) -> Self {
        self.save_path = v;
        self
    }

    /// Sets the number of games.
    pub fn n_trials(mut self, v: usize) -> Self {
        self.n_trials = v;
        self
    }

    /// Sets the number of sub-environments.
    pub fn num_env(mut self, v: usize) -> Self {
        self.num_env = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory of the score tables.
    pub fn data_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.data_dir = v.into();
        self
    }

    /// Sets the directory of the action logs.
    pub fn gameplay_dir(mut self, v: impl Into<PathBuf>) -> Self {
        self.gameplay_dir = v.into();
        self
    }
}
