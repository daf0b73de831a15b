//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The requested identifier is neither a family name nor a known environment id.
    #[error("env_id {0} is not recognized in env types")]
    UnknownEnvironment(String),

    /// Spread statistics need at least two episode scores.
    #[error("at least 2 scores are required for summary statistics, got {0}")]
    InsufficientSample(usize),

    /// A slot of a vectorized step did not report a score.
    #[error("slot {slot} of the step info has no score")]
    MissingScore {
        /// Index of the sub-environment.
        slot: usize,
    },

    /// The life-span being finalized holds an observation that is not a number.
    #[error("session scores contain the key name 'score', which has no numeric order")]
    NonNumericScore,

    /// An action index outside the emulator's action set.
    #[error("action index {index} is out of the action set of size {n_actions}")]
    InvalidAction {
        /// The requested index.
        index: i64,
        /// Size of the action set.
        n_actions: usize,
    },

    /// A vectorized environment needs at least one sub-environment.
    #[error("vectorized environment has no sub-environment")]
    EmptyVecEnv,

    /// The model id cannot be derived from the load path.
    #[error("cannot derive a model id from load path {0}")]
    InvalidLoadPath(String),
}
