#![warn(missing_docs)]
//! Evaluation of trained policies on arcade environments.
//!
//! A policy is played for a fixed number of complete games and the score of
//! each game is recorded:
//!
//! * [`registry`] classifies environment ids into families;
//! * [`score_tracking::ScoreTracking`] turns the incremental reward of an emulator
//!   into a running score reported in the step info;
//! * [`VecEnv`] runs several environments in lockstep;
//! * [`trial::TrialHarness`] plays games, telling lost lives from finished games;
//! * [`stats::summarize`] reduces the scores to summary statistics;
//! * [`Capture`] ties these together and writes the [`record`] tables.
pub mod dummy;
pub mod error;
pub mod record;
pub mod registry;
pub mod score_tracking;
pub mod stats;
pub mod trial;

mod base;
pub use base::{Act, DiscreteAct, Env, InfoMap, Obs, Policy, Step, StepInfo};

mod capture;
pub use capture::{model_id, Capture, CaptureReport};

mod config;
pub use config::CaptureConfig;

mod vec_env;
pub use vec_env::VecEnv;
