//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::{InfoMap, Step, StepInfo};

/// A set of observations of an environment.
///
/// A vectorized environment holds one observation per sub-environment (slot),
/// so [`Obs::len`] is the number of slots.
pub trait Obs: Clone + Debug {
    /// Returns the number of observations in the object.
    fn len(&self) -> usize;

    /// Concatenates per-slot observations into a single batch.
    fn stack(slots: Vec<Self>) -> Self;
}

/// A set of actions of the environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    fn len(&self) -> usize;

    /// Returns the action for the sub-environment at `ix`.
    fn slot(&self, ix: usize) -> Self;

    /// Textual per-slot values, used as columns of the action log.
    fn fields(&self) -> Vec<String>;
}

/// Discrete actions, one index per slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscreteAct {
    /// Action indices.
    pub act: Vec<i64>,
}

impl DiscreteAct {
    /// Constructs a discrete action.
    pub fn new(act: Vec<i64>) -> Self {
        Self { act }
    }
}

impl From<Vec<i64>> for DiscreteAct {
    fn from(act: Vec<i64>) -> Self {
        Self { act }
    }
}

impl From<i64> for DiscreteAct {
    fn from(act: i64) -> Self {
        Self { act: vec![act] }
    }
}

impl Act for DiscreteAct {
    fn len(&self) -> usize {
        self.act.len()
    }

    fn slot(&self, ix: usize) -> Self {
        Self {
            act: vec![self.act[ix]],
        }
    }

    fn fields(&self) -> Vec<String> {
        self.act.iter().map(|a| a.to_string()).collect()
    }
}
