//! Environment step.
use super::Env;

/// A side-channel mapping emitted by an environment step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfoMap {
    /// Remaining lives.
    pub lives: Option<u32>,

    /// Cumulative score of the current life-span.
    pub score: Option<f32>,
}

/// Shape of the metadata attached to a [`Step`].
#[derive(Clone, Debug, PartialEq)]
pub enum StepInfo {
    /// One mapping per sub-environment of a vectorized environment.
    Slots(Vec<InfoMap>),

    /// A single mapping of a non-vectorized environment.
    Map(InfoMap),

    /// No mapping.
    Empty,
}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: Vec<f32>,

    /// Flag denoting if episode is done.
    pub is_done: Vec<i8>,

    /// Side-channel metadata.
    pub info: StepInfo,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        is_done: Vec<i8>,
        info: StepInfo,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_done,
            info,
        }
    }

    #[inline]
    /// Done flag of the first slot.
    pub fn is_done(&self) -> bool {
        self.is_done[0] == 1
    }
}
