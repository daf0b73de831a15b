//! Classification of environment identifiers into families.
//!
//! A family is the module an environment's entry point lives in, e.g. every
//! environment whose entry point is `gym.envs.atari:AtariEnv` belongs to `atari`.
//! The registry is built once, then passed by reference to whoever needs to
//! resolve an identifier.
use crate::error::CaptureError;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Name of the family whose members are declared statically.
pub const RETRO_FAMILY: &str = "retro";

/// Members of the [`RETRO_FAMILY`].
///
/// These cannot be enumerated from the emulator package without loading its
/// native library, so they are listed here.
pub const RETRO_GAMES: &[&str] = &[
    "BubbleBobble-Nes",
    "SuperMarioBros-Nes",
    "TwinBee3PokoPokoDaimaou-Nes",
    "SpaceHarrier-Nes",
    "SonicTheHedgehog-Genesis",
    "Vectorman-Genesis",
    "FinalFight-Snes",
    "SpaceInvaders-Snes",
];

/// A registered environment: its id and the entry point constructing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvSpec {
    /// Environment id, e.g. `PongNoFrameskip-v4`.
    pub id: &'static str,

    /// Entry point in the form `package.module:Constructor`.
    pub entry_point: &'static str,
}

impl EnvSpec {
    /// Constructs an entry.
    pub const fn new(id: &'static str, entry_point: &'static str) -> Self {
        Self { id, entry_point }
    }

    /// The last segment of the entry point's module path.
    pub fn family(&self) -> &'static str {
        let module = self.entry_point.split(':').next().unwrap_or(self.entry_point);
        module.rsplit('.').next().unwrap_or(module)
    }
}

/// Environments known at build time.
pub const GYM_SPECS: &[EnvSpec] = &[
    EnvSpec::new("AmidarNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("AsteroidsNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("BeamRiderNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("BreakoutNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("EnduroNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("MsPacmanNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("PongNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("QbertNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("SeaquestNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("SpaceInvadersNoFrameskip-v4", "gym.envs.atari:AtariEnv"),
    EnvSpec::new("Acrobot-v1", "gym.envs.classic_control:AcrobotEnv"),
    EnvSpec::new("CartPole-v1", "gym.envs.classic_control:CartPoleEnv"),
    EnvSpec::new("MountainCar-v0", "gym.envs.classic_control:MountainCarEnv"),
    EnvSpec::new("Pendulum-v0", "gym.envs.classic_control:PendulumEnv"),
    EnvSpec::new("BipedalWalker-v2", "gym.envs.box2d:BipedalWalker"),
    EnvSpec::new("CarRacing-v0", "gym.envs.box2d:CarRacing"),
    EnvSpec::new("LunarLander-v2", "gym.envs.box2d:LunarLander"),
    EnvSpec::new("Ant-v2", "gym.envs.mujoco:AntEnv"),
    EnvSpec::new("HalfCheetah-v2", "gym.envs.mujoco:HalfCheetahEnv"),
    EnvSpec::new("Hopper-v2", "gym.envs.mujoco:HopperEnv"),
    EnvSpec::new("Humanoid-v2", "gym.envs.mujoco:HumanoidEnv"),
    EnvSpec::new("Walker2d-v2", "gym.envs.mujoco:Walker2dEnv"),
    EnvSpec::new("Blackjack-v0", "gym.envs.toy_text:BlackjackEnv"),
    EnvSpec::new("FrozenLake-v0", "gym.envs.toy_text:FrozenLakeEnv"),
    EnvSpec::new("Taxi-v2", "gym.envs.toy_text:TaxiEnv"),
    EnvSpec::new("Copy-v0", "gym.envs.algorithmic:CopyEnv"),
    EnvSpec::new("Reverse-v0", "gym.envs.algorithmic:ReverseEnv"),
    EnvSpec::new("FetchReach-v1", "gym.envs.robotics:FetchReachEnv"),
    EnvSpec::new("HandManipulateBlock-v0", "gym.envs.robotics:HandBlockEnv"),
];

/// A family name and a member id of that family.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Family name, e.g. `atari`.
    pub family: String,

    /// Environment id.
    pub env_id: String,
}

/// Mapping from family names to the environment ids they contain.
///
/// Nothing prevents one id from being listed under two families. When that
/// happens, [`FamilyRegistry::resolve`] returns whichever family comes first
/// in name order; callers should not rely on it.
#[derive(Clone, Debug, Default)]
pub struct FamilyRegistry(BTreeMap<String, BTreeSet<String>>);

impl FamilyRegistry {
    /// Adds `env_id` to `family`, creating the family if needed.
    pub fn insert(&mut self, family: impl Into<String>, env_id: impl Into<String>) {
        self.0.entry(family.into()).or_default().insert(env_id.into());
    }

    /// Adds every id of `env_ids` to `family`.
    pub fn extend_family<I, S>(&mut self, family: &str, env_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for env_id in env_ids {
            self.insert(family, env_id);
        }
    }

    /// Returns the family names.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// Returns the members of a family.
    pub fn members(&self, family: &str) -> Option<&BTreeSet<String>> {
        self.0.get(family)
    }

    /// Returns `true` if `family` is a family name.
    pub fn is_family(&self, family: &str) -> bool {
        self.0.contains_key(family)
    }

    /// Classifies a requested identifier.
    ///
    /// A family name resolves to an arbitrary member of that family.
    /// An environment id resolves to itself, paired with the family containing it.
    pub fn resolve(&self, requested: &str) -> Result<ResolvedTarget, CaptureError> {
        if let Some(env_id) = self.0.get(requested).and_then(|ids| ids.iter().next()) {
            debug!("{} is a family, picked {}", requested, env_id);
            return Ok(ResolvedTarget {
                family: requested.to_string(),
                env_id: env_id.clone(),
            });
        }

        self.0
            .iter()
            .find(|(_, ids)| ids.contains(requested))
            .map(|(family, _)| ResolvedTarget {
                family: family.clone(),
                env_id: requested.to_string(),
            })
            .ok_or_else(|| CaptureError::UnknownEnvironment(requested.to_string()))
    }
}

/// Builds the registry from [`GYM_SPECS`] and the [`RETRO_FAMILY`].
pub fn build_registry() -> FamilyRegistry {
    build_registry_from(GYM_SPECS)
}

/// Builds the registry from the given entries and the [`RETRO_FAMILY`].
pub fn build_registry_from<'a, I>(specs: I) -> FamilyRegistry
where
    I: IntoIterator<Item = &'a EnvSpec>,
{
    let mut registry = FamilyRegistry::default();
    for spec in specs {
        registry.insert(spec.family(), spec.id);
    }
    registry.extend_family(RETRO_FAMILY, RETRO_GAMES.iter().copied());
    registry
}

/// Resolves `requested` against `registry`.
pub fn resolve(requested: &str, registry: &FamilyRegistry) -> Result<ResolvedTarget, CaptureError> {
    registry.resolve(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_entry_point() {
        assert_eq!(EnvSpec::new("Pong", "gym.envs.atari:AtariEnv").family(), "atari");
        assert_eq!(EnvSpec::new("X", "arcade:Catcher").family(), "arcade");
        assert_eq!(EnvSpec::new("Y", "pkg.sub.mod").family(), "mod");
    }

    #[test]
    fn test_every_instance_id_resolves_to_itself() {
        let registry = build_registry();
        for spec in GYM_SPECS {
            let target = resolve(spec.id, &registry).unwrap();
            assert_eq!(target.env_id, spec.id);
            assert_eq!(target.family, spec.family());
        }
        let target = resolve("SonicTheHedgehog-Genesis", &registry).unwrap();
        assert_eq!(target.family, RETRO_FAMILY);
    }

    #[test]
    fn test_family_name_resolves_to_a_member() {
        let registry = build_registry();
        for family in ["atari", "mujoco", "retro", "classic_control"] {
            let target = registry.resolve(family).unwrap();
            assert_eq!(target.family, family);
            assert!(registry.members(family).unwrap().contains(&target.env_id));
        }
    }

    #[test]
    fn test_unknown_identifier() {
        let registry = build_registry();
        match registry.resolve("NoSuchGame-v9") {
            Err(CaptureError::UnknownEnvironment(id)) => assert_eq!(id, "NoSuchGame-v9"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_insertion_is_silent() {
        let mut registry = build_registry_from(&[EnvSpec::new("A-v0", "x.fam:A")]);
        registry.insert("fam", "A-v0");
        registry.insert("fam", "B-v0");
        assert_eq!(registry.members("fam").unwrap().len(), 2);
        assert!(registry.is_family(RETRO_FAMILY));
        assert_eq!(registry.members(RETRO_FAMILY).unwrap().len(), RETRO_GAMES.len());
    }
}
