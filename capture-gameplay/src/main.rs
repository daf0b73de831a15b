mod arcade;
mod args;
mod policy;
use anyhow::{bail, Result};
use args::Args;
use capture_core::{
    registry::{build_registry_from, GYM_SPECS},
    Capture, CaptureConfig,
};
use clap::Parser;
use log::info;
use policy::RandomPolicy;

fn capture(config: CaptureConfig) -> Result<()> {
    let registry = build_registry_from(GYM_SPECS.iter().chain(arcade::ARCADE_SPECS));
    let target = registry.resolve(&config.env)?;
    info!("env_type: {}", target.family);

    let capture = Capture::new(config)?;
    if !capture.is_pending() {
        info!(
            "Skip {}: no model at {} or results already at {}",
            capture.model_id(),
            capture.config().load_path.display(),
            capture.scores_path().display()
        );
        return Ok(());
    }

    let config = capture.config();
    match target.family.as_str() {
        arcade::FAMILY => {
            let mut env = arcade::build_env(&target.env_id, config.num_env, config.seed)?;
            let mut policy = RandomPolicy::build_from_path(&config.load_path)?;
            let report = capture.run(&mut env, &mut policy)?;
            info!(
                "{} games of {} by {}, mean score {}",
                report.summary.n, target.env_id, report.model_id, report.summary.mean
            );
        }
        family => bail!("no emulator backend is linked for family {}", family),
    }

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Args::parse().capture_config()?;
    capture(config)
}

#[cfg(test)]
mod tests {
    use super::capture;
    use anyhow::Result;
    use capture_core::CaptureConfig;
    use std::fs;
    use tempdir::TempDir;

    // The only test here that changes the working directory. The others use absolute paths.
    #[test]
    fn test_capture_random_policy_on_catcher() -> Result<()> {
        let tmp_dir = TempDir::new("capture_gameplay")?;
        std::env::set_current_dir(tmp_dir.path())?;
        fs::create_dir_all("models/random_0")?;
        fs::write("models/random_0/policy.yaml", "n_actions: 3\nseed: 5\n")?;

        let config = CaptureConfig::new("CatcherNoFrameskip-v0", "models/random_0/policy.yaml")
            .n_trials(3)
            .num_env(2);

        capture(config.clone())?;
        let scores = fs::read_to_string("data/model_scores_random_0.tsv")?;
        assert_eq!(scores.lines().count(), 3);
        assert!(scores.lines().all(|l| l.starts_with("random_0\t")));
        assert!(fs::metadata("gameplay/saved_steps_random_0.tsv")?.len() > 0);

        // A second run finds the results and skips.
        let modified = fs::metadata("data/model_scores_random_0.tsv")?.modified()?;
        capture(config)?;
        assert_eq!(fs::metadata("data/model_scores_random_0.tsv")?.modified()?, modified);
        Ok(())
    }

    #[test]
    fn test_family_without_backend() -> Result<()> {
        let tmp_dir = TempDir::new("capture_gameplay")?;
        let load_path = tmp_dir.path().join("models/p/policy.yaml");
        fs::create_dir_all(load_path.parent().unwrap())?;
        fs::write(&load_path, "n_actions: 3\nseed: 5\n")?;
        let config = CaptureConfig::new("mujoco", load_path).data_dir(tmp_dir.path().join("data"));
        assert!(capture(config).is_err());
        Ok(())
    }
}
