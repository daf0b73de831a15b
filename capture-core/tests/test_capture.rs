use anyhow::Result;
use capture_core::{
    dummy::{ConstantPolicy, ScriptedEmulator},
    record::{read_actions, read_scores},
    score_tracking::ScoreTracking,
    Capture, CaptureConfig, VecEnv,
};
use std::fs::{self, File};
use tempdir::TempDir;

// The only test in this binary, since it changes the working directory.
#[test]
fn test_capture_writes_tables_once() -> Result<()> {
    let tmp_dir = TempDir::new("capture")?;
    std::env::set_current_dir(tmp_dir.path())?;
    fs::create_dir_all("models/catcher_0")?;
    fs::write("models/catcher_0/model", "")?;

    let config = CaptureConfig::new("Catcher-v0", "models/catcher_0/model")
        .n_trials(3)
        .num_env(2)
        .save_path(Some("saved/catcher_0".into()));
    let capture = Capture::new(config)?;
    assert_eq!(capture.model_id(), "catcher_0");
    assert!(capture.is_pending());

    let envs = (0..2)
        .map(|_| ScoreTracking::new(ScriptedEmulator::new(vec![2.0; 5], Some(5), 1)))
        .collect();
    let mut env = VecEnv::new(envs)?;
    let mut policy = ConstantPolicy::new(1);
    let report = capture.run(&mut env, &mut policy)?;

    assert_eq!(report.outcome.scores(), vec![8.0, 8.0, 8.0]);
    assert_eq!(report.summary.mean, 8.0);
    assert_eq!(report.summary.stdev, 0.0);

    let rows = read_scores(File::open(&report.scores_path)?)?;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.model == "catcher_0" && r.score == 8.0));

    let rows = read_actions(File::open(&report.actions_path)?)?;
    assert_eq!(rows.len(), 15);
    assert_eq!(rows[14].step, 14);
    assert_eq!(rows[14].action, vec!["1", "1"]);

    assert_eq!(fs::read_to_string("saved/catcher_0")?, "1");
    assert!(!capture.is_pending());
    Ok(())
}
