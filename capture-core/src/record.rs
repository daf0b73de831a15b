//! Tab-separated result tables.
//!
//! Two tables are written per evaluated model:
//!
//! * the score table, `model_scores_<model-id>.tsv`, one `model<TAB>score` row per game
//!   and no header;
//! * the action log, `saved_steps_<model-id>.tsv`, with the header `model<TAB>step<TAB>action`
//!   followed by one row per step: the model id, the step index and the action of every slot.
use crate::Act;
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Header of the action log.
pub const ACTION_LOG_HEADER: [&str; 3] = ["model", "step", "action"];

/// A row of the score table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Model id.
    pub model: String,

    /// Score of a game.
    pub score: f32,
}

/// A row of the action log.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRow {
    /// Model id.
    pub model: String,

    /// Index of the step across all games.
    pub step: usize,

    /// Action of each slot.
    pub action: Vec<String>,
}

/// Path of the score table of `model_id`.
pub fn scores_path(data_dir: &Path, model_id: &str) -> PathBuf {
    data_dir.join(format!("model_scores_{}.tsv", model_id))
}

/// Path of the action log of `model_id`.
pub fn actions_path(gameplay_dir: &Path, model_id: &str) -> PathBuf {
    gameplay_dir.join(format!("saved_steps_{}.tsv", model_id))
}

/// Writes the score table.
pub fn write_scores<W: Write>(wtr: W, model_id: &str, scores: &[f32]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(wtr);
    for &score in scores {
        wtr.serialize(ScoreRow {
            model: model_id.to_string(),
            score,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads a score table.
pub fn read_scores<R: Read>(rdr: R) -> Result<Vec<ScoreRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(rdr);
    let rows = rdr.deserialize().collect::<Result<Vec<ScoreRow>, _>>()?;
    Ok(rows)
}

/// Writes the action log.
pub fn write_actions<W: Write, A: Act>(wtr: W, model_id: &str, actions: &[A]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_writer(wtr);
    wtr.write_record(&ACTION_LOG_HEADER)?;
    for (i, act) in actions.iter().enumerate() {
        let mut row = vec![model_id.to_string(), i.to_string()];
        row.extend(act.fields());
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Reads an action log.
pub fn read_actions<R: Read>(rdr: R) -> Result<Vec<ActionRow>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .has_headers(true)
        .from_reader(rdr);
    let mut rows = vec![];
    for record in rdr.records() {
        let record = record?;
        let model = record.get(0).context("action log row has no model column")?;
        let step = record
            .get(1)
            .context("action log row has no step column")?
            .parse()?;
        rows.push(ActionRow {
            model: model.to_string(),
            step,
            action: record.iter().skip(2).map(|s| s.to_string()).collect(),
        });
    }
    Ok(rows)
}

fn create(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

/// Writes the score table to `path`, creating parent directories.
pub fn save_scores(path: &Path, model_id: &str, scores: &[f32]) -> Result<()> {
    write_scores(create(path)?, model_id, scores)
}

/// Writes the action log to `path`, creating parent directories.
pub fn save_actions<A: Act>(path: &Path, model_id: &str, actions: &[A]) -> Result<()> {
    write_actions(create(path)?, model_id, actions)
}
