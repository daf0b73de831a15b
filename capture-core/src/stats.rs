//! Summary statistics over episode scores.
use crate::error::CaptureError;
use serde::Serialize;
use std::fmt;

/// Summary of a sample of episode scores.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    /// Number of scores.
    pub n: usize,

    /// Arithmetic mean.
    pub mean: f64,

    /// Median; the mean of the two middle values when `n` is even.
    pub median: f64,

    /// Standard error of the mean.
    pub stderr: f64,

    /// Sample standard deviation (`n - 1` degrees of freedom).
    pub stdev: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Avg score: {:.6}", self.mean)?;
        writeln!(f, "Median score: {:.6}", self.median)?;
        writeln!(f, "Std error score: {:.6}", self.stderr)?;
        write!(f, "Std dev score: {:.6}", self.stdev)
    }
}

fn mean(vs: &[f64]) -> f64 {
    vs.iter().sum::<f64>() / vs.len() as f64
}

fn median(mut vs: Vec<f64>) -> f64 {
    vs.sort_by(|x, y| x.total_cmp(y));
    let mid = vs.len() / 2;
    if vs.len() % 2 == 0 {
        (vs[mid - 1] + vs[mid]) / 2.0
    } else {
        vs[mid]
    }
}

fn stdev(vs: &[f64], mean: f64) -> f64 {
    let ss = vs.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (ss / (vs.len() - 1) as f64).sqrt()
}

/// Computes [`Summary`] of `scores`.
///
/// Fails with [`CaptureError::InsufficientSample`] for fewer than two scores.
pub fn summarize(scores: &[f32]) -> Result<Summary, CaptureError> {
    let n = scores.len();
    if n < 2 {
        return Err(CaptureError::InsufficientSample(n));
    }

    let vs: Vec<f64> = scores.iter().map(|&s| s as f64).collect();
    let mean = mean(&vs);
    let stdev = stdev(&vs, mean);

    Ok(Summary {
        n,
        mean,
        median: median(vs),
        stderr: stdev / (n as f64).sqrt(),
        stdev,
    })
}
