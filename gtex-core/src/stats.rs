//! Descriptive statistics over group counts.

use crate::error::{GtexError, Result};

/// Arithmetic mean. Empty input is a degenerate-input error.
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(GtexError::EmptyInput { what: "mean" });
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (divides by n).
pub fn stdev(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(GtexError::EmptyInput { what: "stdev" });
    }
    let mu = mean(values)?;
    let ss: f64 = values.iter().map(|x| (mu - x).powi(2)).sum();
    Ok((ss / values.len() as f64).sqrt())
}

/// Median of the values; averages the two middle values for even lengths.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(GtexError::EmptyInput { what: "median" });
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Ok(sorted[mid])
    }
}

/// Summary of one group's counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    pub stdev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

pub fn summarize(values: &[f64]) -> Result<Summary> {
    Ok(Summary {
        n: values.len(),
        mean: mean(values)?,
        stdev: stdev(values)?,
        median: median(values)?,
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}
