//! Benchmark harness: the same pipeline once per lookup strategy.

use crate::{group_and_extract, PipelineConfig};
use gtex_core::{GroupCounts, GtexError, Result, Strategy};
use gtex_io::load_metadata;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{info, info_span};

/// Wall-clock time of one strategy's metadata load, grouping and extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyTiming {
    pub strategy: Strategy,
    pub elapsed: Duration,
}

impl StrategyTiming {
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Timings in [`Strategy::ALL`] order plus the counts every strategy agreed on.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub timings: Vec<StrategyTiming>,
    pub counts: GroupCounts,
}

impl BenchmarkReport {
    /// The fastest strategy, if any run was timed.
    pub fn fastest(&self) -> Option<&StrategyTiming> {
        self.timings.iter().min_by_key(|t| t.elapsed)
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fastest = self.fastest().map(|t| t.strategy);
        for timing in &self.timings {
            write!(f, "{}: {:.3} ms", timing.strategy.label(), timing.millis())?;
            if fastest == Some(timing.strategy) {
                write!(f, " (fastest)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Time the pipeline under every strategy, sequentially.
///
/// Every run reloads the metadata, builds fresh indexes and reopens the
/// matrix. Runs that disagree on the extracted counts fail with
/// [`GtexError::StrategyMismatch`].
pub fn benchmark(config: &PipelineConfig) -> Result<BenchmarkReport> {
    let mut timings = Vec::with_capacity(Strategy::ALL.len());
    let mut reference: Option<(Strategy, GroupCounts)> = None;

    for strategy in Strategy::ALL {
        let _span = info_span!("benchmark", strategy = %strategy).entered();

        let start = Instant::now();
        let table = load_metadata(&config.metadata_path)?;
        let counts = group_and_extract(config, &table, strategy)?;
        let elapsed = start.elapsed();

        info!(elapsed_ms = elapsed.as_secs_f64() * 1000.0, "strategy finished");
        timings.push(StrategyTiming { strategy, elapsed });

        match &reference {
            Some((first, expected)) if *expected != counts => {
                return Err(GtexError::StrategyMismatch {
                    left: first.to_string(),
                    right: strategy.to_string(),
                });
            }
            Some(_) => {}
            None => reference = Some((strategy, counts)),
        }
    }

    Ok(BenchmarkReport {
        timings,
        counts: reference.map(|(_, counts)| counts).unwrap_or_default(),
    })
}
