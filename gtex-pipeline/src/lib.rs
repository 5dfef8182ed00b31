//! gtex-pipeline: orchestration for the gtex toolkit.
//!
//! One pipeline run is metadata loading, grouping and count extraction under
//! a single [`Strategy`]. This crate wires the stages together and adds:
//! - the box plot workflow ([`run_boxplot`])
//! - the benchmark harness timing every strategy ([`benchmark`])
//! - per-group summary statistics ([`summarize_groups`])

pub mod bench;
pub mod summary;

pub use bench::{benchmark, BenchmarkReport, StrategyTiming};
pub use summary::{summarize_groups, write_summary_tsv, GroupSummary};

use anyhow::Context;
use gtex_core::{build_groups, extract_counts, GroupCounts, MetadataTable, Result, Strategy};
use gtex_io::{load_metadata, open_matrix};
use gtex_plotting::PlotConfig;
use std::path::{Path, PathBuf};
use tracing::{debug_span, info, info_span};

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Gzip-compressed (or plain) read count matrix
    pub matrix_path: PathBuf,
    /// Tab-separated sample-attributes table
    pub metadata_path: PathBuf,
    /// Gene symbol to extract
    pub gene: String,
    /// Metadata column to group by
    pub group_column: String,
    /// Metadata column holding sample ids
    pub id_column: String,
    pub strategy: Strategy,
}

impl PipelineConfig {
    pub fn new(
        matrix_path: impl Into<PathBuf>,
        metadata_path: impl Into<PathBuf>,
        gene: impl Into<String>,
        group_column: impl Into<String>,
    ) -> Self {
        Self {
            matrix_path: matrix_path.into(),
            metadata_path: metadata_path.into(),
            gene: gene.into(),
            group_column: group_column.into(),
            id_column: gtex_core::SAMPLE_ID_COLUMN.to_string(),
            strategy: Strategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }
}

/// Run the full pipeline under `config.strategy`.
pub fn run_pipeline(config: &PipelineConfig) -> Result<GroupCounts> {
    let _span = info_span!("pipeline", gene = %config.gene, strategy = %config.strategy).entered();
    let table = load_metadata(&config.metadata_path)?;
    group_and_extract(config, &table, config.strategy)
}

/// Grouping and extraction for an already loaded table. Each call builds
/// its own indexes and opens its own matrix stream.
pub(crate) fn group_and_extract(
    config: &PipelineConfig,
    table: &MetadataTable,
    strategy: Strategy,
) -> Result<GroupCounts> {
    let groups = {
        let _span = debug_span!("grouping", column = %config.group_column).entered();
        build_groups(table, &config.group_column, &config.id_column, strategy)?
    };

    let counts = {
        let _span = debug_span!("extraction", matrix = %config.matrix_path.display()).entered();
        let matrix = open_matrix(&config.matrix_path)?;
        extract_counts(matrix, &config.gene, &groups, strategy)?
    };

    info!(
        groups = counts.len(),
        values = counts.n_values(),
        "extracted counts"
    );
    Ok(counts)
}

/// Counts as `(label, values)` pairs for the plotting adapter.
pub fn plot_groups(counts: &GroupCounts) -> Vec<(String, Vec<f64>)> {
    counts.labels().into_iter().zip(counts.values()).collect()
}

/// Run the pipeline and draw the box plot to `output_path`.
///
/// The plot title defaults to the gene symbol and the x axis description to
/// the grouping column.
pub fn run_boxplot(
    config: &PipelineConfig,
    output_path: &Path,
    mut plot_config: PlotConfig,
) -> anyhow::Result<GroupCounts> {
    let counts = run_pipeline(config)
        .with_context(|| format!("Failed to extract counts for gene '{}'", config.gene))?;

    plot_config.title.get_or_insert_with(|| config.gene.clone());
    plot_config
        .x_desc
        .get_or_insert_with(|| config.group_column.clone());

    gtex_plotting::boxplot(&plot_groups(&counts), output_path, plot_config)
        .with_context(|| format!("Failed to write plot {}", output_path.display()))?;

    info!(path = %output_path.display(), "wrote box plot");
    Ok(counts)
}
