//! # gtex: per-group read count box plots
//!
//! ## Usage
//! ```bash
//! # Box plot of one gene across tissues
//! gtex plot --gene-reads reads.gct.gz --sample-attributes attributes.txt \
//!     --gene ACTA2 --group-type SMTS --output-file ACTA2.svg
//!
//! # Time the three lookup strategies on the same inputs
//! gtex bench --gene-reads reads.gct.gz --sample-attributes attributes.txt \
//!     --gene ACTA2 --group-type SMTS
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gtex_core::{ErrorKind, GtexError, Strategy};
use gtex_pipeline::{
    benchmark, run_boxplot, run_pipeline, summarize_groups, write_summary_tsv, PipelineConfig,
};
use gtex_plotting::{OutputFormat, PlotConfig, Theme};
use std::path::PathBuf;
use tracing::info;

/// gtex: group samples by a metadata column and plot one gene's read counts
#[derive(Parser)]
#[command(name = "gtex", version, about)]
struct Cli {
    /// Log debug detail to stderr (GTEX_LOG overrides the filter)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Inputs shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Gene read count matrix (GCT, gzip-compressed or plain; `-` for stdin)
    #[arg(long)]
    gene_reads: PathBuf,

    /// Sample attributes table (tab-separated, header line first)
    #[arg(long)]
    sample_attributes: PathBuf,

    /// Gene symbol to extract (matched against the matrix Description field)
    #[arg(long)]
    gene: String,

    /// Metadata column to group samples by (e.g., SMTS)
    #[arg(long)]
    group_type: String,

    /// Metadata column holding the sample ids
    #[arg(long, default_value = gtex_core::SAMPLE_ID_COLUMN)]
    id_column: String,
}

impl InputArgs {
    fn pipeline_config(&self, strategy: Strategy) -> PipelineConfig {
        PipelineConfig::new(
            &self.gene_reads,
            &self.sample_attributes,
            &self.gene,
            &self.group_type,
        )
        .with_id_column(&self.id_column)
        .with_strategy(strategy)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a box plot of the gene's read counts per group
    Plot {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (.svg; .png with the `png` feature)
        #[arg(long)]
        output_file: PathBuf,

        /// Lookup strategy: linear, binary or hash
        #[arg(long, default_value = "hash")]
        strategy: String,

        /// Plot width in pixels
        #[arg(long, default_value_t = 1500)]
        width: u32,

        /// Plot height in pixels
        #[arg(long, default_value_t = 500)]
        height: u32,

        /// Color theme (classic, nature, colorful, dark, high_contrast)
        #[arg(long, default_value = "classic")]
        theme: String,
    },

    /// Time grouping and extraction under every lookup strategy
    Bench {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print per-group n, mean, population stdev, median, min and max as TSV
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Lookup strategy: linear, binary or hash
        #[arg(long, default_value = "hash")]
        strategy: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Initialize the stderr subscriber; `GTEX_LOG` takes precedence over `--verbose`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GTEX_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Configuration problems exit with 2, degenerate input with 3, anything else with 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    let kind = err
        .chain()
        .find_map(|e| e.downcast_ref::<GtexError>())
        .map(GtexError::kind);
    match kind {
        Some(ErrorKind::Configuration) => 2,
        Some(ErrorKind::DegenerateInput) => 3,
        _ => 1,
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Plot {
            input,
            output_file,
            strategy,
            width,
            height,
            theme,
        } => {
            let strategy: Strategy = strategy.parse()?;
            let theme = Theme::from_name(&theme).ok_or_else(|| {
                GtexError::config(format!(
                    "unknown theme '{}', expected one of: {}",
                    theme,
                    Theme::NAMES.join(", ")
                ))
            })?;
            match OutputFormat::from_path(&output_file) {
                Some(format) if format.is_supported() => {}
                _ => {
                    return Err(GtexError::config(format!(
                        "cannot write a plot to '{}' with this build",
                        output_file.display()
                    ))
                    .into())
                }
            }
            let plot_config = PlotConfig {
                width,
                height,
                theme,
                ..PlotConfig::default()
            };

            let counts = run_boxplot(&input.pipeline_config(strategy), &output_file, plot_config)?;
            info!(
                groups = counts.len(),
                values = counts.n_values(),
                path = %output_file.display(),
                "plot complete"
            );
        }

        Commands::Bench { input } => {
            let report = benchmark(&input.pipeline_config(Strategy::default()))?;
            print!("{report}");
        }

        Commands::Summary { input, strategy } => {
            let strategy: Strategy = strategy.parse()?;
            let counts = run_pipeline(&input.pipeline_config(strategy))?;
            write_summary_tsv(std::io::stdout().lock(), &summarize_groups(&counts)?)?;
        }
    }

    Ok(())
}
