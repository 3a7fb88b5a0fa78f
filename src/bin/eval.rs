//! Evaluates one or more match-output files and prints a top-n summary
//! table as CSV on stdout.
//!
//! ```text
//! ocl-eval -c loinc_code -n 5 results1.csv results2.xlsx
//! ocl-eval -c loinc_code -g cl -vv results.csv
//! ```

use std::path::PathBuf;

use anyhow::bail;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use ocl_match::constants::DEFAULT_TOP_N;
use ocl_match::eval::{EvalOptions, evaluate_table, summary_table};
use ocl_match::table::read_table;

#[derive(Parser)]
#[command(name = "ocl-eval")]
#[command(about = "Evaluate match output files and produce top-n metrics", long_about = None)]
struct Cli {
    /// Match output files to evaluate (CSV or XLSX)
    #[arg(required = true)]
    inputfiles: Vec<PathBuf>,

    /// Column name containing the correct map (e.g. loinc_code)
    #[arg(short = 'c', long)]
    correctmap: String,

    /// Number of top-n metrics to calculate
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    topn: usize,

    /// Column name to group results by (e.g. cl for class)
    #[arg(short = 'g', long)]
    groupby: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = EvalOptions {
        correct_map_column: cli.correctmap.clone(),
        top_n: cli.topn,
        groupby: cli.groupby.clone(),
    };

    let mut evaluations = Vec::new();
    for path in &cli.inputfiles {
        tracing::info!(path = %path.display(), "Processing file");

        let table = match read_table(path) {
            Ok(table) => table,
            Err(error) => {
                tracing::warn!(path = %path.display(), error = %error, "Skipping file");
                continue;
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match evaluate_table(&table, &filename, &options) {
            Ok(evaluation) => {
                tracing::info!(
                    filename,
                    valid_rows = evaluation.overall.valid_rows,
                    excluded_rows = evaluation.overall.excluded_rows,
                    new_concepts = evaluation.overall.skipped_rows,
                    "Evaluated"
                );
                evaluations.push(evaluation);
            }
            Err(error) => {
                tracing::warn!(filename, error = %error, "Skipping file");
            }
        }
    }

    if evaluations.is_empty() {
        bail!("no files were successfully evaluated");
    }

    let summary = summary_table(&evaluations, cli.topn, cli.groupby.is_some());
    summary.write_csv(std::io::stdout().lock())?;

    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
