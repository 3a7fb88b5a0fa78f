//! Ranks a fixed candidate pool of LOINC codes against a free-text query
//! with a cross-encoder and prints the pool sorted by relevance.
//!
//! ```text
//! ocl-rank "hemoglobin level in blood"
//! ocl-rank --model ./models/ms-marco-minilm --pool ./pool.csv "platelet count"
//! ```
//!
//! Without `--model` (or `OCL_RERANKER_PATH`) a deterministic lexical stub
//! score is used.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use ocl_match::ranker::{CrossEncoder, RankerConfig, default_pool, pool_from_csv};

#[derive(Parser)]
#[command(name = "ocl-rank")]
#[command(about = "Rank LOINC candidates for a query using a cross-encoder", long_about = None)]
struct Cli {
    /// Free-text description of the medical concept
    #[arg(required = true)]
    query: String,

    /// Cross-encoder model directory (config.json, model.safetensors,
    /// tokenizer.json); falls back to OCL_RERANKER_PATH, then stub mode
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Candidate pool CSV with code and description columns
    /// (built-in lab test pool when omitted)
    #[arg(short, long)]
    pool: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.model {
        Some(path) => RankerConfig::new(path),
        None => RankerConfig::from_env(),
    };
    let encoder = CrossEncoder::load(config)?;
    if !encoder.is_model_loaded() {
        tracing::warn!("No model configured, scores come from the lexical stub");
    }

    let pool = match cli.pool {
        Some(ref path) => pool_from_csv(path)?,
        None => default_pool(),
    };

    let ranked = encoder.rank(&cli.query, &pool)?;

    println!("{:<12} {:<70} {:>8}", "CODE", "DESCRIPTION", "SCORE");
    for candidate in &ranked {
        println!(
            "{:<12} {:<70} {:>8.4}",
            candidate.code, candidate.display_name, candidate.score
        );
    }

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
