//! Matches a spreadsheet of clinical terms against an OCL repository via
//! the `$match` endpoint and writes the input table back out with ranked
//! candidate columns appended.
//!
//! ```text
//! ocl-match -t <token> -i terms.csv -o results.csv \
//!     -e https://api.dev.openconceptlab.org \
//!     -r /orgs/CIEL/sources/CIEL/v2024-10-04/
//!
//! # with top-n annotation and LOINC Part filtering:
//! ocl-match -t <token> -i terms.csv -o results.csv \
//!     --correctmap loinc_code --filter-loinc-type Part --filter-fetch-factor 3
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use ocl_match::client::HttpMatchClient;
use ocl_match::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_FETCH_FACTOR, DEFAULT_K_NEAREST, DEFAULT_MATCH_ENDPOINT,
    DEFAULT_NUM_CANDIDATES, DEFAULT_TARGET_REPO, DEFAULT_TOP_N,
};
use ocl_match::loinc::LoincType;
use ocl_match::matcher::{MatchOptions, result_columns, run_match};
use ocl_match::table::{FileFormat, read_table, write_table};

#[derive(Parser)]
#[command(name = "ocl-match")]
#[command(about = "Match terms to a target repository using the OCL $match API", long_about = None)]
struct Cli {
    /// OCL API token
    #[arg(short = 't', long)]
    token: String,

    /// File of input data to be mapped (CSV or XLSX)
    #[arg(short = 'i', long)]
    inputfile: PathBuf,

    /// Output file for the results (CSV or XLSX)
    #[arg(short = 'o', long)]
    outputfile: PathBuf,

    /// Target repository, e.g. /orgs/CIEL/sources/CIEL/v2024-10-04/
    #[arg(short = 'r', long, default_value = DEFAULT_TARGET_REPO)]
    repo: String,

    /// OCL API environment, e.g. https://api.qa.openconceptlab.org
    #[arg(short = 'e', long, default_value = "http://localhost:8000")]
    env: String,

    /// $match endpoint path
    #[arg(long, default_value = DEFAULT_MATCH_ENDPOINT)]
    endpoint: String,

    /// JSON file mapping input columns to the fields $match expects
    #[arg(long)]
    columnmap: Option<PathBuf>,

    /// Enable semantic search
    #[arg(short = 's', long)]
    semantic: bool,

    /// Max rows per $match request
    #[arg(short = 'c', long = "chunk", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk: usize,

    /// Approximate nearest-neighbor candidates per shard
    #[arg(long, default_value_t = DEFAULT_NUM_CANDIDATES)]
    numcandidates: usize,

    /// Nearest neighbors considered per row
    #[arg(long, default_value_t = DEFAULT_K_NEAREST)]
    knearest: usize,

    /// Number of top candidates to save per row
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    topn: usize,

    /// Column containing the correct map (adds a top-n column to the output)
    #[arg(long)]
    correctmap: Option<String>,

    /// Keep only candidates of one LOINC code type
    /// (LOINC, Part, Group, List, Answers)
    #[arg(long = "filter-loinc-type")]
    filter_loinc_type: Option<LoincType>,

    /// Multiplier for fetching extra candidates when filtering
    #[arg(long = "filter-fetch-factor", default_value_t = DEFAULT_FETCH_FACTOR)]
    filter_fetch_factor: f64,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let started = Instant::now();

    // Both extensions are checked before any network traffic: an unknown
    // output extension is a configuration error, not something to discover
    // after a long run.
    FileFormat::from_path(&cli.inputfile)?;
    FileFormat::from_path(&cli.outputfile)?;

    let options = MatchOptions {
        target_repo: cli.repo.clone(),
        top_n: cli.topn,
        chunk_size: cli.chunk,
        semantic: cli.semantic,
        k_nearest: cli.knearest,
        num_candidates: cli.numcandidates,
        correct_map_column: cli.correctmap.clone(),
        loinc_filter: cli.filter_loinc_type,
        fetch_factor: cli.filter_fetch_factor,
    };

    tracing::info!(
        endpoint = format!("{}{}", cli.env, cli.endpoint),
        input = %cli.inputfile.display(),
        repo = %cli.repo,
        semantic = cli.semantic,
        top_n = cli.topn,
        chunk_size = cli.chunk,
        fetch_limit = options.fetch_limit(),
        filter = cli.filter_loinc_type.map(|f| f.to_string()),
        "Configuration"
    );

    let input = read_table(&cli.inputfile)
        .with_context(|| format!("failed to load {}", cli.inputfile.display()))?;

    // The request table carries renamed columns; the output keeps the
    // original header names.
    let mut request_table = input.clone();
    if let Some(ref columnmap_path) = cli.columnmap {
        let column_map = load_column_map(columnmap_path)?;
        tracing::info!(mappings = column_map.len(), "Applying column map");
        request_table.rename_columns(&column_map);
    }

    let client = HttpMatchClient::new(&cli.env, &cli.endpoint, Some(cli.token.clone()))?;

    let results = run_match(&client, &request_table, &options).await?;

    let (headers, columns) = result_columns(&results, &options);
    let mut output = input;
    output.append_columns(headers, columns)?;
    write_table(&cli.outputfile, &output)
        .with_context(|| format!("failed to write {}", cli.outputfile.display()))?;

    tracing::info!(
        rows = output.row_count(),
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Match run complete"
    );
    println!("Output saved to: {}", cli.outputfile.display());

    Ok(())
}

fn load_column_map(path: &PathBuf) -> anyhow::Result<HashMap<String, String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read column map {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse column map {}", path.display()))
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
