//! Batch matching pipeline.
//!
//! Chunks input rows, submits each chunk to a [`MatchBackend`], and turns
//! per-row candidate lists into output columns. Stages are pure functions
//! over values; results accumulate in the vector returned by [`run_match`],
//! never in shared state. Chunks are submitted strictly in order, one at a
//! time.

mod config;
mod error;


pub use config::MatchOptions;
pub use error::MatchError;

use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{ApiCandidate, JsonRow, MatchBackend, MatchRequest};
use crate::constants::{NEW_CONCEPT_SENTINEL, round_score};
use crate::loinc::matches_filter;
use crate::table::Table;

/// A candidate kept in a row's top-n slots.
#[derive(Debug, Clone, PartialEq)]
pub struct RetainedCandidate {
    pub code: String,
    pub display_name: String,
    pub score: f64,
}

/// Outcome of comparing a row's correct identifier against its retained
/// candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectMap {
    /// No correct-map column was configured (or the chunk failed).
    NotRequested,
    /// The row has no correct value; not evaluated.
    Missing,
    /// The correct value is the "new concept" sentinel; not evaluated.
    NewConcept,
    /// 1-based position of the first retained candidate matching the
    /// correct value.
    Rank(usize),
    /// The correct value is absent from the retained candidates.
    Miss,
}

/// Match output for one input row.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub retained: Vec<RetainedCandidate>,
    pub correct: CorrectMap,
}

impl MatchResult {
    /// The fail-soft placeholder used when a chunk request fails.
    pub fn empty() -> Self {
        Self {
            retained: Vec::new(),
            correct: CorrectMap::NotRequested,
        }
    }
}

/// Converts table rows into the JSON rows the `$match` endpoint expects:
/// every column as a string field, `name` always present (empty when
/// missing), `synonyms` seeded with the name, and `id` stripped.
pub fn prepare_rows(table: &Table) -> Vec<JsonRow> {
    table
        .rows()
        .map(|row| {
            let mut json_row = JsonRow::new();
            for (header, cell) in table.headers().iter().zip(row) {
                if header == "id" {
                    continue;
                }
                json_row.insert(header.clone(), Value::String(cell.clone()));
            }

            let name = table
                .column_index("name")
                .map(|index| row.get(index).cloned().unwrap_or_default())
                .unwrap_or_default();
            json_row.insert("name".to_string(), Value::String(name.clone()));
            json_row.insert("synonyms".to_string(), serde_json::json!([name]));
            json_row
        })
        .collect()
}

/// Sorts candidates by search score descending. `sort_by` is stable, so
/// candidates with equal scores keep the order the service returned.
pub fn rank_candidates(mut candidates: Vec<ApiCandidate>) -> Vec<ApiCandidate> {
    candidates.sort_by(|a, b| {
        b.search_meta
            .search_score
            .partial_cmp(&a.search_meta.search_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Keeps candidates passing the optional LOINC type filter, preserving
/// relative order.
pub fn filter_candidates(
    candidates: Vec<ApiCandidate>,
    filter: Option<crate::loinc::LoincType>,
) -> Vec<ApiCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| matches_filter(&candidate.id, filter))
        .collect()
}

/// Truncates to the first `top_n` survivors. A shortfall is accepted
/// silently.
pub fn retain_top(candidates: Vec<ApiCandidate>, top_n: usize) -> Vec<RetainedCandidate> {
    candidates
        .into_iter()
        .take(top_n)
        .map(|candidate| RetainedCandidate {
            code: candidate.id,
            display_name: candidate.display_name,
            score: candidate.search_meta.search_score,
        })
        .collect()
}

/// Computes the correct-map outcome for one row: trimmed exact compare,
/// with the `"new"` sentinel matched case-insensitively.
pub fn annotate_correct(value: Option<&str>, retained: &[RetainedCandidate]) -> CorrectMap {
    let value = value.map(str::trim).unwrap_or("");
    if value.is_empty() {
        return CorrectMap::Missing;
    }
    if value.eq_ignore_ascii_case(NEW_CONCEPT_SENTINEL) {
        return CorrectMap::NewConcept;
    }

    for (position, candidate) in retained.iter().enumerate() {
        if candidate.code.trim() == value {
            return CorrectMap::Rank(position + 1);
        }
    }
    CorrectMap::Miss
}

fn build_result(
    candidates: Vec<ApiCandidate>,
    correct_value: Option<&str>,
    options: &MatchOptions,
) -> MatchResult {
    let ranked = rank_candidates(candidates);
    let filtered = filter_candidates(ranked, options.loinc_filter);
    let retained = retain_top(filtered, options.top_n);

    let correct = match options.correct_map_column {
        None => CorrectMap::NotRequested,
        Some(_) => annotate_correct(correct_value, &retained),
    };

    MatchResult { retained, correct }
}

/// Runs the full match pipeline over `table`, one chunk at a time.
///
/// A failed chunk logs a warning and contributes one empty result per row;
/// the run continues with the next chunk.
pub async fn run_match(
    backend: &dyn MatchBackend,
    table: &Table,
    options: &MatchOptions,
) -> Result<Vec<MatchResult>, MatchError> {
    options
        .validate()
        .map_err(|reason| MatchError::InvalidOptions { reason })?;

    let correct_index = match &options.correct_map_column {
        Some(column) => Some(table.column_index(column).ok_or_else(|| {
            MatchError::MissingColumn {
                column: column.clone(),
            }
        })?),
        None => None,
    };

    let rows = prepare_rows(table);
    let params = options.params();
    let chunk_count = rows.len().div_ceil(options.chunk_size);

    info!(
        rows = rows.len(),
        chunks = chunk_count,
        fetch_limit = params.limit,
        "Starting match run"
    );

    let mut results: Vec<MatchResult> = Vec::with_capacity(rows.len());

    for (chunk_index, chunk) in rows.chunks(options.chunk_size).enumerate() {
        let request = MatchRequest {
            rows: chunk.to_vec(),
            target_repo_url: options.target_repo.clone(),
        };

        info!(
            chunk = chunk_index + 1,
            of = chunk_count,
            rows = chunk.len(),
            "Submitting chunk"
        );
        let started = Instant::now();

        match backend.match_chunk(&request, &params).await {
            Ok(row_matches) => {
                let elapsed = started.elapsed();
                debug!(
                    chunk = chunk_index + 1,
                    elapsed_ms = elapsed.as_millis() as u64,
                    per_row_ms = (elapsed.as_millis() as u64) / chunk.len().max(1) as u64,
                    "Chunk matched"
                );

                let mut produced = 0;
                for (offset, matches) in row_matches.into_iter().take(chunk.len()).enumerate() {
                    let row_index = chunk_index * options.chunk_size + offset;
                    let correct_value = correct_index.map(|index| table.cell(row_index, index));
                    results.push(build_result(matches.results, correct_value, options));
                    produced += 1;
                }

                // A short response still yields one result per submitted row.
                if produced < chunk.len() {
                    warn!(
                        chunk = chunk_index + 1,
                        expected = chunk.len(),
                        received = produced,
                        "Endpoint returned fewer results than rows submitted"
                    );
                    results.resize(results.len() + chunk.len() - produced, MatchResult::empty());
                }
            }
            Err(error) => {
                warn!(
                    chunk = chunk_index + 1,
                    error = %error,
                    "Chunk request failed, recording empty results"
                );
                results.resize(results.len() + chunk.len(), MatchResult::empty());
            }
        }
    }

    Ok(results)
}

/// Renders match results into output columns: `{NN}_code`, `{NN}_name`,
/// `{NN}_score` for NN = 01..top_n, plus `top-n` when a correct-map column
/// was configured.
pub fn result_columns(
    results: &[MatchResult],
    options: &MatchOptions,
) -> (Vec<String>, Vec<Vec<String>>) {
    let with_top_n = options.correct_map_column.is_some();

    let mut headers = Vec::with_capacity(options.top_n * 3 + usize::from(with_top_n));
    for rank in 1..=options.top_n {
        headers.push(format!("{rank:02}_code"));
        headers.push(format!("{rank:02}_name"));
        headers.push(format!("{rank:02}_score"));
    }
    if with_top_n {
        headers.push("top-n".to_string());
    }

    let rows = results
        .iter()
        .map(|result| {
            let mut cells = Vec::with_capacity(headers.len());
            for slot in 0..options.top_n {
                match result.retained.get(slot) {
                    Some(candidate) => {
                        cells.push(candidate.code.clone());
                        cells.push(candidate.display_name.clone());
                        cells.push(round_score(candidate.score).to_string());
                    }
                    None => {
                        cells.push(String::new());
                        cells.push(String::new());
                        cells.push(String::new());
                    }
                }
            }
            if with_top_n {
                let top_n_cell = match result.correct {
                    CorrectMap::Rank(rank) => rank.to_string(),
                    _ => String::new(),
                };
                cells.push(top_n_cell);
            }
            cells
        })
        .collect();

    (headers, rows)
}
