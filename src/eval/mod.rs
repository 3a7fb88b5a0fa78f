//! Top-n accuracy evaluation of match output tables.
//!
//! For each row the correct identifier is searched within the `{NN}_code`
//! candidate slots; a hit at position k counts toward every cutoff >= k, so
//! the reported proportions are monotonically non-decreasing across
//! cutoffs.

mod error;

#[cfg(test)]
mod tests;

pub use error::EvalError;

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::constants::{DEFAULT_TOP_N, NEW_CONCEPT_SENTINEL};
use crate::table::Table;

/// Options for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Column holding the known-correct identifier.
    pub correct_map_column: String,

    /// Number of top-n cutoffs to report.
    pub top_n: usize,

    /// Optional column to partition results by.
    pub groupby: Option<String>,
}

impl EvalOptions {
    pub fn new(correct_map_column: impl Into<String>) -> Self {
        Self {
            correct_map_column: correct_map_column.into(),
            top_n: DEFAULT_TOP_N,
            groupby: None,
        }
    }
}

/// Top-n metrics for one set of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub total_rows: usize,
    /// Rows with a usable correct value.
    pub valid_rows: usize,
    /// Rows with no correct value.
    pub excluded_rows: usize,
    /// Rows whose correct value is the "new concept" sentinel.
    pub skipped_rows: usize,
    hits: Vec<usize>,
}

impl EvaluationSummary {
    /// Cumulative hit counts, one per cutoff 1..=top_n.
    pub fn hits(&self) -> &[usize] {
        &self.hits
    }

    /// Hit proportions per cutoff; monotonically non-decreasing.
    pub fn proportions(&self) -> Vec<f64> {
        self.hits
            .iter()
            .map(|&count| count as f64 / self.valid_rows as f64)
            .collect()
    }
}

/// Evaluation of one file: the overall summary plus per-group summaries
/// (sorted by group value) when grouping was requested.
#[derive(Debug, Clone)]
pub struct FileEvaluation {
    pub filename: String,
    pub overall: EvaluationSummary,
    pub groups: Vec<(String, EvaluationSummary)>,
}

/// Names of the candidate identifier columns for the given cutoff count.
pub fn candidate_columns(top_n: usize) -> Vec<String> {
    (1..=top_n).map(|rank| format!("{rank:02}_code")).collect()
}

/// Scores a subset of rows. Returns `None` when the subset has no valid
/// rows (proportions would be undefined).
fn evaluate_subset(
    table: &Table,
    row_indices: &[usize],
    correct_index: usize,
    code_indices: &[usize],
) -> Option<EvaluationSummary> {
    let top_n = code_indices.len();
    // Fixed-size accumulator indexed by cutoff; a hit at 0-based position i
    // increments every counter from i on (cumulative top-n semantics).
    let mut hits = vec![0usize; top_n];
    let mut valid_rows = 0;
    let mut excluded_rows = 0;
    let mut skipped_rows = 0;

    for &row in row_indices {
        let correct = table.cell(row, correct_index).trim();
        if correct.is_empty() {
            excluded_rows += 1;
            continue;
        }
        if correct.eq_ignore_ascii_case(NEW_CONCEPT_SENTINEL) {
            skipped_rows += 1;
            continue;
        }
        valid_rows += 1;

        for (position, &column) in code_indices.iter().enumerate() {
            if table.cell(row, column).trim() == correct {
                for counter in &mut hits[position..] {
                    *counter += 1;
                }
                debug!(row, position = position + 1, "Match found");
                break;
            }
        }
    }

    if valid_rows == 0 {
        return None;
    }

    Some(EvaluationSummary {
        total_rows: row_indices.len(),
        valid_rows,
        excluded_rows,
        skipped_rows,
        hits,
    })
}

/// Evaluates one match-output table.
///
/// A requested groupby column that is absent logs a warning and the table
/// is evaluated ungrouped; group subsets without valid rows are omitted.
pub fn evaluate_table(
    table: &Table,
    filename: &str,
    options: &EvalOptions,
) -> Result<FileEvaluation, EvalError> {
    let correct_index = table
        .column_index(&options.correct_map_column)
        .ok_or_else(|| EvalError::MissingCorrectColumn {
            column: options.correct_map_column.clone(),
            available: table.headers().join(", "),
        })?;

    let mut code_indices = Vec::with_capacity(options.top_n);
    let mut missing = Vec::new();
    for column in candidate_columns(options.top_n) {
        match table.column_index(&column) {
            Some(index) => code_indices.push(index),
            None => missing.push(column),
        }
    }
    if !missing.is_empty() {
        return Err(EvalError::MissingCandidateColumns { columns: missing });
    }

    let all_rows: Vec<usize> = (0..table.row_count()).collect();
    let overall = evaluate_subset(table, &all_rows, correct_index, &code_indices)
        .ok_or(EvalError::NoValidRows)?;

    let mut groups = Vec::new();
    if let Some(ref groupby) = options.groupby {
        match table.column_index(groupby) {
            None => {
                warn!(
                    column = %groupby,
                    filename,
                    "Groupby column not found, reporting overall metrics only"
                );
            }
            Some(group_index) => {
                // Case-sensitive exact grouping over non-empty values;
                // BTreeMap yields groups in natural (lexicographic) order.
                let mut partitions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
                for row in 0..table.row_count() {
                    let value = table.cell(row, group_index);
                    if value.trim().is_empty() {
                        continue;
                    }
                    partitions.entry(value.to_string()).or_default().push(row);
                }

                debug!(
                    column = %groupby,
                    groups = partitions.len(),
                    filename,
                    "Evaluating groups"
                );

                for (group_value, rows) in partitions {
                    if let Some(summary) =
                        evaluate_subset(table, &rows, correct_index, &code_indices)
                    {
                        groups.push((group_value, summary));
                    }
                }
            }
        }
    }

    Ok(FileEvaluation {
        filename: filename.to_string(),
        overall,
        groups,
    })
}

/// Builds the summary table printed by the evaluation CLI:
/// `filename,(group,)rowcount,top-1..top-N` with proportions to four
/// decimal places. With grouping, each file's overall row uses group `*`.
pub fn summary_table(evaluations: &[FileEvaluation], top_n: usize, grouped: bool) -> Table {
    let mut headers = vec!["filename".to_string()];
    if grouped {
        headers.push("group".to_string());
    }
    headers.push("rowcount".to_string());
    for rank in 1..=top_n {
        headers.push(format!("top-{rank}"));
    }

    let mut table = Table::new(headers);

    let summary_row = |filename: &str, group: Option<&str>, summary: &EvaluationSummary| {
        let mut row = vec![filename.to_string()];
        if let Some(group) = group {
            row.push(group.to_string());
        }
        row.push(summary.valid_rows.to_string());
        for proportion in summary.proportions() {
            row.push(format!("{proportion:.4}"));
        }
        row
    };

    for evaluation in evaluations {
        if grouped {
            table.push_row(summary_row(&evaluation.filename, Some("*"), &evaluation.overall));
            for (group_value, summary) in &evaluation.groups {
                table.push_row(summary_row(
                    &evaluation.filename,
                    Some(group_value),
                    summary,
                ));
            }
        } else {
            table.push_row(summary_row(&evaluation.filename, None, &evaluation.overall));
        }
    }

    table
}
