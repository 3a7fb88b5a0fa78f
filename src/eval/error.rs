use thiserror::Error;

/// Reasons a match-output file cannot be evaluated. All of these are
/// per-file: the CLI warns and moves on to the next file.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("column '{column}' not found (available: {available})")]
    MissingCorrectColumn { column: String, available: String },

    #[error("missing candidate columns: {}", columns.join(", "))]
    MissingCandidateColumns { columns: Vec<String> },

    #[error("no valid rows to evaluate")]
    NoValidRows,
}
