use thiserror::Error;

/// Fatal matcher errors (per-chunk network failures are not errors; they
/// degrade to empty results).
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("required column '{column}' not found in input")]
    MissingColumn { column: String },

    #[error("invalid match options: {reason}")]
    InvalidOptions { reason: String },
}
