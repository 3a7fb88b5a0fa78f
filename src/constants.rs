//! Shared defaults for the match and evaluation pipelines.

/// Default number of top candidates retained per row.
pub const DEFAULT_TOP_N: usize = 5;

/// Default maximum number of rows submitted to the `$match` endpoint per request.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Default over-fetch multiplier applied when a LOINC type filter is active.
pub const DEFAULT_FETCH_FACTOR: f64 = 2.0;

/// Default number of nearest neighbors considered for each row.
pub const DEFAULT_K_NEAREST: usize = 5;

/// Default approximate number of nearest-neighbor candidates per shard.
pub const DEFAULT_NUM_CANDIDATES: usize = 5000;

/// Default path of the `$match` endpoint on the OCL API.
pub const DEFAULT_MATCH_ENDPOINT: &str = "/concepts/$match/";

/// Default target repository for matching.
pub const DEFAULT_TARGET_REPO: &str = "/orgs/CIEL/sources/CIEL/v2024-10-04/";

/// Correct-map value meaning "no existing concept should match this row".
///
/// Compared case-insensitively; rows carrying it are excluded from scoring.
pub const NEW_CONCEPT_SENTINEL: &str = "new";

/// Rounds a score to four decimal places for tabular output.
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_score() {
        assert_eq!(round_score(0.123_456), 0.1235);
        assert_eq!(round_score(0.9), 0.9);
        assert_eq!(round_score(0.0), 0.0);
    }
}
