use crate::client::MatchParams;
use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_FETCH_FACTOR, DEFAULT_K_NEAREST, DEFAULT_NUM_CANDIDATES,
    DEFAULT_TARGET_REPO, DEFAULT_TOP_N,
};
use crate::loinc::LoincType;

/// Options controlling one batch match run.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Target repository URL path sent with every chunk.
    pub target_repo: String,

    /// Candidates retained per row in the output.
    pub top_n: usize,

    /// Maximum rows per `$match` request.
    pub chunk_size: usize,

    /// Enable semantic search on the endpoint.
    pub semantic: bool,

    /// Nearest neighbors considered per row.
    pub k_nearest: usize,

    /// Approximate nearest-neighbor candidates per shard.
    pub num_candidates: usize,

    /// Column holding the known-correct identifier; enables the `top-n`
    /// output column.
    pub correct_map_column: Option<String>,

    /// Restrict retained candidates to one LOINC code family.
    pub loinc_filter: Option<LoincType>,

    /// Over-fetch multiplier applied when `loinc_filter` is set.
    pub fetch_factor: f64,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            target_repo: DEFAULT_TARGET_REPO.to_string(),
            top_n: DEFAULT_TOP_N,
            chunk_size: DEFAULT_CHUNK_SIZE,
            semantic: false,
            k_nearest: DEFAULT_K_NEAREST,
            num_candidates: DEFAULT_NUM_CANDIDATES,
            correct_map_column: None,
            loinc_filter: None,
            fetch_factor: DEFAULT_FETCH_FACTOR,
        }
    }
}

impl MatchOptions {
    pub fn validate(&self) -> Result<(), String> {
        if self.top_n == 0 {
            return Err("top_n must be at least 1".to_string());
        }
        if self.chunk_size == 0 {
            return Err("chunk size must be at least 1".to_string());
        }
        if self.fetch_factor <= 0.0 {
            return Err(format!(
                "fetch factor must be positive, got {}",
                self.fetch_factor
            ));
        }
        Ok(())
    }

    /// Candidates requested per row from the endpoint.
    ///
    /// With an active type filter the request is widened to
    /// `ceil(top_n * fetch_factor)` so enough candidates survive local
    /// filtering; this is a heuristic, and a shortfall after filtering is
    /// accepted without a second round-trip.
    pub fn fetch_limit(&self) -> usize {
        if self.loinc_filter.is_some() {
            (self.top_n as f64 * self.fetch_factor).ceil() as usize
        } else {
            self.top_n
        }
    }

    /// Query parameters for every chunk request.
    pub fn params(&self) -> MatchParams {
        MatchParams {
            include_search_meta: true,
            semantic: self.semantic,
            limit: self.fetch_limit(),
            k_nearest: self.k_nearest,
            num_candidates: self.num_candidates,
            best_match: false,
        }
    }
}
