//! Wire contract of the OCL `$match` endpoint.

use serde::{Deserialize, Serialize};

/// A single input row as submitted to the endpoint: the (possibly renamed)
/// source columns plus the populated `name`/`synonyms` fields.
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

/// POST body for one chunk.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRequest {
    pub rows: Vec<JsonRow>,
    pub target_repo_url: String,
}

/// Query parameters sent with every chunk request.
#[derive(Debug, Clone, Serialize)]
pub struct MatchParams {
    #[serde(rename = "includeSearchMeta")]
    pub include_search_meta: bool,
    pub semantic: bool,
    /// Candidates requested per row (the fetch limit, not the retained top-n).
    pub limit: usize,
    #[serde(rename = "kNearest")]
    pub k_nearest: usize,
    #[serde(rename = "numCandidates")]
    pub num_candidates: usize,
    #[serde(rename = "bestMatch")]
    pub best_match: bool,
}

/// Match results for one submitted row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RowMatches {
    #[serde(default)]
    pub results: Vec<ApiCandidate>,
}

/// One candidate concept returned by the endpoint.
///
/// Unknown response fields are ignored; only the identifier, display name
/// and search score are consumed downstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiCandidate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub search_meta: SearchMeta,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchMeta {
    #[serde(default)]
    pub search_score: f64,
}

impl ApiCandidate {
    /// Convenience constructor used by tests and the mock backend.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            search_meta: SearchMeta {
                search_score: score,
            },
        }
    }
}
