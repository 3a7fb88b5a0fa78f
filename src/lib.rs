//! Scoring and evaluation of candidate matches between free-text clinical
//! terms and LOINC codes in an OCL (Open Concept Lab) repository.
//!
//! Three independent pipelines, exposed through one binary each:
//!
//! - [`ranker`] (`ocl-rank`) scores a query against a fixed candidate pool
//!   with a cross-encoder and returns the pool sorted by relevance.
//! - [`matcher`] (`ocl-match`) chunks an input table, submits each chunk to
//!   the remote `$match` endpoint, and appends ranked candidate columns.
//! - [`eval`] (`ocl-eval`) computes top-n accuracy metrics from match
//!   output files, optionally partitioned by a grouping column.
//!
//! There is no shared runtime state between pipelines; every entity is
//! constructed per invocation and held in memory for the duration of one
//! run.

pub mod client;
pub mod constants;
pub mod eval;
pub mod loinc;
pub mod matcher;
pub mod ranker;
pub mod table;

pub use client::{
    ApiCandidate, ClientError, HttpMatchClient, JsonRow, MatchBackend, MatchParams, MatchRequest,
    RowMatches, SearchMeta,
};
#[cfg(any(test, feature = "mock"))]
pub use client::{MockMatchBackend, MockReply};

pub use eval::{
    EvalError, EvalOptions, EvaluationSummary, FileEvaluation, evaluate_table, summary_table,
};
pub use loinc::{LoincType, classify, matches_filter};
pub use matcher::{
    CorrectMap, MatchError, MatchOptions, MatchResult, RetainedCandidate, annotate_correct,
    filter_candidates, prepare_rows, rank_candidates, result_columns, retain_top, run_match,
};
pub use ranker::{
    CrossEncoder, PoolEntry, RankedCandidate, RankerConfig, RankerError, default_pool,
    pool_from_csv,
};
pub use table::{FileFormat, Table, TableError, read_table, write_table};
