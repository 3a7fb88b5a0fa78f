//! Cross-encoder ranking of candidate terms.
//!
//! Scores a free-text query against a fixed pool of (code, description)
//! pairs and returns the pool sorted by relevance. The scorer is a BERT
//! cross-encoder loaded through candle; without a model path it falls back
//! to a deterministic lexical-overlap stub so ranking stays testable
//! offline.

mod bert;
mod config;
mod device;
mod error;
pub mod pool;


pub use config::{MAX_SEQ_LEN, RankerConfig};
pub use error::RankerError;
pub use pool::{default_pool, pool_from_csv};

use candle_core::Tensor;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use bert::CrossEncoderModel;
use device::select_device;

/// A candidate available for ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolEntry {
    pub code: String,
    pub display_name: String,
}

/// A pool entry with its relevance score for a given query.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub code: String,
    pub display_name: String,
    pub score: f32,
}

/// Cross-encoder relevance scorer.
pub struct CrossEncoder {
    device: candle_core::Device,
    config: RankerConfig,
    model: Option<CrossEncoderModel>,
    tokenizer: Option<Tokenizer>,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: RankerConfig) -> Result<Self, RankerError> {
        if let Err(reason) = config.validate() {
            return Err(RankerError::InvalidConfig { reason });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for cross-encoder");

        let Some(model_path) = config.model_path.clone() else {
            info!("No cross-encoder model path configured, operating in stub mode");
            return Ok(Self {
                device,
                config,
                model: None,
                tokenizer: None,
            });
        };

        if !model_path.exists() {
            return Err(RankerError::ModelLoadFailed {
                reason: format!("model path not found: {}", model_path.display()),
            });
        }
        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(RankerError::ModelLoadFailed {
                    reason: format!("missing {required} in {}", model_path.display()),
                });
            }
        }

        info!(model_path = %model_path.display(), "Loading cross-encoder model");

        let model = CrossEncoderModel::load(&model_path, &device).map_err(|e| {
            RankerError::ModelLoadFailed {
                reason: format!("failed to load BERT model: {e}"),
            }
        })?;
        let tokenizer = bert::load_tokenizer(&model_path, MAX_SEQ_LEN)?;

        info!("Cross-encoder model loaded");

        Ok(Self {
            device,
            config,
            model: Some(model),
            tokenizer: Some(tokenizer),
        })
    }

    /// A model-free encoder using the lexical stub score.
    pub fn stub() -> Result<Self, RankerError> {
        Self::load(RankerConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Scores one query/candidate pair. Higher is more relevant.
    pub fn score(&self, query: &str, candidate: &str) -> Result<f32, RankerError> {
        if let (Some(model), Some(tokenizer)) = (&self.model, &self.tokenizer) {
            let tokens = tokenizer.encode((query, candidate), true).map_err(|e| {
                RankerError::TokenizationFailed {
                    reason: e.to_string(),
                }
            })?;

            let token_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
            let type_ids = Tensor::new(tokens.get_type_ids(), &self.device)?.unsqueeze(0)?;
            let attention_mask =
                Tensor::new(tokens.get_attention_mask(), &self.device)?.unsqueeze(0)?;

            let logits = model
                .forward(&token_ids, &type_ids, Some(&attention_mask))
                .map_err(|e| RankerError::InferenceFailed {
                    reason: e.to_string(),
                })?;

            let score = logits.flatten_all()?.to_vec1::<f32>()?[0];
            return Ok(score);
        }

        let score = lexical_score(query, candidate);
        debug!(score, "Computed score (stub)");
        Ok(score)
    }

    /// Scores every pool entry against `query` and returns the pool sorted
    /// by score descending.
    ///
    /// Equal scores keep their pool order (stable sort), which is the
    /// documented tie-break for this crate.
    pub fn rank(
        &self,
        query: &str,
        pool: &[PoolEntry],
    ) -> Result<Vec<RankedCandidate>, RankerError> {
        debug!(
            query_len = query.len(),
            pool_size = pool.len(),
            "Ranking candidate pool"
        );

        let mut ranked: Vec<RankedCandidate> = pool
            .iter()
            .map(|entry| {
                let score = self.score(query, &entry.display_name)?;
                Ok(RankedCandidate {
                    code: entry.code.clone(),
                    display_name: entry.display_name.clone(),
                    score,
                })
            })
            .collect::<Result<Vec<_>, RankerError>>()?;

        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            top_score = ranked.first().map(|c| c.score),
            "Ranking complete"
        );

        Ok(ranked)
    }
}

/// Deterministic relevance stand-in: term recall blended with Jaccard
/// overlap, squashed into (0, 1).
fn lexical_score(query: &str, candidate: &str) -> f32 {
    use std::collections::HashSet;

    const STOP_WORDS: &[&str] = &[
        "a", "an", "the", "of", "in", "on", "by", "for", "and", "or", "to", "is", "are", "with",
        "at", "from",
    ];

    fn terms(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word))
            .map(str::to_string)
            .collect()
    }

    let query_terms = terms(query);
    let candidate_terms = terms(candidate);

    if query_terms.is_empty() || candidate_terms.is_empty() {
        return 0.0;
    }

    let overlap = query_terms.intersection(&candidate_terms).count() as f32;
    let recall = overlap / query_terms.len() as f32;
    let union = query_terms.union(&candidate_terms).count() as f32;
    let jaccard = overlap / union;

    let raw = 0.7 * recall + 0.3 * jaccard;

    let squashed = 1.0 / (1.0 + (-6.0 * (raw - 0.5)).exp());
    squashed.clamp(0.0, 1.0)
}
