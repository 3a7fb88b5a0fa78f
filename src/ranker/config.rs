use std::path::PathBuf;

/// Maximum sequence length for cross-encoder inputs. Longer query/candidate
/// pairs are truncated by the tokenizer.
pub const MAX_SEQ_LEN: usize = 512;

/// Cross-encoder ranker configuration.
///
/// When `model_path` is unset the ranker runs in stub mode with a
/// deterministic lexical-overlap score, which keeps every pipeline testable
/// without model files.
#[derive(Debug, Clone, Default)]
pub struct RankerConfig {
    /// Directory holding `config.json`, `model.safetensors` and
    /// `tokenizer.json` for a BERT sequence-classification cross-encoder.
    pub model_path: Option<PathBuf>,
}

impl RankerConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
        }
    }

    pub fn stub() -> Self {
        Self { model_path: None }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }
        Ok(())
    }

    /// Reads `OCL_RERANKER_PATH` (empty or unset means stub mode).
    pub fn from_env() -> Self {
        let model_path = std::env::var("OCL_RERANKER_PATH")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Self { model_path }
    }
}
