//! BERT sequence-classification wrapper for cross-encoder scoring.

use candle_core::{DType, Device, IndexOp, Result, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use tokenizers::Tokenizer;

struct CrossEncoderModelImpl {
    bert: BertModel,
    classifier: Linear,
}

impl CrossEncoderModelImpl {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        // Checkpoints exported from HF prefix tensors with the architecture
        // name; plain safetensors exports do not.
        let bert = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), config)?
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("roberta"), config)?
        } else {
            BertModel::load(vb.clone(), config)?
        };

        let classifier = candle_nn::linear(config.hidden_size, 1, vb.pp("classifier"))?;

        Ok(Self { bert, classifier })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let hidden = self
            .bert
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = hidden.i((.., 0, ..))?;
        self.classifier.forward(&cls_token)
    }
}

/// A BERT model with a single-logit relevance head, loaded from a directory
/// containing `config.json` and `model.safetensors`.
#[derive(Clone)]
pub struct CrossEncoderModel(std::sync::Arc<CrossEncoderModelImpl>);

impl CrossEncoderModel {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| candle_core::Error::Msg(format!("Failed to parse config: {e}")))?;

        let weights_path = model_dir.join("model.safetensors");
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let model = CrossEncoderModelImpl::load(vb, &config)?;
        Ok(Self(std::sync::Arc::new(model)))
    }

    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        self.0.forward(input_ids, token_type_ids, attention_mask)
    }
}

/// Loads `tokenizer.json` from the model directory with truncation enabled,
/// so query/candidate pairs never exceed the model's sequence limit.
pub fn load_tokenizer(model_dir: &Path, max_len: usize) -> std::io::Result<Tokenizer> {
    use tokenizers::TruncationParams;

    let mut tokenizer =
        Tokenizer::from_file(model_dir.join("tokenizer.json")).map_err(std::io::Error::other)?;

    let truncation = TruncationParams {
        max_length: max_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| std::io::Error::other(format!("Failed to configure truncation: {e}")))?;

    Ok(tokenizer)
}
