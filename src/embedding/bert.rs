use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;

/// Reads a HF `config.json` into candle's BERT config.
pub fn read_bert_config(model_dir: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(model_dir.join("config.json"))?;
    serde_json::from_str(&content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

/// Memory-maps `model.safetensors` from a model directory.
pub fn mmap_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let weights_path = model_dir.join("model.safetensors");
    // SAFETY: the weights file is treated as read-only for the lifetime of the model.
    unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device) }
}

/// Loads the encoder under whichever prefix the checkpoint uses.
///
/// Returns the model and the prefix (`"bert"`, `"roberta"` or `""`).
pub fn load_encoder(vb: &VarBuilder, config: &Config) -> Result<(BertModel, &'static str)> {
    for prefix in ["bert", "roberta"] {
        if vb.contains_tensor(&format!("{prefix}.embeddings.word_embeddings.weight")) {
            return Ok((BertModel::load(vb.pp(prefix), config)?, prefix));
        }
    }
    Ok((BertModel::load(vb.clone(), config)?, ""))
}

enum ClassifierHead {
    /// BERT: optional `pooler.dense` + tanh, then a single `classifier` projection.
    Bert {
        pooler: Option<Linear>,
        classifier: Linear,
    },
    /// RoBERTa: `classifier.dense` + tanh, then `classifier.out_proj`.
    Roberta { dense: Linear, out_proj: Linear },
}

struct SequenceClassifierImpl {
    encoder: BertModel,
    head: ClassifierHead,
}

impl SequenceClassifierImpl {
    fn load(vb: VarBuilder, config: &Config, num_labels: usize) -> Result<Self> {
        let (encoder, prefix) = load_encoder(&vb, config)?;
        let hidden = config.hidden_size;

        let head = if vb.contains_tensor("classifier.out_proj.weight") {
            ClassifierHead::Roberta {
                dense: candle_nn::linear(hidden, hidden, vb.pp("classifier.dense"))?,
                out_proj: candle_nn::linear(hidden, num_labels, vb.pp("classifier.out_proj"))?,
            }
        } else {
            let pooler_path = if prefix.is_empty() {
                "pooler.dense".to_string()
            } else {
                format!("{prefix}.pooler.dense")
            };
            let pooler = if vb.contains_tensor(&format!("{pooler_path}.weight")) {
                Some(candle_nn::linear(hidden, hidden, vb.pp(pooler_path))?)
            } else {
                None
            };
            ClassifierHead::Bert {
                pooler,
                classifier: candle_nn::linear(hidden, num_labels, vb.pp("classifier"))?,
            }
        };

        Ok(Self { encoder, head })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: Option<&Tensor>,
    ) -> Result<Tensor> {
        let output = self
            .encoder
            .forward(input_ids, token_type_ids, attention_mask)?;
        let cls_token = output.i((.., 0, ..))?;

        match &self.head {
            ClassifierHead::Bert { pooler, classifier } => {
                let pooled = match pooler {
                    Some(pooler) => pooler.forward(&cls_token)?.tanh()?,
                    None => cls_token,
                };
                classifier.forward(&pooled)
            }
            ClassifierHead::Roberta { dense, out_proj } => {
                out_proj.forward(&dense.forward(&cls_token)?.tanh()?)
            }
        }
    }
}

/// Sequence-pair classifier (e.g. an NLI cross-encoder) returning raw logits
/// of shape `[batch, num_labels]`.
#[derive(Clone)]
pub struct SequenceClassifier(std::sync::Arc<SequenceClassifierImpl>);

impl SequenceClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, num_labels: usize, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config = read_bert_config(model_dir)?;
        let vb = mmap_weights(model_dir, device)?;
        let model = SequenceClassifierImpl::load(vb, &config, num_labels)?;
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
