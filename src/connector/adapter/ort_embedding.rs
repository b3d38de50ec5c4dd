use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::application::EmbeddingService;
use crate::domain::{DomainError, EmbeddingConfig};

pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";
const DEFAULT_DIMENSIONS: usize = 384;
const DEFAULT_MAX_SEQ_LENGTH: usize = 256;
const BATCH_SIZE: usize = 32;

/// Sentence embeddings from an ONNX model, mean-pooled and L2-normalised.
///
/// The inference session is created once and released when this value is dropped.
pub struct OrtEmbedding {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    config: EmbeddingConfig,
}

/// Token ids, attention mask and type ids padded to a common length.
struct PaddedBatch {
    rows: usize,
    width: usize,
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    token_type_ids: Vec<i64>,
}

impl PaddedBatch {
    fn from_encodings(encodings: &[Encoding], max_len: usize) -> Self {
        let rows = encodings.len();
        let width = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(max_len);

        let mut batch = Self {
            rows,
            width,
            input_ids: Vec::with_capacity(rows * width),
            attention_mask: Vec::with_capacity(rows * width),
            token_type_ids: Vec::with_capacity(rows * width),
        };

        for encoding in encodings {
            push_padded(&mut batch.input_ids, encoding.get_ids(), width);
            push_padded(&mut batch.attention_mask, encoding.get_attention_mask(), width);
            push_padded(&mut batch.token_type_ids, encoding.get_type_ids(), width);
        }

        batch
    }

    fn mask_row(&self, row: usize) -> &[i64] {
        &self.attention_mask[row * self.width..(row + 1) * self.width]
    }
}

fn push_padded(out: &mut Vec<i64>, values: &[u32], width: usize) {
    let len = values.len().min(width);
    out.extend(values[..len].iter().map(|&v| v as i64));
    out.extend(std::iter::repeat_n(0i64, width - len));
}

/// Truncate inside the tokenizer so `[CLS]`/`[SEP]` survive on long inputs.
fn truncation(max_length: usize) -> TruncationParams {
    TruncationParams {
        max_length,
        ..Default::default()
    }
}

fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in vector.iter_mut() {
            *v /= norm;
        }
    }
}

/// Average the token states of one row, counting only unmasked tokens.
fn mean_pool(data: &[f32], row: usize, seq_len: usize, hidden: usize, mask: &[i64]) -> Vec<f32> {
    let mut pooled = vec![0.0f32; hidden];
    let mut count = 0.0f32;
    let row_offset = row * seq_len * hidden;

    for (token, &m) in mask.iter().enumerate().take(seq_len) {
        if m == 0 {
            continue;
        }
        let start = row_offset + token * hidden;
        for (acc, &x) in pooled.iter_mut().zip(&data[start..start + hidden]) {
            *acc += x;
        }
        count += 1.0;
    }

    if count > 0.0 {
        for v in &mut pooled {
            *v /= count;
        }
    }
    pooled
}

impl OrtEmbedding {
    /// Download (or reuse the cached copy of) a sentence-transformers model from the HF hub.
    pub fn new(model_id: Option<&str>) -> Result<Self, DomainError> {
        let model_id = model_id.unwrap_or(DEFAULT_MODEL_ID);
        info!("Initializing ORT embedding service with model: {}", model_id);

        let api = hf_hub::api::sync::ApiBuilder::new()
            .with_progress(true)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to create HF API: {}", e)))?;

        let repo = api.model(model_id.to_string());

        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| DomainError::internal(format!("Failed to download tokenizer: {}", e)))?;

        let model_path = repo
            .get("model.onnx")
            .or_else(|_| repo.get("onnx/model.onnx"))
            .map_err(|e| DomainError::internal(format!("Failed to download ONNX model: {}", e)))?;

        Self::from_paths(model_path, tokenizer_path, model_id)
    }

    pub fn from_paths(
        model_path: PathBuf,
        tokenizer_path: PathBuf,
        model_name: &str,
    ) -> Result<Self, DomainError> {
        info!("Loading ONNX model from: {:?}", model_path);

        let session = Session::builder()
            .map_err(|e| DomainError::internal(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| DomainError::internal(format!("Failed to set optimization level: {}", e)))?
            .commit_from_file(&model_path)
            .map_err(|e| DomainError::internal(format!("Failed to load ONNX model: {}", e)))?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| DomainError::internal(format!("Failed to load tokenizer: {}", e)))?;
        tokenizer
            .with_truncation(Some(truncation(DEFAULT_MAX_SEQ_LENGTH)))
            .map_err(|e| DomainError::internal(format!("Failed to configure truncation: {}", e)))?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            config: EmbeddingConfig::new(
                model_name.to_string(),
                DEFAULT_DIMENSIONS,
                DEFAULT_MAX_SEQ_LENGTH,
            ),
        })
    }

    /// One forward pass over `texts`. Output row i belongs to `texts[i]`.
    fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| DomainError::embedding(format!("Tokenization failed: {}", e)))?;

        let batch = PaddedBatch::from_encodings(&encodings, self.config.max_sequence_length());
        let shape = [batch.rows, batch.width];

        let tensor = |values: &Vec<i64>, name: &str| {
            Tensor::from_array((shape, values.clone())).map_err(|e| {
                DomainError::embedding(format!("Failed to create {} tensor: {}", name, e))
            })
        };
        let input_ids = tensor(&batch.input_ids, "input_ids")?;
        let attention_mask = tensor(&batch.attention_mask, "attention_mask")?;
        let token_type_ids = tensor(&batch.token_type_ids, "token_type_ids")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| DomainError::internal(format!("Failed to lock session: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => token_type_ids,
            ])
            .map_err(|e| DomainError::embedding(format!("Inference failed: {}", e)))?;

        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| DomainError::embedding("Model produced no output"))?;

        let (dims, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| DomainError::embedding(format!("Failed to read model output: {}", e)))?;

        let dims: Vec<usize> = dims.iter().map(|&x| x as usize).collect();
        debug!("Output tensor shape: {:?}", dims);

        let mut vectors: Vec<Vec<f32>> = match dims.as_slice() {
            // Token states: [batch, seq, hidden]
            &[_, seq_len, hidden] => (0..batch.rows)
                .map(|row| mean_pool(data, row, seq_len, hidden, batch.mask_row(row)))
                .collect(),
            // Already pooled: [batch, hidden]
            &[_, hidden] => data
                .chunks(hidden)
                .take(batch.rows)
                .map(<[f32]>::to_vec)
                .collect(),
            other => {
                return Err(DomainError::embedding(format!(
                    "Unexpected output tensor shape: {:?}",
                    other
                )))
            }
        };

        for vector in &mut vectors {
            l2_normalize(vector);
        }

        Ok(vectors)
    }
}

#[async_trait]
impl EmbeddingService for OrtEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let vectors = self.embed_texts(&[text])?;
        vectors
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::embedding("Failed to generate query embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let text_refs: Vec<&str> = batch.iter().map(|s| s.as_str()).collect();
            all_embeddings.extend(self.embed_texts(&text_refs)?);
        }

        debug!("Embedded {} texts with {}", all_embeddings.len(), self.config.model_name());

        Ok(all_embeddings)
    }

    fn config(&self) -> &EmbeddingConfig {
        &self.config
    }
}
