//! ONNX Runtime sentence embedder (mean pooling + L2 normalization)

use super::EmbeddingEngine;
use anyhow::{bail, Context, Result};
use ndarray::Array2;
use ort::{inputs, session::Session, value::Value};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::onnx::{accepts_token_type_ids, encode, load_session, load_tokenizer};

/// ONNX-based embedding generator
pub struct OnnxEmbedder {
    session: Session,
    tokenizer: Tokenizer,
    dimension: usize,
    model_name: String,
    token_type_ids: bool,
}

impl OnnxEmbedder {
    /// Create a new ONNX embedder from model and tokenizer paths
    ///
    /// # Arguments
    /// * `model_path` - Path to ONNX model file
    /// * `tokenizer_path` - Path to tokenizer.json file
    /// * `model_name` - Human-readable model name
    /// * `dimension` - Embedding dimension (384 for MiniLM-L12)
    /// * `max_tokens` - Truncation length (128 for MiniLM-L12)
    pub fn new_from_paths(
        model_path: &Path,
        tokenizer_path: &Path,
        model_name: &str,
        dimension: usize,
        max_tokens: usize,
    ) -> Result<Self> {
        let session = load_session(model_path)?;
        let tokenizer = load_tokenizer(tokenizer_path, max_tokens)?;
        let token_type_ids = accepts_token_type_ids(&session);

        Ok(Self {
            session,
            tokenizer,
            dimension,
            model_name: model_name.to_string(),
            token_type_ids,
        })
    }

    /// Mean pooling - average token embeddings weighted by attention mask
    fn mean_pooling(&self, token_embeddings: &Array2<f32>, attention_mask: &[i64]) -> Vec<f32> {
        let mask_sum: f32 = attention_mask.iter().map(|&x| x as f32).sum();

        if mask_sum == 0.0 {
            return vec![0.0; self.dimension];
        }

        let mut pooled = vec![0.0; self.dimension];
        for (i, &mask) in attention_mask.iter().enumerate() {
            if mask == 1 && i < token_embeddings.nrows() {
                for (j, value) in pooled.iter_mut().enumerate() {
                    *value += token_embeddings[[i, j]];
                }
            }
        }

        pooled.iter().map(|&x| x / mask_sum).collect()
    }

    /// L2 normalize a vector
    fn normalize(vec: &[f32]) -> Vec<f32> {
        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm == 0.0 {
            return vec.to_vec();
        }

        vec.iter().map(|x| x / norm).collect()
    }
}

impl EmbeddingEngine for OnnxEmbedder {
    fn embed(&mut self, text: &str) -> Result<Vec<f32>> {
        let encoded = encode(&self.tokenizer, text)?;
        let attention_mask: Vec<i64> = encoded.attention_mask.iter().copied().collect();

        // outputs borrow the session; finish with them before using self again
        let token_embeddings = {
            let input_ids = Value::from_array(encoded.input_ids)?;
            let mask = Value::from_array(encoded.attention_mask)?;

            let outputs = if self.token_type_ids {
                let token_types = Value::from_array(encoded.token_type_ids)?;
                self.session.run(inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => mask,
                    "token_type_ids" => token_types
                ])
            } else {
                self.session.run(inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => mask
                ])
            }
            .context("ONNX inference failed")?;

            let (shape, data) = outputs["last_hidden_state"]
                .try_extract_tensor::<f32>()
                .context("Failed to extract last_hidden_state tensor")?;

            // [batch_size=1, seq_len, hidden_dim]
            let dims = shape.as_ref();
            if dims.len() != 3 {
                bail!("Expected 3D tensor, got shape: {:?}", dims);
            }

            let seq_len = dims[1] as usize;
            let hidden_dim = dims[2] as usize;
            if hidden_dim != self.dimension {
                bail!(
                    "Model {} produced {}-dim embeddings, configured for {}",
                    self.model_name,
                    hidden_dim,
                    self.dimension
                );
            }

            Array2::from_shape_vec((seq_len, hidden_dim), data[0..seq_len * hidden_dim].to_vec())
                .context("Failed to reshape token embeddings")?
        };

        let pooled = self.mean_pooling(&token_embeddings, &attention_mask);
        Ok(Self::normalize(&pooled))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
