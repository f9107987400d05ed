//! Embeddings module - sentence embeddings for questions and intent labels
//!
//! Trait-based abstraction so the embedding matcher can run against the
//! ONNX sentence encoder in production and a fixed table in tests.

mod onnx;
mod similarity;

pub use onnx::OnnxEmbedder;
pub use similarity::{argmax, cosine_similarity};

use anyhow::Result;

use crate::config::ModelsConfig;

/// Trait for embedding generation engines
///
/// Requires Send so the engine can sit behind a lock shared by request threads.
pub trait EmbeddingEngine: Send {
    /// Generate embedding for a single text
    fn embed(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    fn embed_batch(&mut self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Embedding dimension (384 for paraphrase-multilingual-MiniLM-L12-v2)
    fn dimension(&self) -> usize;

    /// Model name
    fn model_name(&self) -> &str;
}

/// Create the sentence embedder named in the models configuration
pub fn create_embedder(models: &ModelsConfig) -> Result<Box<dyn EmbeddingEngine>> {
    let model_dir = crate::models::resolve_model_path(&models.embedding, &models.dir)?;
    let (model_path, tokenizer_path) = crate::onnx::model_files(&model_dir);

    Ok(Box::new(OnnxEmbedder::new_from_paths(
        &model_path,
        &tokenizer_path,
        &models.embedding,
        models.embedding_dimension,
        models.embedding_max_tokens,
    )?))
}
