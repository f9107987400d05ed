//! Fine-tuned sequence classification
//!
//! The classifier's output index i is the i-th intent of the catalog. That
//! alignment is fixed when the model is trained; nothing here re-derives it.

mod onnx;

pub use onnx::OnnxClassifier;

use anyhow::Result;

use crate::config::ModelsConfig;

/// Trait for sequence classifiers producing one logit per class
pub trait SequenceClassifier: Send {
    /// Raw logits for `text` (truncated to the model's token limit)
    fn logits(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Model name
    fn model_name(&self) -> &str;
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&x| x / sum).collect()
}

/// Create the classifier named in the models configuration
pub fn create_classifier(models: &ModelsConfig) -> Result<Box<dyn SequenceClassifier>> {
    let model_dir = crate::models::resolve_model_path(&models.classifier, &models.dir)?;
    let (model_path, tokenizer_path) = crate::onnx::model_files(&model_dir);

    Ok(Box::new(OnnxClassifier::new_from_paths(
        &model_path,
        &tokenizer_path,
        &models.classifier,
        models.classifier_max_tokens,
    )?))
}
