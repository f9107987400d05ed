//! ONNX Runtime sequence classifier (BERT-style `logits` output)

use super::SequenceClassifier;
use anyhow::{bail, Context, Result};
use ort::{inputs, session::Session, value::Value};
use std::path::Path;
use tokenizers::Tokenizer;

use crate::onnx::{accepts_token_type_ids, encode, load_session, load_tokenizer};

/// ONNX-based sequence classifier
pub struct OnnxClassifier {
    session: Session,
    tokenizer: Tokenizer,
    model_name: String,
    token_type_ids: bool,
}

impl OnnxClassifier {
    pub fn new_from_paths(
        model_path: &Path,
        tokenizer_path: &Path,
        model_name: &str,
        max_tokens: usize,
    ) -> Result<Self> {
        let session = load_session(model_path)?;
        let tokenizer = load_tokenizer(tokenizer_path, max_tokens)?;
        let token_type_ids = accepts_token_type_ids(&session);

        Ok(Self {
            session,
            tokenizer,
            model_name: model_name.to_string(),
            token_type_ids,
        })
    }
}

impl SequenceClassifier for OnnxClassifier {
    fn logits(&mut self, text: &str) -> Result<Vec<f32>> {
        let encoded = encode(&self.tokenizer, text)?;
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

        let (shape, data) = outputs["logits"]
            .try_extract_tensor::<f32>()
            .context("Failed to extract logits tensor")?;

        // [batch_size=1, num_labels]
        let dims = shape.as_ref();
        if dims.len() != 2 || dims[0] != 1 {
            bail!("Expected [1, num_labels] logits, got shape: {:?}", dims);
        }

        let num_labels = dims[1] as usize;
        Ok(data[..num_labels].to_vec())
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
