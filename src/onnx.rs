//! Shared ONNX Runtime plumbing for the embedding and classifier models

use anyhow::{anyhow, bail, Context, Result};
use ndarray::Array2;
use ort::session::Session;
use std::path::Path;
use tokenizers::Tokenizer;

/// Sentence encoder input limit (the encoder's `max_seq_length`)
pub const EMBEDDING_MAX_TOKENS: usize = 128;
/// Classifier input limit
pub const CLASSIFIER_MAX_TOKENS: usize = 512;

/// Model inputs for one sentence, shaped `[1, seq_len]`
pub struct EncodedInput {
    pub input_ids: Array2<i64>,
    pub attention_mask: Array2<i64>,
    pub token_type_ids: Array2<i64>,
}

/// Load an ONNX session from a model file
pub fn load_session(model_path: &Path) -> Result<Session> {
    if !model_path.exists() {
        bail!(
            "ONNX model not found at: {}\n\n\
            Export it with optimum (e.g. `optimum-cli export onnx --model <hub id> <dir>`)\n\
            and place model.onnx + tokenizer.json in that directory.",
            model_path.display()
        );
    }

    Session::builder()
        .context("Failed to create ONNX session builder")?
        .commit_from_file(model_path)
        .with_context(|| format!("Failed to load ONNX model {}", model_path.display()))
}

/// Load a tokenizer that truncates at `max_tokens`
pub fn load_tokenizer(tokenizer_path: &Path, max_tokens: usize) -> Result<Tokenizer> {
    if !tokenizer_path.exists() {
        bail!("Tokenizer not found at: {}", tokenizer_path.display());
    }

    let mut tokenizer = Tokenizer::from_file(tokenizer_path)
        .map_err(|e| anyhow!("Failed to load tokenizer: {}", e))?;
    truncate_at(&mut tokenizer, max_tokens)?;

    Ok(tokenizer)
}

/// Cap encodings at `max_tokens`, special tokens included
pub fn truncate_at(tokenizer: &mut Tokenizer, max_tokens: usize) -> Result<()> {
    if max_tokens == 0 {
        bail!("Token limit must be positive");
    }

    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: max_tokens,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("Failed to configure truncation: {}", e))?;
    Ok(())
}

/// Whether the model graph declares a `token_type_ids` input
///
/// BERT exports do, XLM-R based sentence encoders do not.
pub fn accepts_token_type_ids(session: &Session) -> bool {
    session
        .inputs
        .iter()
        .any(|input| input.name == "token_type_ids")
}

/// Tokenize one sentence (special tokens included)
pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<EncodedInput> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow!("Tokenization failed: {}", e))?;

    let ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
    let mask: Vec<i64> = encoding
        .get_attention_mask()
        .iter()
        .map(|&x| x as i64)
        .collect();
    let seq_len = ids.len();

    Ok(EncodedInput {
        input_ids: Array2::from_shape_vec((1, seq_len), ids)
            .context("Failed to create input_ids array")?,
        attention_mask: Array2::from_shape_vec((1, seq_len), mask)
            .context("Failed to create attention_mask array")?,
        token_type_ids: Array2::zeros((1, seq_len)),
    })
}

/// Model files inside a model directory; the quantized export wins when present
pub fn model_files(model_dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let quantized = model_dir.join("model_quantized.onnx");
    let model = if quantized.exists() {
        quantized
    } else {
        model_dir.join("model.onnx")
    };
    (model, model_dir.join("tokenizer.json"))
}
