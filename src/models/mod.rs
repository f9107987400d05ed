//! Model location
//!
//! Both models are loaded from plain directories holding a tokenizer and an
//! ONNX export. The user cache (`~/.docentify/cache/models/`) is checked
//! first, then the configured local directory.
//!
//! ```text
//! <root>/<name>/
//! ├── tokenizer.json
//! └── model_quantized.onnx | model.onnx
//! ```

use crate::paths;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Valid = tokenizer.json + (model.onnx OR model_quantized.onnx)
pub fn has_valid_model_files(dir: &Path) -> bool {
    if !dir.join("tokenizer.json").exists() {
        return false;
    }
    dir.join("model.onnx").exists() || dir.join("model_quantized.onnx").exists()
}

/// The cached copy of a model, if complete
pub fn cached_model_path(name: &str) -> Option<PathBuf> {
    let model_dir = paths::models::model_dir(name);
    has_valid_model_files(&model_dir).then_some(model_dir)
}

/// Resolve a model directory, checking the cache first then `local_root`.
pub fn resolve_model_path(name: &str, local_root: &Path) -> Result<PathBuf> {
    if let Some(path) = cached_model_path(name) {
        return Ok(path);
    }
    resolve_in(name, &[local_root.to_path_buf()])
        .map_err(|_| missing_model(name, local_root))
}

fn resolve_in(name: &str, roots: &[PathBuf]) -> Result<PathBuf> {
    roots
        .iter()
        .map(|root| root.join(name))
        .find(|dir| has_valid_model_files(dir))
        .ok_or_else(|| anyhow::anyhow!("Model '{}' not found", name))
}

fn missing_model(name: &str, local_root: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Model '{}' not found.\n\
         Looked in:\n  {}\n  {}\n\
         Each needs tokenizer.json and model.onnx (or model_quantized.onnx).",
        name,
        paths::models::model_dir(name).display(),
        local_root.join(name).display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn model_dir(root: &Path, name: &str, files: &[&str]) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        for file in files {
            fs::write(dir.join(file), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_valid_model_files() {
        let root = TempDir::new().unwrap();
        let full = model_dir(root.path(), "full", &["tokenizer.json", "model.onnx"]);
        let quantized = model_dir(root.path(), "quant", &["tokenizer.json", "model_quantized.onnx"]);
        let no_tokenizer = model_dir(root.path(), "bare", &["model.onnx"]);
        let no_model = model_dir(root.path(), "tok", &["tokenizer.json"]);

        assert!(has_valid_model_files(&full));
        assert!(has_valid_model_files(&quantized));
        assert!(!has_valid_model_files(&no_tokenizer));
        assert!(!has_valid_model_files(&no_model));
    }

    #[test]
    fn test_resolve_in_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        model_dir(first.path(), "enc", &["tokenizer.json", "model.onnx"]);
        model_dir(second.path(), "enc", &["tokenizer.json", "model.onnx"]);

        let resolved = resolve_in(
            "enc",
            &[first.path().to_path_buf(), second.path().to_path_buf()],
        )
        .unwrap();
        assert_eq!(resolved, first.path().join("enc"));
    }

    #[test]
    fn test_local_root_fallback() {
        let root = TempDir::new().unwrap();
        let dir = model_dir(root.path(), "local-only-enc-xyz", &["tokenizer.json", "model.onnx"]);
        assert_eq!(resolve_model_path("local-only-enc-xyz", root.path()).unwrap(), dir);
    }

    #[test]
    fn test_missing_model_names_both_locations() {
        let root = TempDir::new().unwrap();
        let err = resolve_model_path("no-such-model-xyz", root.path()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("no-such-model-xyz"));
        assert!(message.contains(&root.path().display().to_string()));
    }
}
