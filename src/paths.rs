//! Filesystem layout for docentify.
//!
//! Defines WHERE things live. No I/O, no validation.
//!
//! ```text
//! ~/.docentify/
//! ├── config.toml              # User config
//! └── cache/
//!     └── models/{name}/       # model.onnx | model_quantized.onnx + tokenizer.json
//!
//! ./docentify.toml             # Working-directory config (wins over ~/.docentify)
//! ./resources/models/{name}/   # Local model fallback
//! ```

use std::path::PathBuf;

/// User home for docentify: `~/.docentify/`
pub fn docentify_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".docentify")
}

/// Rebuildable data: `~/.docentify/cache/`
pub fn docentify_cache() -> PathBuf {
    docentify_home().join("cache")
}

/// User config file: `~/.docentify/config.toml`
pub fn config_path() -> PathBuf {
    docentify_home().join("config.toml")
}

/// Model paths
pub mod models {
    use super::*;

    /// Model cache directory: `~/.docentify/cache/models/`
    pub fn cache_dir() -> PathBuf {
        docentify_cache().join("models")
    }

    /// Specific model directory: `~/.docentify/cache/models/{name}/`
    pub fn model_dir(name: &str) -> PathBuf {
        cache_dir().join(name)
    }
}
