//! Service configuration
//!
//! Read from the first TOML file found among `$DOCENTIFY_CONFIG`,
//! `./docentify.toml` and `~/.docentify/config.toml`. Every section is
//! optional; missing values take the defaults below. Nothing is written back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "DOCENTIFY_CONFIG";
/// Overrides `[database] path`
pub const DB_ENV: &str = "DOCENTIFY_DB";
/// Overrides `[models] dir`
pub const MODELS_DIR_ENV: &str = "DOCENTIFY_MODELS_DIR";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub models: ModelsConfig,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Replacement canned replies keyed by intent label
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub responses: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("docentify.db")
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Local model root, searched after the user cache
    #[serde(default = "default_models_dir")]
    pub dir: PathBuf,
    /// Sentence encoder (directory name under the model roots)
    #[serde(default = "default_embedding")]
    pub embedding: String,
    #[serde(default = "default_embedding_dimension")]
    pub embedding_dimension: usize,
    /// Encoder input is truncated to this many tokens
    #[serde(default = "default_embedding_max_tokens")]
    pub embedding_max_tokens: usize,
    /// Fine-tuned intent classifier
    #[serde(default = "default_classifier")]
    pub classifier: String,
    #[serde(default = "default_classifier_max_tokens")]
    pub classifier_max_tokens: usize,
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("resources/models")
}
fn default_embedding() -> String {
    "paraphrase-multilingual-minilm-l12-v2".to_string()
}
fn default_embedding_dimension() -> usize {
    384
}
fn default_embedding_max_tokens() -> usize {
    crate::onnx::EMBEDDING_MAX_TOKENS
}
fn default_classifier() -> String {
    "bert-base-portuguese-cased".to_string()
}
fn default_classifier_max_tokens() -> usize {
    crate::onnx::CLASSIFIER_MAX_TOKENS
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_models_dir(),
            embedding: default_embedding(),
            embedding_dimension: default_embedding_dimension(),
            embedding_max_tokens: default_embedding_max_tokens(),
            classifier: default_classifier(),
            classifier_max_tokens: default_classifier_max_tokens(),
        }
    }
}

/// Confidence cutoffs for the scored stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdsConfig {
    /// Weighted-ratio score, 0-100, inclusive
    #[serde(default = "default_fuzzy")]
    pub fuzzy: f64,
    /// Cosine similarity, inclusive
    #[serde(default = "default_embedding_threshold")]
    pub embedding: f32,
    /// Softmax probability, strict
    #[serde(default = "default_classifier_threshold")]
    pub classifier: f32,
}

fn default_fuzzy() -> f64 {
    crate::matchers::fuzzy::DEFAULT_CUTOFF
}
fn default_embedding_threshold() -> f32 {
    crate::matchers::semantic::DEFAULT_THRESHOLD
}
fn default_classifier_threshold() -> f32 {
    crate::matchers::classifier::DEFAULT_THRESHOLD
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            fuzzy: default_fuzzy(),
            embedding: default_embedding_threshold(),
            classifier: default_classifier_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Config {
    /// Load from the first config file found, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::locate(|name| std::env::var(name).ok()) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// First existing candidate; an explicit `$DOCENTIFY_CONFIG` is returned
    /// even when missing so the read fails loudly
    fn locate(var: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        if let Some(explicit) = var(CONFIG_ENV).filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(explicit));
        }
        [PathBuf::from("docentify.toml"), paths::config_path()]
            .into_iter()
            .find(|path| path.exists())
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(db) = var(DB_ENV).filter(|v| !v.is_empty()) {
            self.database.path = PathBuf::from(db);
        }
        if let Some(dir) = var(MODELS_DIR_ENV).filter(|v| !v.is_empty()) {
            self.models.dir = PathBuf::from(dir);
        }
    }
}
