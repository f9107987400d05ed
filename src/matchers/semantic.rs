//! Embedding similarity matching
//!
//! Intent labels are embedded once when the matcher is built; each question
//! is embedded with the same engine and compared by cosine similarity.

use anyhow::{bail, Result};
use parking_lot::Mutex;

use super::{IntentMatcher, Stage};
use crate::embeddings::{argmax, cosine_similarity, EmbeddingEngine};
use crate::intent::Intent;

/// Default minimum cosine similarity
pub const DEFAULT_THRESHOLD: f32 = 0.70;

/// One embedding per catalog intent, in catalog order
#[derive(Debug, Clone)]
pub struct IntentEmbeddingTable {
    rows: Vec<(Intent, Vec<f32>)>,
}

impl IntentEmbeddingTable {
    /// Embed every intent label with `engine`
    pub fn build(engine: &mut dyn EmbeddingEngine) -> Result<Self> {
        let labels: Vec<String> = Intent::ALL.iter().map(|i| i.label().to_string()).collect();
        let vectors = engine.embed_batch(&labels)?;

        if vectors.len() != Intent::ALL.len() {
            bail!(
                "Embedding engine returned {} vectors for {} intent labels",
                vectors.len(),
                Intent::ALL.len()
            );
        }

        let dimension = engine.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            bail!(
                "Intent label embedding has {} dimensions, engine {} reports {}",
                bad.len(),
                engine.model_name(),
                dimension
            );
        }

        Ok(Self {
            rows: Intent::ALL.iter().copied().zip(vectors).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cosine similarity of `query` against every row, in catalog order
    pub fn similarities(&self, query: &[f32]) -> Vec<(Intent, f32)> {
        self.rows
            .iter()
            .map(|(intent, vector)| (*intent, cosine_similarity(query, vector)))
            .collect()
    }
}

/// Stage 3: sentence-embedding similarity
pub struct EmbeddingMatcher {
    engine: Mutex<Box<dyn EmbeddingEngine>>,
    table: IntentEmbeddingTable,
    threshold: f32,
}

impl EmbeddingMatcher {
    /// Build the intent table with `engine` and keep the engine for questions
    pub fn new(mut engine: Box<dyn EmbeddingEngine>, threshold: f32) -> Result<Self> {
        let table = IntentEmbeddingTable::build(engine.as_mut())?;
        tracing::debug!(
            model = engine.model_name(),
            dimension = engine.dimension(),
            rows = table.len(),
            "intent embedding table ready"
        );

        Ok(Self {
            engine: Mutex::new(engine),
            table,
            threshold,
        })
    }

    pub fn table(&self) -> &IntentEmbeddingTable {
        &self.table
    }

    /// Closest intent and its similarity, before the confidence gate
    pub fn closest(&self, text: &str) -> Result<Option<(Intent, f32)>> {
        let query = self.engine.lock().embed(text)?;
        let scored = self.table.similarities(&query);
        let values: Vec<f32> = scored.iter().map(|(_, sim)| *sim).collect();

        Ok(argmax(&values).map(|(i, sim)| (scored[i].0, sim)))
    }
}

impl IntentMatcher for EmbeddingMatcher {
    fn stage(&self) -> Stage {
        Stage::Embedding
    }

    fn detect(&self, text: &str) -> Result<Option<Intent>> {
        Ok(match self.closest(text)? {
            Some((intent, similarity)) if similarity >= self.threshold => Some(intent),
            Some((intent, similarity)) => {
                tracing::trace!(%intent, similarity, "embedding match below threshold");
                None
            }
            None => None,
        })
    }
}
