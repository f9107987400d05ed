//! Intent matcher stages
//!
//! Each stage looks at the raw question and either names an intent or
//! reports no match (`Ok(None)`). A stage error means the stage itself is
//! broken (model inference failed), never that the question was unclear.

pub mod classifier;
pub mod fuzzy;
pub mod lexicon;
pub mod semantic;

pub use classifier::ClassifierMatcher;
pub use fuzzy::FuzzyMatcher;
pub use lexicon::LemmaMatcher;
pub use semantic::EmbeddingMatcher;

use anyhow::Result;
use serde::Serialize;
use std::fmt;

use crate::intent::Intent;

/// Escalation stages, cheapest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Lemma,
    Fuzzy,
    Embedding,
    Classifier,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lemma => "lemma",
            Stage::Fuzzy => "fuzzy",
            Stage::Embedding => "embedding",
            Stage::Classifier => "classifier",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One technique for turning a question into an intent
///
/// Shared read-only across request threads; stages backed by a model keep
/// their mutable inference state behind a lock.
pub trait IntentMatcher: Send + Sync {
    /// Which escalation stage this matcher implements
    fn stage(&self) -> Stage;

    /// Detect the intent of `text`, or `None` when not confident
    fn detect(&self, text: &str) -> Result<Option<Intent>>;
}
