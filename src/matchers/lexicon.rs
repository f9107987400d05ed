//! Lemma-based intent matching
//!
//! Scores every intent by how many of the question's lemmas appear in its
//! keyword set. Repeated lemmas count every time they occur.

use anyhow::Result;
use std::collections::HashSet;

use super::{IntentMatcher, Stage};
use crate::intent::Intent;
use crate::nlp::Lemmatizer;

/// Keyword lemmas per intent, in catalog order
#[derive(Debug, Clone)]
pub struct IntentLexicon {
    entries: Vec<(Intent, HashSet<String>)>,
}

impl IntentLexicon {
    /// The built-in catalog keywords
    pub fn catalog() -> Self {
        Self::from_entries(
            Intent::ALL
                .iter()
                .map(|&intent| (intent, intent.keywords().iter().copied())),
        )
    }

    /// Build from explicit entries; iteration order is the tie-break order
    pub fn from_entries<'a, K>(entries: impl IntoIterator<Item = (Intent, K)>) -> Self
    where
        K: IntoIterator<Item = &'a str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(intent, keywords)| {
                    (
                        intent,
                        keywords.into_iter().map(str::to_lowercase).collect(),
                    )
                })
                .collect(),
        }
    }

    /// Keyword set of an intent
    pub fn keywords(&self, intent: Intent) -> Option<&HashSet<String>> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == intent)
            .map(|(_, keywords)| keywords)
    }

    /// Match counts per intent for a lemma sequence, in entry order
    pub fn score(&self, lemmas: &[String]) -> Vec<(Intent, usize)> {
        self.entries
            .iter()
            .map(|(intent, keywords)| {
                let hits = lemmas.iter().filter(|lemma| keywords.contains(*lemma)).count();
                (*intent, hits)
            })
            .collect()
    }
}

/// Stage 1: exact keyword lemma matching
pub struct LemmaMatcher {
    lexicon: IntentLexicon,
    lemmatizer: Lemmatizer,
}

impl LemmaMatcher {
    pub fn new(lexicon: IntentLexicon, lemmatizer: Lemmatizer) -> Self {
        Self {
            lexicon,
            lemmatizer,
        }
    }

    /// Matcher over the built-in catalog
    pub fn catalog() -> Self {
        Self::new(IntentLexicon::catalog(), Lemmatizer::for_catalog())
    }

    pub fn lexicon(&self) -> &IntentLexicon {
        &self.lexicon
    }

    /// Best-scoring intent; the first one in lexicon order wins ties
    pub fn best_match(&self, text: &str) -> Option<Intent> {
        let lemmas = self.lemmatizer.lemmatize(text);
        let mut best: Option<(Intent, usize)> = None;

        for (intent, hits) in self.lexicon.score(&lemmas) {
            if hits > best.map_or(0, |(_, top)| top) {
                best = Some((intent, hits));
            }
        }

        best.map(|(intent, _)| intent)
    }
}

impl IntentMatcher for LemmaMatcher {
    fn stage(&self) -> Stage {
        Stage::Lemma
    }

    fn detect(&self, text: &str) -> Result<Option<Intent>> {
        Ok(self.best_match(text))
    }
}
