//! Lexical normalizer - reduces Portuguese text to lemmas
//!
//! Dictionary lemmatizer built around a closed vocabulary (the intent
//! keyword lemmas). Inflected verb forms are generated from each infinitive
//! in the vocabulary, and plural/feminine nominal forms are reduced by suffix
//! rules that only fire when they land on a vocabulary word. Everything else
//! passes through lowercased, which is what a full lemmatizer would do for
//! words the matcher never looks at anyway.

mod inflection;

use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

use crate::intent::Intent;

/// Vocabulary-driven lemmatizer
#[derive(Debug, Clone)]
pub struct Lemmatizer {
    vocabulary: HashSet<String>,
    forms: HashMap<String, String>,
}

impl Lemmatizer {
    /// Build a lemmatizer for the given lemma vocabulary
    ///
    /// When two infinitives inflect to the same surface form, the one that
    /// appears first in `vocabulary` owns it.
    pub fn new<'a>(vocabulary: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ordered = Vec::new();
        let mut seen = HashSet::new();
        for lemma in vocabulary {
            let lemma = lemma.to_lowercase();
            if seen.insert(lemma.clone()) {
                ordered.push(lemma);
            }
        }

        let mut forms = HashMap::new();
        for (form, lemma) in inflection::IRREGULAR_FORMS {
            forms.insert(form.to_string(), lemma.to_string());
        }
        for lemma in &ordered {
            for form in inflection::verb_forms(lemma) {
                forms.entry(form).or_insert_with(|| lemma.clone());
            }
        }

        Self {
            vocabulary: seen,
            forms,
        }
    }

    /// Lemmatizer over every keyword of the intent catalog
    pub fn for_catalog() -> Self {
        Self::new(
            Intent::ALL
                .iter()
                .flat_map(|intent| intent.keywords().iter().copied()),
        )
    }

    /// Normalize text into lemmas, dropping punctuation and whitespace tokens
    pub fn lemmatize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .unicode_words()
            .map(|word| self.lemma(word))
            .collect()
    }

    /// Lemma for one lowercase word
    pub fn lemma(&self, word: &str) -> String {
        if self.vocabulary.contains(word) {
            return word.to_string();
        }
        if let Some(lemma) = self.forms.get(word) {
            return lemma.clone();
        }
        inflection::nominal_candidates(word)
            .into_iter()
            .find(|candidate| self.vocabulary.contains(candidate))
            .unwrap_or_else(|| word.to_string())
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::for_catalog()
    }
}
