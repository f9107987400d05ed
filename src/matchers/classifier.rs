//! Transformer classifier matching - the last and most expensive stage

use anyhow::Result;
use parking_lot::Mutex;

use super::{IntentMatcher, Stage};
use crate::classifier::{softmax, SequenceClassifier};
use crate::embeddings::argmax;
use crate::intent::Intent;

/// Default probability the predicted class must exceed
pub const DEFAULT_THRESHOLD: f32 = 0.70;

/// Stage 4: fine-tuned sequence classification
pub struct ClassifierMatcher {
    classifier: Mutex<Box<dyn SequenceClassifier>>,
    threshold: f32,
}

impl ClassifierMatcher {
    pub fn new(classifier: Box<dyn SequenceClassifier>, threshold: f32) -> Self {
        Self {
            classifier: Mutex::new(classifier),
            threshold,
        }
    }

    /// Predicted class index and its softmax probability
    pub fn predict(&self, text: &str) -> Result<Option<(usize, f32)>> {
        let logits = self.classifier.lock().logits(text)?;
        let predicted = match argmax(&logits) {
            Some((index, _)) => index,
            None => return Ok(None),
        };
        let probabilities = softmax(&logits);
        Ok(Some((predicted, probabilities[predicted])))
    }
}

impl IntentMatcher for ClassifierMatcher {
    fn stage(&self) -> Stage {
        Stage::Classifier
    }

    fn detect(&self, text: &str) -> Result<Option<Intent>> {
        let (index, probability) = match self.predict(text)? {
            Some(prediction) => prediction,
            None => return Ok(None),
        };

        if probability <= self.threshold {
            tracing::trace!(index, probability, "classifier prediction below threshold");
            return Ok(None);
        }

        match Intent::ALL.get(index) {
            Some(&intent) => Ok(Some(intent)),
            None => {
                tracing::warn!(
                    index,
                    catalog = Intent::ALL.len(),
                    "classifier predicted a class outside the intent catalog"
                );
                Ok(None)
            }
        }
    }
}
