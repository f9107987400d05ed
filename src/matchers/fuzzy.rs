//! Typo-tolerant matching against intent label spelling
//!
//! Each whitespace-separated word of the question is compared with every
//! intent label; the first word whose best label scores at or above the
//! cutoff decides the intent. This matches spelling only ("senah" finds
//! "senha"), not meaning.
//!
//! The returned intent is the one whose label was hit, which relies on
//! label and identifier being the same string (see [`crate::intent`]).

use anyhow::Result;

use super::{IntentMatcher, Stage};
use crate::intent::Intent;

/// Default acceptance score on the 0-100 scale
pub const DEFAULT_CUTOFF: f64 = 80.0;

/// Stage 2: fuzzy label correction
pub struct FuzzyMatcher {
    labels: Vec<(Intent, Vec<char>)>,
    cutoff: f64,
}

impl FuzzyMatcher {
    pub fn new(cutoff: f64) -> Self {
        Self {
            labels: Intent::ALL
                .iter()
                .map(|&intent| (intent, intent.label().chars().collect()))
                .collect(),
            cutoff,
        }
    }

    /// Best label for one word, if it clears the cutoff
    ///
    /// Ties go to the earlier label in catalog order.
    pub fn best_label(&self, word: &str) -> Option<(Intent, f64)> {
        let word: Vec<char> = word.chars().collect();
        let mut best: Option<(Intent, f64)> = None;

        for (intent, label) in &self.labels {
            let score = weighted_ratio(&word, label);
            if score >= self.cutoff && best.map_or(true, |(_, top)| score > top) {
                best = Some((*intent, score));
            }
        }

        best
    }

    /// First word (in order) that clears the cutoff decides
    pub fn correct(&self, text: &str) -> Option<Intent> {
        text.to_lowercase()
            .split_whitespace()
            .find_map(|word| self.best_label(word))
            .map(|(intent, _)| intent)
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF)
    }
}

impl IntentMatcher for FuzzyMatcher {
    fn stage(&self) -> Stage {
        Stage::Fuzzy
    }

    fn detect(&self, text: &str) -> Result<Option<Intent>> {
        Ok(self.correct(text))
    }
}

/// Normalized Indel similarity on a 0-100 scale
pub fn ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    rapidfuzz::fuzz::ratio(a.iter().copied(), b.iter().copied()) * 100.0
}

/// Best [`ratio`] of the shorter string against any same-length window of
/// the longer one, including windows clipped at either end
pub fn partial_ratio(a: &[char], b: &[char]) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let m = short.len();
    let n = long.len();
    let mut best = 0.0_f64;

    // windows growing in from the left edge
    for end in 1..m {
        best = best.max(ratio(short, &long[..end]));
    }
    // full windows
    for start in 0..=(n - m) {
        best = best.max(ratio(short, &long[start..start + m]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    // windows shrinking out at the right edge
    for start in (n - m + 1)..n {
        best = best.max(ratio(short, &long[start..]));
    }

    best
}

/// Weighted ratio for single tokens
///
/// Similar-length strings use the plain ratio. When one string is at least
/// 1.5x longer, a scaled partial ratio also competes (x0.9, or x0.6 from 8x).
/// Words come from a whitespace split and labels hold no whitespace, so the
/// token-sorted variants reduce to these two and are omitted.
pub fn weighted_ratio(a: &[char], b: &[char]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let plain = ratio(a, b);
    let (shorter, longer) = (a.len().min(b.len()), a.len().max(b.len()));
    let length_ratio = longer as f64 / shorter as f64;

    if length_ratio < 1.5 {
        return plain;
    }

    let partial_scale = if length_ratio < 8.0 { 0.9 } else { 0.6 };
    plain.max(partial_ratio(a, b) * partial_scale)
}
