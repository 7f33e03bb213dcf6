//! Key-point extraction
//!
//! Ranks the leading sentences of an article by a small additive score and
//! keeps the best few as key points.

use once_cell::sync::Lazy;
use regex::Regex;

use scholar_core::KeyPoint;

use crate::segmenter::sentences;
use crate::text::{char_len, clean_entities};
use crate::Extractor;

/// Only the first sentences are ranked, bounding work on huge articles
pub const MAX_SENTENCES: usize = 300;

/// Number of key points returned
pub const MAX_KEY_POINTS: usize = 8;

static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]{4}").unwrap());
static CAPITALIZED_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z][a-z]+").unwrap());

/// A sentence with its ranking score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSentence {
    pub text: String,
    pub score: i32,
}

impl ScoredSentence {
    /// Score a raw sentence. Bonuses are independent and additive:
    /// +3 for a four-digit run, +1 for a capitalized word, +2 when the
    /// cleaned length is strictly between 50 and 200 characters.
    pub fn score(raw: &str) -> Self {
        let text = clean_entities(raw);
        let mut score = 0;

        if FOUR_DIGITS.is_match(raw) {
            score += 3;
        }
        if CAPITALIZED_WORD.is_match(raw) {
            score += 1;
        }
        let len = char_len(&text);
        if len > 50 && len < 200 {
            score += 2;
        }

        Self { text, score }
    }
}

/// Extracts up to eight key points per article
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyPointExtractor;

impl KeyPointExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for KeyPointExtractor {
    type Output = KeyPoint;

    fn extract(&self, corpus: &str) -> Vec<KeyPoint> {
        let mut scored: Vec<ScoredSentence> = sentences(corpus)
            .take(MAX_SENTENCES)
            .map(ScoredSentence::score)
            .collect();

        // Stable: equal scores keep source order
        scored.sort_by(|a, b| b.score.cmp(&a.score));

        let key_points: Vec<KeyPoint> = scored
            .into_iter()
            .take(MAX_KEY_POINTS)
            .map(|s| s.text)
            .collect();

        tracing::debug!(count = key_points.len(), "extracted key points");
        key_points
    }
}
