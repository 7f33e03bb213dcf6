//! Cloze flashcard generation
//!
//! Each sentence contributes at most one card: its most salient token is
//! masked on the front and revealed on the back.

use std::collections::HashSet;

use scholar_core::{Flashcard, MASK_PLACEHOLDER};

use crate::segmenter::sentences;
use crate::text::{
    char_len, clean_sentence, has_digit, mask_first, starts_uppercase, strip_punctuation, tokens,
};
use crate::Extractor;

/// Only the first sentences are considered
pub const MAX_SENTENCES: usize = 500;

const MIN_TOKENS: usize = 5;
const MAX_TOKENS: usize = 40;
const MIN_ANSWER_LEN: usize = 3;
const LONG_TOKEN_LEN: usize = 7;

/// Salience of a token at position `index`: +3 for a digit, +2 for a
/// capitalized non-initial token, +1 for a long word.
pub fn token_score(token: &str, index: usize) -> i32 {
    let mut score = 0;
    if has_digit(token) {
        score += 3;
    }
    if index > 0 && starts_uppercase(token) {
        score += 2;
    }
    if char_len(&strip_punctuation(token)) > LONG_TOKEN_LEN {
        score += 1;
    }
    score
}

/// Highest-scoring token; the earliest wins ties. `None` if nothing scores.
fn best_token<'a>(words: &[&'a str]) -> Option<&'a str> {
    let mut best: Option<(&'a str, i32)> = None;
    for (i, &word) in words.iter().enumerate() {
        let score = token_score(word, i);
        if score > best.map_or(0, |(_, s)| s) {
            best = Some((word, score));
        }
    }
    best.map(|(word, _)| word)
}

/// Generates cloze flashcards with case-insensitively unique answers
#[derive(Debug, Clone, Copy, Default)]
pub struct FlashcardGenerator;

impl FlashcardGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for FlashcardGenerator {
    type Output = Flashcard;

    fn extract(&self, corpus: &str) -> Vec<Flashcard> {
        let mut flashcards = Vec::new();
        let mut seen_answers: HashSet<String> = HashSet::new();

        for (idx, sentence) in sentences(corpus).take(MAX_SENTENCES).enumerate() {
            let cleaned = clean_sentence(sentence);
            // The front must carry exactly one placeholder
            if cleaned.contains(MASK_PLACEHOLDER) {
                continue;
            }
            let words = tokens(&cleaned);
            if words.len() < MIN_TOKENS || words.len() > MAX_TOKENS {
                continue;
            }

            let Some(token) = best_token(&words) else {
                continue;
            };

            let answer = strip_punctuation(token);
            if char_len(&answer) < MIN_ANSWER_LEN {
                continue;
            }
            // A duplicate answer drops the sentence; the runner-up is not tried
            if !seen_answers.insert(answer.to_lowercase()) {
                continue;
            }

            flashcards.push(Flashcard {
                id: format!("fc-{idx}"),
                front: mask_first(&cleaned, token),
                back: answer,
            });
        }

        tracing::debug!(count = flashcards.len(), "generated flashcards");
        flashcards
    }
}
