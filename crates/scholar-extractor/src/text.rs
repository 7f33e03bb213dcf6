//! Sentence cleaning and token helpers shared by the extractors

use once_cell::sync::Lazy;
use regex::Regex;

use scholar_core::MASK_PLACEHOLDER;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const NBSP_ENTITY: &str = "&nbsp;";

/// Characters removed from a token before it becomes an answer
const ANSWER_PUNCTUATION: &[char] = &['.', ',', ';', '!', '?', '(', ')', '"'];

/// Replace non-breaking-space entities and trim. Inner whitespace is kept.
pub fn clean_entities(sentence: &str) -> String {
    sentence.replace(NBSP_ENTITY, " ").trim().to_string()
}

/// Replace non-breaking-space entities, collapse whitespace runs, and trim
pub fn clean_sentence(sentence: &str) -> String {
    let replaced = sentence.replace(NBSP_ENTITY, " ");
    WHITESPACE_RUN
        .replace_all(&replaced, " ")
        .trim()
        .to_string()
}

/// Split a cleaned sentence into single-space separated tokens
pub fn tokens(cleaned: &str) -> Vec<&str> {
    cleaned.split(' ').collect()
}

/// Token with answer punctuation removed
pub fn strip_punctuation(token: &str) -> String {
    token.chars().filter(|c| !ANSWER_PUNCTUATION.contains(c)).collect()
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

pub fn has_digit(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_digit())
}

pub fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Replace the first literal occurrence of `token` with the mask
pub fn mask_first(sentence: &str, token: &str) -> String {
    sentence.replacen(token, MASK_PLACEHOLDER, 1)
}
