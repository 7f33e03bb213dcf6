//! Multiple-choice quiz generation
//!
//! Each long enough sentence is turned into a cloze question whose answer
//! is a number or a proper noun. Distractors are drawn from corpus-wide
//! pools of the same kind, so a year is offered alongside other years and
//! a name alongside other names.
//!
//! Distractor draws and option order come from an injected random source.
//! Use a seeded generator for reproducible output; with an entropy-seeded
//! generator the option order differs between runs.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use regex::Regex;

use scholar_core::{QuestionKind, QuizQuestion, MASK_PLACEHOLDER};

use crate::segmenter::sentences;
use crate::text::{
    char_len, clean_sentence, has_digit, mask_first, starts_uppercase, strip_punctuation, tokens,
};
use crate::Extractor;

/// Only the first sentences are considered
pub const MAX_SENTENCES: usize = 500;

/// Options per question, including the correct answer
pub const OPTION_COUNT: usize = 4;

const MIN_TOKENS: usize = 10;
const MAX_DRAW_ATTEMPTS: usize = 20;
const MIN_NOUN_TARGET_LEN: usize = 5;
const MIN_POOL_NOUN_LEN: usize = 4;
const MARKS_PER_QUESTION: u32 = 1;

static PROPER_NOUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][a-z]+$").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

// ============================================================================
// Candidate Pools
// ============================================================================

/// What kind of token a question asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Number,
    ProperNoun,
}

/// Distractor candidates collected once from the whole corpus.
///
/// Built before any sentence is processed and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct CandidatePools {
    proper_nouns: IndexSet<String>,
    numbers: IndexSet<String>,
    /// Every whitespace token, punctuation stripped, duplicates kept
    words: Vec<String>,
}

impl CandidatePools {
    /// Collect pools from the entire corpus (not per sentence)
    pub fn from_corpus(corpus: &str) -> Self {
        let words: Vec<String> = corpus.split_whitespace().map(strip_punctuation).collect();

        let proper_nouns = words
            .iter()
            .filter(|w| PROPER_NOUN.is_match(w) && char_len(w) > MIN_POOL_NOUN_LEN)
            .cloned()
            .collect();
        let numbers = words.iter().filter(|w| NUMBER.is_match(w)).cloned().collect();

        Self {
            proper_nouns,
            numbers,
            words,
        }
    }

    pub fn proper_nouns(&self) -> &IndexSet<String> {
        &self.proper_nouns
    }

    pub fn numbers(&self) -> &IndexSet<String> {
        &self.numbers
    }

    /// Pool matching a target kind
    pub fn pool(&self, kind: TargetKind) -> &IndexSet<String> {
        match kind {
            TargetKind::Number => &self.numbers,
            TargetKind::ProperNoun => &self.proper_nouns,
        }
    }

    fn draw<'a, R: Rng + ?Sized>(pool: &'a IndexSet<String>, rng: &mut R) -> Option<&'a str> {
        if pool.is_empty() {
            return None;
        }
        pool.get_index(rng.gen_range(0..pool.len()))
            .map(String::as_str)
    }

    fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    /// Gather `OPTION_COUNT` unique options starting with `answer`.
    ///
    /// Up to 20 draws from the matching pool, then one whole-corpus word as
    /// a last resort. Returns `None` when four options cannot be assembled.
    pub fn assemble_options<R: Rng + ?Sized>(
        &self,
        answer: &str,
        kind: TargetKind,
        rng: &mut R,
    ) -> Option<Vec<String>> {
        let mut options: IndexSet<String> = IndexSet::new();
        options.insert(answer.to_string());

        let pool = self.pool(kind);
        let mut attempts = 0;
        while options.len() < OPTION_COUNT && attempts < MAX_DRAW_ATTEMPTS {
            if let Some(candidate) = Self::draw(pool, &mut *rng) {
                if candidate != answer {
                    options.insert(candidate.to_string());
                }
            }
            attempts += 1;
        }

        if options.len() < OPTION_COUNT {
            if let Some(word) = self.random_word(&mut *rng) {
                if !word.is_empty() && word != answer {
                    options.insert(word.to_string());
                }
            }
        }

        (options.len() == OPTION_COUNT).then(|| options.into_iter().collect())
    }
}

// ============================================================================
// Target Selection
// ============================================================================

/// The token a question masks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target<'a> {
    pub raw: &'a str,
    pub kind: TargetKind,
}

/// First token with a digit; otherwise the first non-initial capitalized
/// token longer than five characters once punctuation is stripped.
pub fn find_target<'a>(words: &[&'a str]) -> Option<Target<'a>> {
    if let Some(&raw) = words.iter().find(|w| has_digit(w)) {
        return Some(Target {
            raw,
            kind: TargetKind::Number,
        });
    }

    words
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, w)| {
            starts_uppercase(w) && char_len(&strip_punctuation(w)) > MIN_NOUN_TARGET_LEN
        })
        .map(|(_, &raw)| Target {
            raw,
            kind: TargetKind::ProperNoun,
        })
}

// ============================================================================
// Quiz Generator
// ============================================================================

/// Generates four-option multiple-choice questions
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizGenerator {
    seed: Option<u64>,
}

impl QuizGenerator {
    /// Generator drawing from OS entropy on every run
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Generator with a fixed seed; output is fully reproducible
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Set or clear the seed
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Generate questions using a caller-supplied random source
    pub fn generate<R: Rng + ?Sized>(&self, corpus: &str, rng: &mut R) -> Vec<QuizQuestion> {
        let pools = CandidatePools::from_corpus(corpus);
        tracing::trace!(
            proper_nouns = pools.proper_nouns().len(),
            numbers = pools.numbers().len(),
            "built distractor pools"
        );

        let mut questions = Vec::new();
        for (idx, sentence) in sentences(corpus).take(MAX_SENTENCES).enumerate() {
            let cleaned = clean_sentence(sentence);
            if cleaned.contains(MASK_PLACEHOLDER) {
                continue;
            }
            let words = tokens(&cleaned);
            if words.len() < MIN_TOKENS {
                continue;
            }

            let Some(target) = find_target(&words) else {
                continue;
            };

            let answer = strip_punctuation(target.raw);
            let Some(mut options) = pools.assemble_options(&answer, target.kind, &mut *rng) else {
                tracing::trace!(idx, answer = %answer, "not enough distractors");
                continue;
            };
            options.shuffle(&mut *rng);

            questions.push(QuizQuestion {
                id: format!("q-{idx}"),
                kind: QuestionKind::Mcq,
                question: mask_first(&cleaned, target.raw),
                options,
                correct_answer: answer,
                marks: MARKS_PER_QUESTION,
            });
        }

        tracing::debug!(count = questions.len(), "generated quiz questions");
        questions
    }

    fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

impl Extractor for QuizGenerator {
    type Output = QuizQuestion;

    fn extract(&self, corpus: &str) -> Vec<QuizQuestion> {
        let mut rng = self.rng();
        self.generate(corpus, &mut rng)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const NAPOLEON: &str = "Napoleon Bonaparte was born on the island of Corsica in 1769 to a modest family. \
        He rose through the ranks of the French army during the revolution of 1789 and beyond. \
        In 1799 he staged a coup and made himself First Consul of the French Republic. \
        He crowned himself Emperor of the French at Notre-Dame in 1804 before a large crowd. \
        After the disastrous invasion of Russia in 1812 his power began to fade quickly. \
        He was finally defeated at Waterloo in 1815 by Wellington and Blucher together. \
        The great armies of the allies marched against Napoleon across the frozen plains of Prussia. \
        He died in exile on the remote island of Helena in 1821 after a long illness.";

    fn assert_well_formed(q: &QuizQuestion) {
        assert_eq!(q.options.len(), OPTION_COUNT, "{q:?}");
        let unique: HashSet<&String> = q.options.iter().collect();
        assert_eq!(unique.len(), OPTION_COUNT, "{q:?}");
        assert!(q.options.contains(&q.correct_answer), "{q:?}");
        assert_eq!(q.question.matches(MASK_PLACEHOLDER).count(), 1, "{q:?}");
        assert_eq!(q.marks, 1);
        assert_eq!(q.kind, QuestionKind::Mcq);
    }

    #[test]
    fn test_pools() {
        let pools = CandidatePools::from_corpus(
            "Paris, London and Rome (1804) hosted Napoleon. Napoleon came 12 times; Berlin.",
        );

        let nouns: Vec<&str> = pools.proper_nouns().iter().map(String::as_str).collect();
        assert_eq!(nouns, vec!["Paris", "London", "Napoleon", "Berlin"]);

        let numbers: Vec<&str> = pools.numbers().iter().map(String::as_str).collect();
        assert_eq!(numbers, vec!["1804", "12"]);
    }

    #[test]
    fn test_find_target_prefers_numbers() {
        let words = tokens("The Emperor Napoleon was crowned in 1804 at Paris.");
        let target = find_target(&words).unwrap();
        assert_eq!(target.raw, "1804");
        assert_eq!(target.kind, TargetKind::Number);
    }

    #[test]
    fn test_find_target_noun_fallback() {
        let words = tokens("Soldiers of Napoleon fought at Austerlitz.");
        let target = find_target(&words).unwrap();
        assert_eq!(target.raw, "Napoleon");
        assert_eq!(target.kind, TargetKind::ProperNoun);

        // Sentence-initial and short capitalized tokens are ignored
        let words = tokens("Napoleon met Ney and Murat there.");
        assert!(find_target(&words).is_none());
    }

    #[test]
    fn test_questions_are_well_formed() {
        let questions = QuizGenerator::seeded(7).extract(NAPOLEON);

        assert!(!questions.is_empty());
        for q in &questions {
            assert_well_formed(q);
        }
    }

    #[test]
    fn test_numeric_question_content() {
        let questions = QuizGenerator::seeded(11).extract(NAPOLEON);
        let q = questions.iter().find(|q| q.id == "q-0").unwrap();

        assert_eq!(q.correct_answer, "1769");
        assert_eq!(
            q.question,
            "Napoleon Bonaparte was born on the island of Corsica in ________ to a modest family."
        );
        // Numeric answers only get numeric distractors from the pool
        for option in &q.options {
            assert!(option.chars().all(|c| c.is_ascii_digit()), "{option}");
        }
    }

    #[test]
    fn test_noun_question_content() {
        let questions = QuizGenerator::seeded(3).extract(NAPOLEON);
        let q = questions.iter().find(|q| q.id == "q-6").unwrap();

        assert_eq!(q.correct_answer, "Napoleon");
        assert!(q.question.contains("marched against ________ across"));
    }

    #[test]
    fn test_short_sentences_skipped() {
        let questions = QuizGenerator::seeded(1)
            .extract("Napoleon was born in 1769. He died in 1821. Years 1800 1801 1802 1803.");
        assert!(questions.is_empty());
    }

    #[test]
    fn test_empty_pool_skips_question() {
        // Only one number in the whole corpus: the answer has no distractors
        let questions = QuizGenerator::seeded(5)
            .extract("The long and difficult campaign in the east finally ended in 1812 with retreat.");
        assert!(questions.is_empty());
    }

    #[test]
    fn test_small_pool_never_short_of_options() {
        let corpus = "The long and difficult campaign in the east finally ended in 1812 with retreat. \
                      Other years: 1805 1807.";
        let mut used_fallback = false;
        for seed in 0..20 {
            let questions = QuizGenerator::seeded(seed).extract(corpus);
            assert!(questions.len() <= 1);
            for q in &questions {
                assert_well_formed(q);
                // Two numeric distractors exist; the fourth option is a corpus word
                let numeric = q
                    .options
                    .iter()
                    .filter(|o| o.chars().all(|c| c.is_ascii_digit()))
                    .count();
                assert_eq!(numeric, 3, "{q:?}");
                used_fallback = true;
            }
        }
        assert!(used_fallback, "no seed completed the options with a corpus word");
    }

    #[test]
    fn test_sentence_with_existing_blank_skipped() {
        let corpus = "Fill the ________ blank about the battle of Austerlitz in 1805 today please. \
                      The armies met again at Jena in 1806 and at Wagram in 1809 and at Borodino in 1812.";
        let questions = QuizGenerator::seeded(4).extract(corpus);

        assert!(questions.iter().all(|q| q.id != "q-0"));
        for q in &questions {
            assert_well_formed(q);
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = QuizGenerator::seeded(42).extract(NAPOLEON);
        let b = QuizGenerator::seeded(42).extract(NAPOLEON);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unseeded_runs_checked_by_option_set() {
        // Option order (and distractor choice) is random without a seed.
        // Only order-independent properties are compared across runs.
        let a = QuizGenerator::new().extract(NAPOLEON);
        let b = QuizGenerator::new().extract(NAPOLEON);

        let ids = |qs: &[QuizQuestion]| qs.iter().map(|q| q.id.clone()).collect::<Vec<_>>();
        let answers = |qs: &[QuizQuestion]| {
            qs.iter()
                .map(|q| (q.id.clone(), q.correct_answer.clone(), q.question.clone()))
                .collect::<Vec<_>>()
        };

        for q in a.iter().chain(b.iter()) {
            assert_well_formed(q);
        }
        // Every target has a rich pool, so both runs emit the same
        // questions even when their options differ
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(answers(&a), answers(&b));
    }

    #[test]
    fn test_empty() {
        assert!(QuizGenerator::seeded(0).extract("").is_empty());
    }
}
