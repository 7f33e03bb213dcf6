//! Scholar Extractor - Study-material extraction pipeline
//!
//! Turns the plain text of an article into study artifacts with a set of
//! deterministic heuristics:
//! - Key points: highest-scoring sentences
//! - Timeline: one event per distinct year, chronologically ordered
//! - Flashcards: cloze cards masking the most salient token
//! - Quiz: four-option multiple-choice questions with same-kind distractors
//!
//! All extractors read the same sentence stream produced by [`segmenter`]
//! and are independent of each other. [`StudyPipeline`] runs all four and
//! assembles a `StudyMaterial` bundle.

pub mod flashcards;
pub mod key_points;
pub mod pipeline;
pub mod quiz;
pub mod segmenter;
pub mod text;
pub mod timeline;

pub use flashcards::FlashcardGenerator;
pub use key_points::{KeyPointExtractor, ScoredSentence};
pub use pipeline::StudyPipeline;
pub use quiz::{CandidatePools, QuizGenerator, TargetKind};
pub use segmenter::{sentences, Sentences};
pub use timeline::TimelineExtractor;

/// Trait for study-material extractors.
///
/// Extraction never fails: degenerate input yields fewer (or no) items.
pub trait Extractor: Send + Sync {
    type Output;

    fn extract(&self, corpus: &str) -> Vec<Self::Output>;
}
