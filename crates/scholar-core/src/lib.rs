//! Scholar Core - Domain models, errors, and shared types
//!
//! This crate defines the types shared by every Scholar crate:
//! - Study artifacts (key points, flashcards, quiz questions, timeline)
//! - The assembled study-material bundle
//! - Common error types
//! - Configuration management
//! - Exam assembly and grading

pub mod config;
pub mod exam;

pub use config::{AppConfig, ConfigError, LoggingConfig, StudyConfig};
pub use exam::{Exam, ExamConfig, ExamResult, QuestionOutcome};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Scholar operations
#[derive(Error, Debug)]
pub enum ScholarError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Background task failed: {0}")]
    TaskError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ScholarError>;

// ============================================================================
// Study Artifacts
// ============================================================================

/// Placeholder that masks the answer token in cloze questions
pub const MASK_PLACEHOLDER: &str = "________";

/// A top-ranked sentence from the source article
pub type KeyPoint = String;

/// A year-anchored sentence for the chronological view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    /// Four-digit year, e.g. "1804"
    pub year: String,

    /// Cleaned sentence mentioning the year
    pub description: String,
}

impl TimelineEvent {
    /// Numeric value of the year (0 if the year is not numeric)
    pub fn year_value(&self) -> u32 {
        self.year.parse().unwrap_or(0)
    }
}

/// Cloze flashcard: the front masks one token, the back reveals it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// Kind of quiz question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple choice, auto-gradable
    #[default]
    Mcq,
    /// Free text, graded against a model answer
    ShortAnswer,
}

impl std::fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mcq => write!(f, "mcq"),
            Self::ShortAnswer => write!(f, "short_answer"),
        }
    }
}

/// A multiple-choice cloze question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Cloze sentence containing exactly one placeholder
    pub question: String,

    /// Answer options in presentation order
    pub options: Vec<String>,

    pub correct_answer: String,

    /// Maximum marks for this question
    pub marks: u32,
}

impl QuizQuestion {
    /// Check whether a chosen option is the correct answer
    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }
}

/// Everything generated for one article
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMaterial {
    /// Article title
    pub title: String,

    pub key_points: Vec<KeyPoint>,

    pub flashcards: Vec<Flashcard>,

    pub quiz: Vec<QuizQuestion>,

    pub timeline: Vec<TimelineEvent>,

    /// When the bundle was assembled
    pub generated_at: DateTime<Utc>,
}

impl StudyMaterial {
    /// Create an empty bundle for a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            key_points: Vec::new(),
            flashcards: Vec::new(),
            quiz: Vec::new(),
            timeline: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// True when no extractor produced anything
    pub fn is_empty(&self) -> bool {
        self.key_points.is_empty()
            && self.flashcards.is_empty()
            && self.quiz.is_empty()
            && self.timeline.is_empty()
    }

    /// Total marks available across the quiz
    pub fn total_marks(&self) -> u32 {
        self.quiz.iter().map(|q| q.marks).sum()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_question() -> QuizQuestion {
        QuizQuestion {
            id: "q-0".to_string(),
            kind: QuestionKind::Mcq,
            question: format!("Napoleon was crowned in {MASK_PLACEHOLDER}."),
            options: vec![
                "1769".to_string(),
                "1804".to_string(),
                "1815".to_string(),
                "1821".to_string(),
            ],
            correct_answer: "1804".to_string(),
            marks: 1,
        }
    }

    #[test]
    fn test_quiz_question_json_shape() {
        let json = serde_json::to_value(sample_question()).unwrap();

        assert_eq!(json["type"], "mcq");
        assert_eq!(json["correctAnswer"], "1804");
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_is_correct() {
        let q = sample_question();
        assert!(q.is_correct("1804"));
        assert!(!q.is_correct("1769"));
    }

    #[test]
    fn test_timeline_year_value() {
        let event = TimelineEvent {
            year: "1769".to_string(),
            description: "Napoleon was born in 1769.".to_string(),
        };
        assert_eq!(event.year_value(), 1769);
    }

    #[test]
    fn test_study_material_totals() {
        let mut material = StudyMaterial::new("Napoleon");
        assert!(material.is_empty());

        material.quiz.push(sample_question());
        material.quiz.push(sample_question());

        assert!(!material.is_empty());
        assert_eq!(material.total_marks(), 2);

        let json = serde_json::to_value(&material).unwrap();
        assert!(json["keyPoints"].is_array());
        assert!(json["generatedAt"].is_string());
    }
}
