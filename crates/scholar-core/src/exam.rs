//! Exam paper assembly and grading
//!
//! An exam is a fixed slice of the generated quiz pool with a time budget.
//! Multiple-choice answers are graded automatically; anything else scores
//! zero here and must be graded by an external reviewer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{QuestionKind, QuizQuestion, Result, ScholarError};

/// Exam setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamConfig {
    /// Number of questions taken from the front of the pool
    pub question_count: usize,

    /// Time allowed per multiple-choice question
    pub seconds_per_question: u64,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            seconds_per_question: 60,
        }
    }
}

impl ExamConfig {
    /// Set question count
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.question_count == 0 {
            return Err(ScholarError::ValidationError(
                "exam needs at least one question".to_string(),
            ));
        }
        if self.seconds_per_question == 0 {
            return Err(ScholarError::ValidationError(
                "seconds_per_question must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// A ready-to-sit exam paper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub questions: Vec<QuizQuestion>,

    /// Total time budget in seconds
    pub duration_secs: u64,
}

impl Exam {
    /// Build an exam from the first `question_count` questions of a pool
    pub fn from_pool(pool: &[QuizQuestion], config: &ExamConfig) -> Result<Self> {
        config.validate()?;

        let questions: Vec<QuizQuestion> =
            pool.iter().take(config.question_count).cloned().collect();
        let duration_secs = questions.len() as u64 * config.seconds_per_question;

        Ok(Self {
            questions,
            duration_secs,
        })
    }

    /// Sum of marks over all questions
    pub fn max_score(&self) -> u32 {
        self.questions.iter().map(|q| q.marks).sum()
    }

    /// Grade a set of answers keyed by question id
    pub fn grade(&self, answers: &HashMap<String, String>) -> ExamResult {
        let outcomes: Vec<QuestionOutcome> = self
            .questions
            .iter()
            .map(|q| {
                let chosen = answers.get(&q.id).cloned();
                let marks_obtained = match (q.kind, chosen.as_deref()) {
                    (QuestionKind::Mcq, Some(choice)) if q.is_correct(choice) => q.marks,
                    _ => 0,
                };

                QuestionOutcome {
                    id: q.id.clone(),
                    chosen,
                    correct_answer: q.correct_answer.clone(),
                    marks_obtained,
                    marks: q.marks,
                }
            })
            .collect();

        ExamResult {
            score: outcomes.iter().map(|o| o.marks_obtained).sum(),
            max_score: self.max_score(),
            outcomes,
        }
    }
}

/// Grading outcome for a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    pub id: String,
    pub chosen: Option<String>,
    pub correct_answer: String,
    pub marks_obtained: u32,
    pub marks: u32,
}

impl QuestionOutcome {
    /// A question counts as passed at half marks or better
    pub fn is_pass(&self) -> bool {
        self.marks_obtained > 0 && self.marks_obtained * 2 >= self.marks
    }
}

/// Result of grading an exam
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub score: u32,
    pub max_score: u32,
    pub outcomes: Vec<QuestionOutcome>,
}

impl ExamResult {
    /// Score as a percentage of the maximum (0 for an empty exam)
    pub fn percentage(&self) -> f32 {
        if self.max_score == 0 {
            0.0
        } else {
            self.score as f32 * 100.0 / self.max_score as f32
        }
    }

    /// Number of passed questions
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_pass()).count()
    }
}
