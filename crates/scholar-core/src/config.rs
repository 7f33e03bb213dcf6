//! Scholar Configuration Management
//!
//! Handles configuration from environment variables and TOML files,
//! with defaults suitable for interactive use. Algorithm thresholds are
//! fixed constants of the extractors and are not configurable.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::exam::ExamConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Study pipeline configuration
    pub study: StudyConfig,

    /// Exam paper defaults
    pub exam: ExamConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Override every field whose variable `lookup` returns, whatever its value
    fn apply_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Study pipeline
        if let Some(seed) = lookup("SCHOLAR_QUIZ_SEED") {
            self.study.quiz_seed = Some(parse_env("SCHOLAR_QUIZ_SEED", seed)?);
        }
        if let Some(concurrent) = lookup("SCHOLAR_CONCURRENT") {
            self.study.concurrent = parse_bool("SCHOLAR_CONCURRENT", concurrent)?;
        }

        // Exam
        if let Some(count) = lookup("SCHOLAR_EXAM_QUESTIONS") {
            self.exam.question_count = parse_env("SCHOLAR_EXAM_QUESTIONS", count)?;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = parse_bool("LOG_JSON", json)?;
        }

        Ok(self)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn parse_bool(key: &str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
    }
}

/// Study pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    /// Fixed seed for quiz distractors and option order.
    /// `None` draws from OS entropy on every run.
    pub quiz_seed: Option<u64>,

    /// Run the four extractors as concurrent blocking tasks
    pub concurrent: bool,

    /// Title used when the input does not provide one
    pub default_title: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            quiz_seed: None,
            concurrent: false,
            default_title: "Untitled".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}
