//! Scholar CLI - Command-line interface
//!
//! Usage:
//!   scholar generate <path> [--title T] [--seed N] [--only SECTION] [--concurrent]
//!   scholar exam <path> [--questions N] [--seed N] [--answers FILE]
//!
//! Results are written to stdout as JSON; logs go to stderr.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use scholar_core::{AppConfig, Exam, LoggingConfig, StudyMaterial};
use scholar_extractor::StudyPipeline;
use scholar_parser::ParserRegistry;

#[derive(Parser)]
#[command(name = "scholar")]
#[command(about = "Generate study material from encyclopedia articles")]
#[command(version)]
struct Cli {
    /// TOML configuration file (environment variables still override it)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate key points, flashcards, quiz and timeline for an article
    Generate {
        /// Article file (.txt, .md, .html)
        path: PathBuf,

        /// Title for the bundle (defaults to the article's own title)
        #[arg(long)]
        title: Option<String>,

        /// Fixed quiz seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print a single collection instead of the whole bundle
        #[arg(long, value_enum)]
        only: Option<Section>,

        /// Run the extractors as concurrent tasks
        #[arg(long)]
        concurrent: bool,
    },
    /// Build an exam paper from the generated quiz, and grade it
    Exam {
        /// Article file (.txt, .md, .html)
        path: PathBuf,

        /// Number of questions on the paper
        #[arg(long)]
        questions: Option<usize>,

        /// Fixed quiz seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// JSON file mapping question id to the chosen option
        #[arg(long)]
        answers: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Section {
    KeyPoints,
    Flashcards,
    Quiz,
    Timeline,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Generate {
            path,
            title,
            seed,
            only,
            concurrent,
        } => {
            let material =
                generate(&config, &path, title, seed, concurrent || config.study.concurrent)
                    .await?;

            match only {
                None => print_json(&material)?,
                Some(Section::KeyPoints) => print_json(&material.key_points)?,
                Some(Section::Flashcards) => print_json(&material.flashcards)?,
                Some(Section::Quiz) => print_json(&material.quiz)?,
                Some(Section::Timeline) => print_json(&material.timeline)?,
            }
        }
        Commands::Exam {
            path,
            questions,
            seed,
            answers,
        } => {
            let material = generate(&config, &path, None, seed, config.study.concurrent).await?;

            let exam_config = match questions {
                Some(count) => config.exam.clone().with_question_count(count),
                None => config.exam.clone(),
            };
            let exam = Exam::from_pool(&material.quiz, &exam_config)?;
            tracing::info!(
                questions = exam.questions.len(),
                duration_secs = exam.duration_secs,
                "exam paper ready"
            );

            match answers {
                Some(answers_path) => {
                    let answers = load_answers(&answers_path)?;
                    let result = exam.grade(&answers);
                    tracing::info!(
                        score = result.score,
                        max_score = result.max_score,
                        "exam graded"
                    );
                    print_json(&result)?;
                }
                None => print_json(&exam)?,
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("scholar={}", logging.level).into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn generate(
    config: &AppConfig,
    path: &Path,
    title: Option<String>,
    seed: Option<u64>,
    concurrent: bool,
) -> anyhow::Result<StudyMaterial> {
    let article = ParserRegistry::with_defaults()
        .load(path)
        .with_context(|| format!("Failed to load article {}", path.display()))?;

    if article.is_blank() {
        tracing::warn!(path = %path.display(), "article has no text");
    }

    let title = title
        .or_else(|| article.title_or_stem())
        .unwrap_or_else(|| config.study.default_title.clone());

    let pipeline = StudyPipeline::from_config(&config.study);
    let pipeline = match seed {
        Some(seed) => pipeline.with_quiz_seed(Some(seed)),
        None => pipeline,
    };

    tracing::info!(
        title = %title,
        words = article.word_count(),
        concurrent,
        "generating study material"
    );

    let material = if concurrent {
        pipeline.generate_concurrent(&title, article.corpus).await?
    } else {
        pipeline.generate(&title, &article.corpus)
    };
    Ok(material)
}

fn load_answers(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid answers file {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
