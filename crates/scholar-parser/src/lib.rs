//! Scholar Parser - Article loading for the study pipeline
//!
//! Turns article files into the plain-text corpus consumed by the
//! extractors. Plain text and Markdown are read as-is; HTML is flattened
//! section by section with tags stripped and entities decoded.

pub mod html;

pub use html::{strip_html, HtmlParser};

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum ParserError {
    /// No parser handles the file's extension
    #[error("Unsupported article format: {0}")]
    UnsupportedFormat(String),

    #[error("Cannot read article {path}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Article bytes are not UTF-8
    #[error("Article is not valid UTF-8: {0}")]
    EncodingError(String),
}

pub type Result<T> = std::result::Result<T, ParserError>;

// ============================================================================
// Article Model
// ============================================================================

/// One headed part of an encyclopedia article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSection {
    /// Heading text; `None` for the lead
    pub title: Option<String>,

    /// Heading level, 1 for the lead
    pub level: u8,

    /// Section body, HTML or plain text
    pub content: String,
}

impl ArticleSection {
    /// Untitled lead-level section
    pub fn new(content: impl Into<String>) -> Self {
        ArticleSection {
            title: None,
            level: 1,
            content: content.into(),
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        ArticleSection {
            title: Some(title.into()),
            ..self
        }
    }

    pub fn with_level(self, level: u8) -> Self {
        ArticleSection { level, ..self }
    }

    /// Section body with markup removed
    pub fn plain_text(&self) -> String {
        strip_html(&self.content)
    }
}

/// Flatten article sections into one corpus, in section order
pub fn corpus_from_sections(sections: &[ArticleSection]) -> String {
    sections
        .iter()
        .map(ArticleSection::plain_text)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Article formats recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleFormat {
    PlainText,
    Markdown,
    Html,
}

impl ArticleFormat {
    /// Format for a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" | "text" => Some(ArticleFormat::PlainText),
            "md" | "markdown" => Some(ArticleFormat::Markdown),
            "html" | "htm" => Some(ArticleFormat::Html),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleFormat::PlainText => "text",
            ArticleFormat::Markdown => "markdown",
            ArticleFormat::Html => "html",
        }
    }
}

impl fmt::Display for ArticleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A loaded article and the corpus the extractors read
#[derive(Debug, Clone)]
pub struct Article {
    pub source: PathBuf,
    pub format: ArticleFormat,

    /// Title declared by the article itself
    pub title: Option<String>,

    /// Headed sections; empty for unstructured text
    pub sections: Vec<ArticleSection>,

    /// Plain text handed to the extractors
    pub corpus: String,
}

impl Article {
    /// Unstructured article whose text is the corpus
    pub fn from_text(source: &Path, format: ArticleFormat, text: String) -> Self {
        Article {
            source: source.to_path_buf(),
            format,
            title: None,
            sections: Vec::new(),
            corpus: text,
        }
    }

    /// HTML article; the corpus is rebuilt from its sections
    pub fn from_sections(source: &Path, sections: Vec<ArticleSection>) -> Self {
        Article {
            source: source.to_path_buf(),
            format: ArticleFormat::Html,
            title: None,
            corpus: corpus_from_sections(&sections),
            sections,
        }
    }

    pub fn with_title(self, title: Option<String>) -> Self {
        Article { title, ..self }
    }

    /// Declared title, else the file stem
    pub fn title_or_stem(&self) -> Option<String> {
        self.title.clone().or_else(|| {
            self.source
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
    }

    pub fn word_count(&self) -> usize {
        self.corpus.split_whitespace().count()
    }

    pub fn is_blank(&self) -> bool {
        self.corpus.trim().is_empty()
    }
}

// ============================================================================
// Parsers
// ============================================================================

/// Loads one or more article formats
pub trait ArticleParser: Send + Sync {
    fn parse(&self, path: &Path) -> Result<Article>;

    /// Formats this parser accepts
    fn formats(&self) -> &'static [ArticleFormat];

    fn handles(&self, format: ArticleFormat) -> bool {
        self.formats().contains(&format)
    }
}

/// Read a file as UTF-8 text
pub(crate) fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| ParserError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    String::from_utf8(bytes)
        .map_err(|e| ParserError::EncodingError(format!("{}: {e}", path.display())))
}

/// Plain text and Markdown; a Markdown `# ` line supplies the title
pub struct PlainTextParser;

impl ArticleParser for PlainTextParser {
    fn parse(&self, path: &Path) -> Result<Article> {
        let text = read_text(path)?;
        let format = ArticleFormat::from_path(path).unwrap_or(ArticleFormat::PlainText);

        let title = match format {
            ArticleFormat::Markdown => text
                .lines()
                .find_map(|line| line.strip_prefix("# "))
                .map(|t| t.trim().to_string()),
            _ => None,
        };

        Ok(Article::from_text(path, format, text).with_title(title))
    }

    fn formats(&self) -> &'static [ArticleFormat] {
        &[ArticleFormat::PlainText, ArticleFormat::Markdown]
    }
}

/// Picks a parser by file extension
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ArticleParser>>,
}

impl ParserRegistry {
    /// Registry with no parsers
    pub fn empty() -> Self {
        ParserRegistry {
            parsers: Vec::new(),
        }
    }

    /// Plain-text and HTML parsers
    pub fn with_defaults() -> Self {
        Self::empty()
            .with_parser(PlainTextParser)
            .with_parser(HtmlParser::new())
    }

    pub fn with_parser(mut self, parser: impl ArticleParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// First registered parser that handles `format`
    pub fn parser_for(&self, format: ArticleFormat) -> Option<&dyn ArticleParser> {
        self.parsers
            .iter()
            .find(|p| p.handles(format))
            .map(|p| p.as_ref())
    }

    /// Load an article, choosing the parser from the extension
    pub fn load(&self, path: &Path) -> Result<Article> {
        let unsupported = || {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("none");
            ParserError::UnsupportedFormat(ext.to_string())
        };

        let format = ArticleFormat::from_path(path).ok_or_else(unsupported)?;
        let parser = self.parser_for(format).ok_or_else(unsupported)?;

        tracing::debug!(path = %path.display(), %format, "loading article");
        parser.parse(path)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
