//! HTML article parser
//!
//! Flattens HTML to text the way a browser's `textContent` does: tags are
//! dropped without inserting separators, script and style bodies are
//! removed, and character entities are decoded. Encyclopedia chrome
//! (edit links, citation markers, navigation boxes, infoboxes) is removed
//! first so it never reaches the corpus.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{read_text, Article, ArticleFormat, ArticleParser, ArticleSection, Result};

static SCRIPT_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<link\b[^>]*>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static ANY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)\b[^>]*?(/?)>").unwrap());
static CLASS_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").unwrap());
static H1: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1\s*>").unwrap());
static H2: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<h2[^>]*>(.*?)</h2\s*>").unwrap());
static BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<body[^>]*>(.*)</body\s*>").unwrap());

/// Sections whose raw HTML is this short carry no prose worth studying
const MIN_SECTION_HTML_LEN: usize = 50;

/// Elements carrying any of these classes are dropped with their content
const NOISE_CLASSES: &[&str] = &[
    "mw-editsection",
    "reference",
    "reflist",
    "box-More_citations_needed",
    "box-Empty_section",
    "navbox",
    "infobox",
    "sidebar",
    "hatnote",
    "mw-empty-elt",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Strip markup from an HTML fragment and decode entities
pub fn strip_html(html: &str) -> String {
    let text = remove_noise(html);
    let text = TAG.replace_all(&text, "");
    decode_entities(&text).trim().to_string()
}

/// Drop scripts, styles, comments, `<link>` tags and elements with a
/// noise class, keeping the remaining markup intact
pub fn remove_noise(html: &str) -> String {
    let text = SCRIPT_STYLE.replace_all(html, "");
    let text = COMMENT.replace_all(&text, "");
    let text = LINK.replace_all(&text, "");
    remove_noise_elements(&text)
}

fn has_noise_class(tag: &str) -> bool {
    CLASS_ATTR.captures(tag).is_some_and(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .is_some_and(|m| m.as_str().split_whitespace().any(|c| NOISE_CLASSES.contains(&c)))
    })
}

fn remove_noise_elements(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;

    while let Some(caps) = ANY_TAG.captures_at(html, cursor) {
        let Some(open) = caps.get(0) else { break };
        let is_closing = !caps[1].is_empty();
        if is_closing || !has_noise_class(open.as_str()) {
            out.push_str(&html[cursor..open.end()]);
            cursor = open.end();
            continue;
        }

        out.push_str(&html[cursor..open.start()]);
        let name = caps[2].to_ascii_lowercase();
        let self_closing = !caps[3].is_empty() || VOID_ELEMENTS.contains(&name.as_str());
        cursor = if self_closing {
            open.end()
        } else {
            matching_close(html, open.end(), &name)
        };
    }

    out.push_str(&html[cursor..]);
    out
}

/// End offset of the tag closing an element named `name` whose content
/// starts at `from`; the end of input when it is never closed
fn matching_close(html: &str, from: usize, name: &str) -> usize {
    let mut depth = 1usize;
    for caps in ANY_TAG.captures_iter(&html[from..]) {
        if !caps[2].eq_ignore_ascii_case(name) || !caps[3].is_empty() {
            continue;
        }
        if caps[1].is_empty() {
            depth += 1;
        } else {
            depth -= 1;
            if depth == 0 {
                if let Some(m) = caps.get(0) {
                    return from + m.end();
                }
            }
        }
    }
    html.len()
}

/// Decode every HTML5 named and numeric entity. Non-breaking spaces become
/// plain spaces so downstream whitespace handling treats them alike.
fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).replace('\u{a0}', " ")
}

/// HTML article parser
pub struct HtmlParser {
    /// Drop sections whose raw HTML is too short to hold prose
    pub skip_short_sections: bool,
}

impl HtmlParser {
    /// Create a new HTML parser with default settings
    pub fn new() -> Self {
        Self {
            skip_short_sections: true,
        }
    }

    /// Keep every section regardless of size
    pub fn keep_short_sections(mut self) -> Self {
        self.skip_short_sections = false;
        self
    }

    fn extract_title(html: &str) -> Option<String> {
        TITLE
            .captures(html)
            .or_else(|| H1.captures(html))
            .map(|caps| strip_html(&caps[1]))
            .filter(|t| !t.is_empty())
    }

    /// Split the body on `<h2>` headings. Content before the first heading
    /// becomes the untitled lead section; `<h3>` and deeper stay inside the
    /// enclosing section.
    fn split_sections(&self, html: &str) -> Vec<ArticleSection> {
        let body = BODY
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(html);
        let body = remove_noise(body);
        let body = H1.replace_all(&body, "");

        let mut sections = Vec::new();
        let mut current = ArticleSection::new("");
        let mut cursor = 0;

        for caps in H2.captures_iter(&body) {
            let Some(whole) = caps.get(0) else { continue };
            current.content = body[cursor..whole.start()].to_string();
            sections.push(current);

            current = ArticleSection::new("")
                .with_title(strip_html(&caps[1]))
                .with_level(2);
            cursor = whole.end();
        }
        current.content = body[cursor..].to_string();
        sections.push(current);

        sections
            .into_iter()
            .filter(|s| {
                if self.skip_short_sections {
                    s.content.trim().len() > MIN_SECTION_HTML_LEN
                } else {
                    !s.content.trim().is_empty()
                }
            })
            .collect()
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleParser for HtmlParser {
    fn parse(&self, path: &Path) -> Result<Article> {
        let html = read_text(path)?;
        let sections = self.split_sections(&html);
        tracing::debug!(sections = sections.len(), "split html article");

        Ok(Article::from_sections(path, sections).with_title(Self::extract_title(&html)))
    }

    fn formats(&self) -> &'static [ArticleFormat] {
        &[ArticleFormat::Html]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_strip_tags_like_text_content() {
        assert_eq!(
            strip_html("<p>Born in <a href=\"/wiki/Corsica\">Corsica</a>.</p>"),
            "Born in Corsica."
        );
    }

    #[test]
    fn test_strip_script_and_style() {
        let html = "<style>p { color: red; }</style><p>Text</p><script>alert('x')</script>";
        assert_eq!(strip_html(html), "Text");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(
            strip_html("Fish &amp; chips&nbsp;&lt;3 &#8212; &#x41;"),
            "Fish & chips <3 \u{2014} A"
        );
        assert_eq!(strip_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_html_parser_sections() {
        let lead = "Napoleon Bonaparte was a French military commander and political leader.";
        let early = "Napoleon was born on the island of Corsica in 1769 to a modest family.";
        let html = format!(
            "<html><head><title>Napoleon</title></head><body>\
             <h1>Napoleon</h1><p>{lead}</p>\
             <h2>Early life</h2><p>{early}</p>\
             <h2>Notes</h2><p>See also.</p>\
             </body></html>"
        );

        let mut file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        file.write_all(html.as_bytes()).unwrap();

        let article = HtmlParser::new().parse(file.path()).unwrap();

        assert_eq!(article.format, ArticleFormat::Html);
        assert_eq!(article.title.as_deref(), Some("Napoleon"));
        assert_eq!(article.sections.len(), 2);
        assert_eq!(article.sections[1].title.as_deref(), Some("Early life"));
        assert_eq!(article.sections[1].level, 2);
        assert_eq!(article.corpus, format!("{lead} {early}"));
    }

    #[test]
    fn test_keep_short_sections() {
        let parser = HtmlParser::new().keep_short_sections();
        let sections = parser.split_sections("<p>Lead.</p><h2>Short</h2><p>Tiny.</p>");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].plain_text(), "Tiny.");
    }

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(
            strip_html("Napol&eacute;on &mdash; Emperor &ndash; 1804 &copy;"),
            "Napol\u{e9}on \u{2014} Emperor \u{2013} 1804 \u{a9}"
        );
    }

    #[test]
    fn test_citation_markers_removed() {
        let html = "<p>Napoleon was born in 1769.<sup class=\"reference\"><a href=\"#cite-1\">\
                    [1]</a></sup> He rose quickly.</p>";
        assert_eq!(strip_html(html), "Napoleon was born in 1769. He rose quickly.");
    }

    #[test]
    fn test_chrome_elements_removed() {
        let html = "<div class=\"hatnote navigation-not-searchable\">Main article: X</div>\
                    <table class=\"infobox vcard\"><tr><td><table><tr><td>Born 1769</td></tr>\
                    </table></td></tr></table>\
                    <link rel=\"stylesheet\" href=\"/s.css\">\
                    <p>Body text.</p>\
                    <span class=\"mw-editsection\">[<a href=\"/edit\">edit</a>]</span>\
                    <div class=\"navbox\"><div>Nav</div></div>";
        assert_eq!(strip_html(html), "Body text.");
    }

    #[test]
    fn test_unclassed_elements_kept() {
        assert_eq!(
            strip_html("<div class=\"references-note\">Kept</div>"),
            "Kept"
        );
    }

    #[test]
    fn test_subheadings_stay_in_section() {
        let parser = HtmlParser::new();
        let html = "<p>Napoleon Bonaparte was a French military commander and leader.</p>\
                    <h2>Career<span class=\"mw-editsection\">[edit]</span></h2>\
                    <p>He rose through the ranks of the army.</p>\
                    <h3>Italy</h3><p>He won in 1796.</p>\
                    <h4>Egypt</h4><p>He sailed in 1798.</p>";
        let sections = parser.split_sections(html);

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].title.as_deref(), Some("Career"));
        assert_eq!(
            sections[1].plain_text(),
            "He rose through the ranks of the army.ItalyHe won in 1796.EgyptHe sailed in 1798."
        );
    }
}
