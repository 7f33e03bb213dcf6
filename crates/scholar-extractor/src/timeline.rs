//! Timeline extraction
//!
//! Every sentence mentioning a year between 1000 and 2099 becomes a
//! candidate event. The first sentence for a given year wins; the result
//! is ordered chronologically.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use scholar_core::TimelineEvent;

use crate::segmenter::sentences;
use crate::text::{char_len, clean_sentence};
use crate::Extractor;

// ASCII word boundaries: a year glued to a non-ASCII letter still counts
static YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)(1[0-9]{3}|20[0-9]{2})(?-u:\b)").unwrap());

const MIN_DESCRIPTION_LEN: usize = 20;
const MAX_DESCRIPTION_LEN: usize = 200;

/// Extracts year-anchored events from the whole article
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelineExtractor;

impl TimelineExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for TimelineExtractor {
    type Output = TimelineEvent;

    fn extract(&self, corpus: &str) -> Vec<TimelineEvent> {
        let mut events = Vec::new();
        let mut seen_years: HashSet<String> = HashSet::new();

        for sentence in sentences(corpus) {
            let Some(year) = YEAR.find(sentence) else {
                continue;
            };

            let description = clean_sentence(sentence);
            let len = char_len(&description);
            if len <= MIN_DESCRIPTION_LEN || len >= MAX_DESCRIPTION_LEN {
                continue;
            }

            if seen_years.insert(year.as_str().to_string()) {
                events.push(TimelineEvent {
                    year: year.as_str().to_string(),
                    description,
                });
            }
        }

        events.sort_by_key(TimelineEvent::year_value);

        tracing::debug!(count = events.len(), "extracted timeline events");
        events
    }
}
