//! Sentence segmentation
//!
//! A sentence is a maximal run of characters other than `.`, `!` and `?`
//! followed by one or more of those terminators, which stay attached.
//! Input with no such run is returned whole as a single sentence.
//!
//! This is a heuristic, not a linguistic boundary detector: "U.S." and
//! decimals like "3.5" split mid-sentence. Downstream artifacts depend on
//! these exact boundaries, so the behavior is kept as is.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

/// Split text into sentences, lazily and in source order
pub fn sentences(text: &str) -> Sentences<'_> {
    Sentences {
        text,
        pos: 0,
        matched_any: false,
        done: text.is_empty(),
    }
}

/// Iterator over the sentences of a text.
///
/// A clone continues from the same position. Call [`sentences`] again to
/// start over from the beginning.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    text: &'a str,
    pos: usize,
    matched_any: bool,
    done: bool,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match SENTENCE.find_at(self.text, self.pos) {
            Some(m) => {
                self.pos = m.end();
                self.matched_any = true;
                Some(m.as_str())
            }
            None => {
                self.done = true;
                // No terminated run anywhere: the whole input is one sentence
                (!self.matched_any).then_some(self.text)
            }
        }
    }
}

impl std::iter::FusedIterator for Sentences<'_> {}
