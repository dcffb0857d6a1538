//! Sentence/word splitting and word normalization.
//!
//! Splitting is a plain split-on-any-of: every delimiter character ends a
//! piece, adjacent delimiters yield empty pieces and nothing is trimmed. Word
//! cleanup happens afterwards in [`normalize_word`].

use crate::format::FIELD_DELIMITER;

/// Splits text on any character of a delimiter set.
pub trait Tokenizer {
    fn split<'t>(&self, text: &'t str, delimiters: &str) -> Vec<&'t str>;
}

/// Default tokenizer: `str::split` over a character set, empty pieces kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharSetTokenizer;

impl Tokenizer for CharSetTokenizer {
    fn split<'t>(&self, text: &'t str, delimiters: &str) -> Vec<&'t str> {
        text.split(|c: char| delimiters.contains(c)).collect()
    }
}

/// Characters that always end a word, whatever the configured delimiters.
///
/// A snapshot holds one entity per line, so no name may span a line break.
pub const LINE_BREAKS: &str = "\r\n";

/// Turn a raw word into an entity name, or `None` when nothing is left.
///
/// Surrounding whitespace is trimmed, every field delimiter and line break is
/// removed (so names can never corrupt a snapshot line), `edge_trim`
/// characters are stripped from both ends and the result is lower-cased.
pub fn normalize_word(raw: &str, edge_trim: &str) -> Option<String> {
    let stripped: String = raw
        .trim()
        .chars()
        .filter(|c| *c != FIELD_DELIMITER && !LINE_BREAKS.contains(*c))
        .collect();
    let word = stripped
        .trim_matches(|c: char| edge_trim.contains(c))
        .trim();
    if word.is_empty() {
        return None;
    }
    Some(word.to_lowercase())
}
