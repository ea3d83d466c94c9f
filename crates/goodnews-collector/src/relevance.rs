//! Text-quality gate applied to extracted article content.

use regex::Regex;

use crate::types::Rejection;

/// Terminated segments shorter than this (in characters) mark fragmented text.
const MIN_SEGMENT_CHARS: usize = 3;

/// Exclusion patterns plus length and fragmentation heuristics.
///
/// Checks run in a fixed order and stop at the first failure:
/// exclusion patterns, minimum length, then fragmentation.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    exclusions: Vec<Regex>,
    min_length: usize,
}

impl RelevanceFilter {
    /// Compile `patterns`. Case sensitivity is up to each pattern's own flags.
    ///
    /// # Errors
    ///
    /// Returns the first pattern that fails to compile.
    pub fn new(patterns: &[&str], min_length: usize) -> Result<Self, regex::Error> {
        let exclusions = patterns
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            exclusions,
            min_length,
        })
    }

    #[must_use]
    pub fn is_relevant(&self, text: &str) -> bool {
        self.check(text).is_ok()
    }

    /// First reason `text` fails the gate, if any.
    ///
    /// # Errors
    ///
    /// [`Rejection::Excluded`], [`Rejection::TooShort`] or
    /// [`Rejection::Fragmented`].
    pub fn check(&self, text: &str) -> Result<(), Rejection> {
        if let Some(re) = self.exclusions.iter().find(|re| re.is_match(text)) {
            return Err(Rejection::Excluded {
                pattern: re.as_str().to_string(),
            });
        }

        let len = text.chars().count();
        if len < self.min_length {
            return Err(Rejection::TooShort {
                len,
                min: self.min_length,
            });
        }

        if let Some(segment) = terminated_segments(text)
            .into_iter()
            .find(|s| s.chars().count() < MIN_SEGMENT_CHARS)
        {
            return Err(Rejection::Fragmented {
                segment: segment.to_string(),
            });
        }

        Ok(())
    }
}

/// Title and reference abbreviations whose trailing `.` does not end a
/// sentence. Compared case-insensitively.
const ABBREVIATIONS: [&str; 13] = [
    "mr", "mrs", "ms", "dr", "prof", "st", "no", "vs", "jr", "sr", "inc", "ltd", "co",
];

/// `before` is the text preceding `c`; `next` is the character after it.
fn is_terminal(c: char, before: &str, next: Option<char>) -> bool {
    match c {
        '。' | '．' | '！' | '？' | '!' | '?' => true,
        // A `.` inside a number or URL is followed by a non-space.
        '.' => next.is_none_or(char::is_whitespace) && !ends_with_abbreviation(before),
        _ => false,
    }
}

/// True when `before` ends in a known abbreviation or a single capital
/// letter (an initial, as in "J. Smith" or "U.S.").
fn ends_with_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|ch: char| !ch.is_ascii_alphabetic())
        .next()
        .unwrap_or("");
    if word.len() == 1 {
        return word.chars().all(|ch| ch.is_ascii_uppercase());
    }
    !word.is_empty() && ABBREVIATIONS.contains(&word.to_ascii_lowercase().as_str())
}

/// Non-empty trimmed segments that end in sentence-terminal punctuation.
///
/// The trailing unterminated remainder is not returned: truncation at the
/// extractor's maximum length routinely cuts the final sentence short.
fn terminated_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        if is_terminal(c, &text[start..idx], next) {
            let segment = text[start..idx].trim();
            if !segment.is_empty() {
                segments.push(segment);
            }
            start = idx + c.len_utf8();
        }
    }
    segments
}
