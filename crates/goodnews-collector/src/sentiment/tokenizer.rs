//! Script-aware word segmentation for mixed Japanese and English text.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Han,
    Hiragana,
    Katakana,
    Latin,
    Other,
}

impl Script {
    fn of(c: char) -> Self {
        match c {
            '\u{3040}'..='\u{309F}' => Script::Hiragana,
            // U+30FB (middle dot) is punctuation, not a letter.
            '\u{30A1}'..='\u{30FA}'
            | '\u{30FC}'..='\u{30FF}'
            | '\u{31F0}'..='\u{31FF}'
            | '\u{FF66}'..='\u{FF9F}' => Script::Katakana,
            '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' | '\u{F900}'..='\u{FAFF}' | '々' => {
                Script::Han
            }
            c if c.is_alphanumeric() => Script::Latin,
            _ => Script::Other,
        }
    }

    fn is_japanese(self) -> bool {
        matches!(self, Script::Han | Script::Hiragana | Script::Katakana)
    }
}

/// Splits text into word tokens.
///
/// Latin and digit runs become lowercase words (inner apostrophes kept).
/// Japanese runs, which have no spaces, are segmented greedily by longest
/// match against the dictionary; characters no entry covers become
/// single-character tokens. Everything else separates tokens.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    dictionary: HashSet<String>,
    longest: usize,
}

impl Tokenizer {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dictionary: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        let longest = dictionary
            .iter()
            .map(|w| w.chars().count())
            .max()
            .unwrap_or(0);
        Self {
            dictionary,
            longest,
        }
    }

    #[must_use]
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            let script = Script::of(chars[i]);
            if script.is_japanese() {
                let end = run_end(&chars, i, |c| Script::of(c).is_japanese());
                self.segment(&chars[i..end], &mut tokens);
                i = end;
            } else if script == Script::Latin {
                let end = latin_run_end(&chars, i);
                let word: String = chars[i..end].iter().collect();
                tokens.push(word.to_lowercase());
                i = end;
            } else {
                i += 1;
            }
        }
        tokens
    }

    fn segment(&self, run: &[char], tokens: &mut Vec<String>) {
        let mut i = 0;
        while i < run.len() {
            let max = self.longest.min(run.len() - i);
            let matched = (2..=max).rev().find_map(|len| {
                let candidate: String = run[i..i + len].iter().collect();
                self.dictionary.contains(&candidate).then_some((candidate, len))
            });
            match matched {
                Some((word, len)) => {
                    tokens.push(word);
                    i += len;
                }
                None => {
                    tokens.push(run[i].to_string());
                    i += 1;
                }
            }
        }
    }
}

fn run_end(chars: &[char], start: usize, belongs: impl Fn(char) -> bool) -> usize {
    chars[start..]
        .iter()
        .position(|&c| !belongs(c))
        .map_or(chars.len(), |offset| start + offset)
}

fn latin_run_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() {
        let c = chars[end];
        if Script::of(c) == Script::Latin {
            end += 1;
        } else if matches!(c, '\'' | '’')
            && chars
                .get(end + 1)
                .is_some_and(|&n| Script::of(n) == Script::Latin)
        {
            end += 1;
        } else {
            break;
        }
    }
    end
}
