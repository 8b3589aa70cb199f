use std::sync::LazyLock;

use regex::Regex;

/// Sentence boundaries: full-width terminators (。！？；) and newlines always
/// split; ASCII `.`, `!`, `?` split only when followed by whitespace or the end
/// of text, so decimals like `0.218` stay intact.
static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[。！？；\n]+|[.!?]+(?:\s+|$)").expect("sentence boundary regex is valid")
});

/// Abbreviations whose trailing `.` does not end a sentence.
const ABBREVIATIONS: &[&str] = &["et al", "e.g", "i.e", "cf", "vs"];

/// Splits raw text into trimmed, non-empty sentence-like units.
///
/// A `.` boundary directly after one of [`ABBREVIATIONS`] is skipped, so
/// `Smith et al. (2019) report` stays one unit.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        let unit = &text[start..boundary.start()];
        if boundary.as_str().starts_with('.') && ends_with_abbreviation(unit) {
            continue;
        }
        units.push(unit);
        start = boundary.end();
    }
    units.push(&text[start..]);

    units
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn ends_with_abbreviation(unit: &str) -> bool {
    let lowered = unit.to_lowercase();
    ABBREVIATIONS.iter().any(|abbr| {
        lowered.strip_suffix(abbr).is_some_and(|head| {
            head.chars()
                .next_back()
                .is_none_or(|c| !c.is_alphanumeric())
        })
    })
}

/// Length-bounded sentence splitter producing claim candidates.
#[derive(Debug, Clone, Copy)]
pub struct TextSegmenter {
    min_chars: usize,
    max_chars: usize,
}

impl TextSegmenter {
    pub fn new(min_chars: usize, max_chars: usize) -> Self {
        Self {
            min_chars,
            max_chars,
        }
    }

    /// Returns units whose character count lies in `[min_chars, max_chars]`.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        split_sentences(text)
            .into_iter()
            .filter(|unit| {
                let len = unit.chars().count();
                len >= self.min_chars && len <= self.max_chars
            })
            .collect()
    }
}
