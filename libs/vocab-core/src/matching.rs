//! Typed-answer validation with Levenshtein-based fuzzy matching.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Letters and digits kept by normalization; everything else is punctuation.
pub const DEFAULT_ALLOWED_RANGES: &[RangeInclusive<char>] = &[
    '0'..='9',
    'a'..='z',
    'A'..='Z',
    // Latin-1 Supplement, Latin Extended-A/B
    '\u{00C0}'..='\u{024F}',
    // Arabic, Arabic Supplement, Arabic Extended-A
    '\u{0600}'..='\u{06FF}',
    '\u{0750}'..='\u{077F}',
    '\u{08A0}'..='\u{08FF}',
    // Arabic Presentation Forms-A/B
    '\u{FB50}'..='\u{FDFF}',
    '\u{FE70}'..='\u{FEFF}',
];

/// Outcome of validating a typed answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub is_correct: bool,
    /// Similarity score between 0.0 and 1.0.
    pub similarity: f64,
    /// Whether fuzzy matching was allowed for this answer.
    pub fuzzy: bool,
    pub typed_normalized: String,
    pub correct_normalized: String,
}

/// Validates free-text answers.
///
/// Short answers must match exactly after normalization. Answers whose
/// normalized correct form is longer than `fuzzy_min_length` chars also pass
/// when their similarity reaches `fuzzy_threshold`.
#[derive(Debug, Clone)]
pub struct SimilarityMatcher {
    pub fuzzy_threshold: f64,
    pub fuzzy_min_length: usize,
    pub allowed_ranges: Vec<RangeInclusive<char>>,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.85,
            fuzzy_min_length: 10,
            allowed_ranges: DEFAULT_ALLOWED_RANGES.to_vec(),
        }
    }
}

impl SimilarityMatcher {
    pub fn new(fuzzy_threshold: f64, fuzzy_min_length: usize) -> Self {
        Self {
            fuzzy_threshold,
            fuzzy_min_length,
            ..Self::default()
        }
    }

    pub fn validate(&self, typed: &str, correct: &str) -> bool {
        self.compare(typed, correct).is_correct
    }

    pub fn compare(&self, typed: &str, correct: &str) -> MatchResult {
        let typed_normalized = self.normalize(typed);
        let correct_normalized = self.normalize(correct);

        // A blank submission never counts, even against a blank key.
        if typed_normalized.is_empty() {
            return MatchResult {
                is_correct: false,
                similarity: 0.0,
                fuzzy: false,
                typed_normalized,
                correct_normalized,
            };
        }

        if typed_normalized == correct_normalized {
            return MatchResult {
                is_correct: true,
                similarity: 1.0,
                fuzzy: false,
                typed_normalized,
                correct_normalized,
            };
        }

        let fuzzy = correct_normalized.chars().count() > self.fuzzy_min_length;
        let similarity = normalized_similarity(&typed_normalized, &correct_normalized);

        MatchResult {
            is_correct: fuzzy && similarity >= self.fuzzy_threshold,
            similarity,
            fuzzy,
            typed_normalized,
            correct_normalized,
        }
    }

    /// Trim, lowercase, strip punctuation and collapse whitespace.
    pub fn normalize(&self, s: &str) -> String {
        let kept: String = s
            .chars()
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_whitespace() || self.is_allowed(*c))
            .collect();
        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn is_allowed(&self, c: char) -> bool {
        (c.is_alphanumeric() || is_arabic_mark(c))
            && self.allowed_ranges.iter().any(|range| range.contains(&c))
    }
}

/// Arabic harakat and Quranic annotation marks.
fn is_arabic_mark(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}')
}

/// Calculate Levenshtein distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;

        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);

            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Similarity in 0.0..=1.0: `1 - distance / max(len)`, lengths in chars.
pub fn normalized_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    1.0 - (distance as f64 / max_len as f64)
}
