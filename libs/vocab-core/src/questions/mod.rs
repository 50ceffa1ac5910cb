//! Test question generation.
//!
//! Every generator takes the random source as a parameter. Pass a seeded
//! generator (e.g. `ChaCha8Rng::seed_from_u64`) to get reproducible tests;
//! the engine never creates one of its own.

pub mod matching;
pub mod mixed;
pub mod multiple_choice;
pub mod true_false;
pub mod typing;

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{ItemId, QuestionType, VocabularyItem};

pub use mixed::{generate_mixed, MixedOptions};

/// Which side of the item the learner sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    TermToMeaning,
    MeaningToTerm,
}

impl Direction {
    pub(crate) fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::TermToMeaning
        } else {
            Self::MeaningToTerm
        }
    }

    /// Text shown to the learner.
    pub fn prompt<'a>(&self, item: &'a VocabularyItem) -> &'a str {
        match self {
            Self::TermToMeaning => &item.term,
            Self::MeaningToTerm => &item.meaning,
        }
    }

    /// Text the learner must produce or pick.
    pub fn answer<'a>(&self, item: &'a VocabularyItem) -> &'a str {
        match self {
            Self::TermToMeaning => &item.meaning,
            Self::MeaningToTerm => &item.term,
        }
    }
}

/// Type-specific content of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice {
        direction: Direction,
        prompt: String,
        correct_answer: String,
        /// Correct answer plus distinct distractors, shuffled.
        options: Vec<String>,
    },
    Typing {
        direction: Direction,
        prompt: String,
        correct_answer: String,
    },
    Matching {
        /// Terms in group order.
        terms: Vec<String>,
        /// Meanings shuffled independently of `terms`.
        meanings: Vec<String>,
        correct_pairs: BTreeMap<String, String>,
        item_ids: Vec<ItemId>,
    },
    TrueFalse {
        term: String,
        shown_meaning: String,
        /// Whether "term means shown_meaning" holds.
        is_true: bool,
        /// Set when no real distractor meaning existed.
        low_confidence: bool,
    },
}

impl QuestionKind {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Self::MultipleChoice { .. } => QuestionType::MultipleChoice,
            Self::Typing { .. } => QuestionType::Typing,
            Self::Matching { .. } => QuestionType::Matching,
            Self::TrueFalse { .. } => QuestionType::TrueFalse,
        }
    }

    /// Correct answer rendered as display text.
    pub fn correct_answer_text(&self) -> String {
        match self {
            Self::MultipleChoice { correct_answer, .. } | Self::Typing { correct_answer, .. } => {
                correct_answer.clone()
            }
            Self::Matching {
                terms,
                correct_pairs,
                ..
            } => terms
                .iter()
                .filter_map(|term| {
                    correct_pairs
                        .get(term)
                        .map(|meaning| format!("{} = {}", term, meaning))
                })
                .collect::<Vec<_>>()
                .join("; "),
            Self::TrueFalse { is_true, .. } => is_true.to_string(),
        }
    }
}

/// Recorded outcome of an answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub is_correct: bool,
    pub time_spent_seconds: f64,
}

/// One assessment unit inside a test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestQuestion {
    pub id: Uuid,
    /// Source item, or the first item of a matching group.
    pub item_id: ItemId,
    /// 1-5, from the source tier(s).
    pub difficulty_score: u8,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QuestionResult>,
}

impl TestQuestion {
    pub(crate) fn new<R: Rng + ?Sized>(
        item_id: ItemId,
        difficulty_score: u8,
        kind: QuestionKind,
        rng: &mut R,
    ) -> Self {
        Self {
            id: random_id(rng),
            item_id,
            difficulty_score,
            kind,
            result: None,
        }
    }

    pub fn question_type(&self) -> QuestionType {
        self.kind.question_type()
    }

    pub fn is_answered(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.result.as_ref().map(|result| result.is_correct)
    }
}

/// UUID drawn from the injected random source.
pub(crate) fn random_id<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.random()).into_uuid()
}

/// Case- and whitespace-insensitive key for comparing option texts.
pub(crate) fn option_key(text: &str) -> String {
    text.trim().to_lowercase()
}
