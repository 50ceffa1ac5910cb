//! Grading of submitted answers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::matching::SimilarityMatcher;
use crate::questions::{QuestionKind, TestQuestion};

/// Value submitted by the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedValue {
    Bool(bool),
    Text(String),
    /// Term to meaning assignments for matching questions.
    Pairs(BTreeMap<String, String>),
}

/// One answer returned by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: Uuid,
    /// `None` when the learner skipped or ran out of time.
    #[serde(default)]
    pub value: Option<SubmittedValue>,
    pub time_spent_seconds: f64,
}

impl Answer {
    pub fn text(question_id: Uuid, text: impl Into<String>, time_spent_seconds: f64) -> Self {
        Self {
            question_id,
            value: Some(SubmittedValue::Text(text.into())),
            time_spent_seconds,
        }
    }

    pub fn boolean(question_id: Uuid, value: bool, time_spent_seconds: f64) -> Self {
        Self {
            question_id,
            value: Some(SubmittedValue::Bool(value)),
            time_spent_seconds,
        }
    }

    pub fn pairs(
        question_id: Uuid,
        pairs: BTreeMap<String, String>,
        time_spent_seconds: f64,
    ) -> Self {
        Self {
            question_id,
            value: Some(SubmittedValue::Pairs(pairs)),
            time_spent_seconds,
        }
    }

    pub fn skipped(question_id: Uuid, time_spent_seconds: f64) -> Self {
        Self {
            question_id,
            value: None,
            time_spent_seconds,
        }
    }
}

/// Whether `value` answers `question` correctly.
///
/// A value of the wrong shape, or a matching submission missing terms, is
/// `MalformedAnswer`. Callers grade that as incorrect.
pub fn grade(
    question: &TestQuestion,
    value: &SubmittedValue,
    matcher: &SimilarityMatcher,
) -> Result<bool> {
    let malformed = |reason: &str| EngineError::MalformedAnswer {
        question_id: question.id,
        reason: reason.to_string(),
    };

    match (&question.kind, value) {
        (QuestionKind::MultipleChoice { correct_answer, .. }, SubmittedValue::Text(text)) => {
            Ok(text.trim() == correct_answer.trim())
        }
        (QuestionKind::MultipleChoice { .. }, _) => Err(malformed("expected a chosen option")),

        (QuestionKind::Typing { correct_answer, .. }, SubmittedValue::Text(text)) => {
            Ok(matcher.validate(text, correct_answer))
        }
        (QuestionKind::Typing { .. }, _) => Err(malformed("expected free text")),

        (QuestionKind::TrueFalse { is_true, .. }, SubmittedValue::Bool(choice)) => {
            Ok(choice == is_true)
        }
        (QuestionKind::TrueFalse { is_true, .. }, SubmittedValue::Text(text)) => {
            match text.trim().to_lowercase().as_str() {
                "true" => Ok(*is_true),
                "false" => Ok(!*is_true),
                _ => Err(malformed("expected true or false")),
            }
        }
        (QuestionKind::TrueFalse { .. }, SubmittedValue::Pairs(_)) => {
            Err(malformed("expected true or false"))
        }

        (QuestionKind::Matching { correct_pairs, .. }, SubmittedValue::Pairs(submitted)) => {
            let matched = matched_pairs(correct_pairs, submitted);
            if correct_pairs.keys().any(|term| !submitted.contains_key(term)) {
                return Err(malformed("matching submission is missing terms"));
            }
            Ok(matched == correct_pairs.len())
        }
        (QuestionKind::Matching { .. }, _) => Err(malformed("expected term to meaning pairs")),
    }
}

/// Number of terms paired with their true meaning.
pub fn matched_pairs(
    correct: &BTreeMap<String, String>,
    submitted: &BTreeMap<String, String>,
) -> usize {
    correct
        .iter()
        .filter(|(term, meaning)| {
            submitted
                .get(*term)
                .is_some_and(|given| given.trim() == meaning.trim())
        })
        .count()
}
