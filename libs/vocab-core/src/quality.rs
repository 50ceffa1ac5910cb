//! Quality scores (0-5) derived from answered test questions.
//!
//! The score starts from correctness and answer speed relative to the
//! per-question time limit, then shifts by question type and difficulty:
//!
//! | correct | time ratio | base |
//! |---------|------------|------|
//! | yes     | <= 0.3     | 5    |
//! | yes     | <= 0.8     | 4    |
//! | yes     | > 0.8      | 3    |
//! | no      | <= 0.2     | 1    |
//! | no      | > 0.2      | 2    |
//!
//! Recognition types (multiple choice, true/false) are discounted, recall
//! (typing) gets a bonus, and hard items move the score further from the
//! middle. The result is rounded and clamped, so it is always a valid
//! scheduler input.

use crate::algorithm::MAX_QUALITY;
use crate::config::EffectiveSettings;
use crate::questions::{QuestionResult, TestQuestion};
use crate::types::QuestionType;

/// Time limit assumed when none is configured.
pub const DEFAULT_TIME_LIMIT_SECONDS: f64 = 30.0;

/// Quality for an answered question, `None` if it was never answered.
pub fn derive_quality(question: &TestQuestion, settings: &EffectiveSettings) -> Option<u8> {
    let result = question.result.as_ref()?;
    Some(quality_for(
        result,
        question.question_type(),
        question.difficulty_score,
        settings.per_question_time_limit_seconds,
    ))
}

/// Quality from the raw parts of an answer.
pub fn quality_for(
    result: &QuestionResult,
    question_type: QuestionType,
    difficulty_score: u8,
    time_limit_seconds: f64,
) -> u8 {
    let limit = if time_limit_seconds > 0.0 {
        time_limit_seconds
    } else {
        DEFAULT_TIME_LIMIT_SECONDS
    };
    let ratio = result.time_spent_seconds.max(0.0) / limit;
    let correct = result.is_correct;

    let mut quality = timing_quality(correct, ratio);

    if correct {
        quality = match question_type {
            QuestionType::MultipleChoice => (quality - 0.5).max(3.0),
            QuestionType::Typing => (quality + 0.5).min(5.0),
            QuestionType::TrueFalse => (quality - 0.3).max(3.0),
            QuestionType::Matching => quality,
        };
    }

    if difficulty_score >= 4 {
        quality = if correct {
            (quality + 0.5).min(5.0)
        } else {
            (quality - 0.5).max(1.0)
        };
    } else if difficulty_score <= 2 && correct {
        quality = (quality - 0.3).max(3.0);
    }

    quality.round().clamp(0.0, f64::from(MAX_QUALITY)) as u8
}

fn timing_quality(correct: bool, ratio: f64) -> f64 {
    if correct {
        if ratio <= 0.3 {
            5.0
        } else if ratio <= 0.8 {
            4.0
        } else {
            3.0
        }
    } else if ratio <= 0.2 {
        // Fast wrong answers read as guesses.
        1.0
    } else {
        2.0
    }
}
