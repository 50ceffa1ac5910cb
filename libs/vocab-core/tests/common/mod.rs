//! Shared fixtures for vocab-core integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use vocab_core::{Answer, DifficultyTier, QuestionKind, TestQuestion, VocabularyItem};

/// Fixed clock for reproducible schedules.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 18, 0, 0).unwrap()
}

pub fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Twelve Arabic terms over three categories and all tiers.
pub fn vocabulary() -> Vec<VocabularyItem> {
    let entries = [
        ("kitab", "book", "objects", DifficultyTier::Easy),
        ("qalam", "pen", "objects", DifficultyTier::Easy),
        ("miftah", "key", "objects", DifficultyTier::Medium),
        ("nafidha", "window", "objects", DifficultyTier::Hard),
        ("kataba", "to write", "verbs", DifficultyTier::Easy),
        ("qara'a", "to read", "verbs", DifficultyTier::Medium),
        ("dhahaba", "to go", "verbs", DifficultyTier::Medium),
        ("ista'mala", "to use", "verbs", DifficultyTier::Hard),
        ("kabir", "big", "adjectives", DifficultyTier::Easy),
        ("saghir", "small", "adjectives", DifficultyTier::Easy),
        ("jamil", "beautiful", "adjectives", DifficultyTier::Medium),
        ("mustahil", "impossible", "adjectives", DifficultyTier::Hard),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, (term, meaning, category, tier))| {
            VocabularyItem::new(i as i64 + 1, *term, *meaning, *category, *tier, now())
        })
        .collect()
}

/// Answer that grades as correct.
pub fn correct_answer(question: &TestQuestion, seconds: f64) -> Answer {
    match &question.kind {
        QuestionKind::MultipleChoice { correct_answer, .. }
        | QuestionKind::Typing { correct_answer, .. } => {
            Answer::text(question.id, correct_answer.clone(), seconds)
        }
        QuestionKind::TrueFalse { is_true, .. } => Answer::boolean(question.id, *is_true, seconds),
        QuestionKind::Matching { correct_pairs, .. } => {
            Answer::pairs(question.id, correct_pairs.clone(), seconds)
        }
    }
}

/// Well-formed answer that grades as incorrect.
pub fn wrong_answer(question: &TestQuestion, seconds: f64) -> Answer {
    match &question.kind {
        QuestionKind::MultipleChoice {
            correct_answer,
            options,
            ..
        } => {
            let wrong = options
                .iter()
                .find(|option| *option != correct_answer)
                .cloned()
                .unwrap_or_else(|| "not an option".to_string());
            Answer::text(question.id, wrong, seconds)
        }
        QuestionKind::Typing { .. } => Answer::text(question.id, "zzzz", seconds),
        QuestionKind::TrueFalse { is_true, .. } => Answer::boolean(question.id, !is_true, seconds),
        QuestionKind::Matching { correct_pairs, .. } => {
            // Rotate meanings by one so every term is paired wrongly.
            let terms: Vec<&String> = correct_pairs.keys().collect();
            let meanings: Vec<&String> = correct_pairs.values().collect();
            let rotated = terms
                .iter()
                .enumerate()
                .map(|(i, term)| {
                    ((*term).clone(), meanings[(i + 1) % meanings.len()].clone())
                })
                .collect();
            Answer::pairs(question.id, rotated, seconds)
        }
    }
}
