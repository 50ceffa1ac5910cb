//! Matching questions: pair each term in a group with its meaning.

use std::collections::{BTreeMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use super::{QuestionKind, TestQuestion};
use crate::error::{EngineError, Result};
use crate::types::{QuestionType, VocabularyItem};

pub const MIN_GROUP: usize = 4;
pub const MAX_GROUP: usize = 6;

/// Build a matching question from 4 to 6 items.
///
/// Items repeating an earlier term are dropped, and only the first
/// `MAX_GROUP` distinct terms are used. Fewer than `MIN_GROUP` distinct terms
/// is an `InsufficientPool` error.
pub fn generate<R: Rng + ?Sized>(items: &[&VocabularyItem], rng: &mut R) -> Result<TestQuestion> {
    let mut seen = HashSet::new();
    let group: Vec<&VocabularyItem> = items
        .iter()
        .copied()
        .filter(|item| seen.insert(item.term.trim().to_string()))
        .take(MAX_GROUP)
        .collect();

    if group.len() < MIN_GROUP {
        return Err(EngineError::InsufficientPool {
            kind: QuestionType::Matching,
            available: group.len(),
            required: MIN_GROUP,
        });
    }

    let terms: Vec<String> = group.iter().map(|item| item.term.clone()).collect();
    let mut meanings: Vec<String> = group.iter().map(|item| item.meaning.clone()).collect();
    meanings.shuffle(rng);

    let correct_pairs: BTreeMap<String, String> = group
        .iter()
        .map(|item| (item.term.clone(), item.meaning.clone()))
        .collect();

    Ok(TestQuestion::new(
        group[0].id,
        group_difficulty(&group),
        QuestionKind::Matching {
            terms,
            meanings,
            correct_pairs,
            item_ids: group.iter().map(|item| item.id).collect(),
        },
        rng,
    ))
}

/// Rounded mean of the group's tier scores.
fn group_difficulty(group: &[&VocabularyItem]) -> u8 {
    let total: u32 = group
        .iter()
        .map(|item| u32::from(item.difficulty_tier.score()))
        .sum();
    (total as f64 / group.len() as f64).round() as u8
}
