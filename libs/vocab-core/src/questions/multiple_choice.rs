//! Multiple-choice questions with category-aware distractors.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use super::{option_key, Direction, QuestionKind, TestQuestion};
use crate::error::{EngineError, Result};
use crate::types::{QuestionType, VocabularyItem};

/// Build a multiple-choice question for `item`, drawing distractors from `pool`.
///
/// Distractors come from same-category items first, then same-tier items,
/// then anything else. When the pool has fewer distinct answers than
/// `distractor_count`, the question carries fewer options. Only a pool with no
/// usable distractor at all is an `InsufficientPool` error.
pub fn generate<R: Rng + ?Sized>(
    item: &VocabularyItem,
    pool: &[VocabularyItem],
    distractor_count: usize,
    rng: &mut R,
) -> Result<TestQuestion> {
    let direction = Direction::random(rng);
    let correct = direction.answer(item).to_string();

    let distractors = select_distractors(item, pool, direction, distractor_count, rng);
    if distractors.is_empty() {
        return Err(EngineError::InsufficientPool {
            kind: QuestionType::MultipleChoice,
            available: 1,
            required: distractor_count + 1,
        });
    }
    if distractors.len() < distractor_count {
        warn!(
            item_id = item.id,
            found = distractors.len(),
            wanted = distractor_count,
            "not enough distractors, using fewer options"
        );
    }

    let mut options = distractors;
    options.push(correct.clone());
    options.shuffle(rng);

    Ok(TestQuestion::new(
        item.id,
        item.difficulty_tier.score(),
        QuestionKind::MultipleChoice {
            direction,
            prompt: direction.prompt(item).to_string(),
            correct_answer: correct,
            options,
        },
        rng,
    ))
}

/// Up to `count` distinct distractor texts in priority order.
pub fn select_distractors<R: Rng + ?Sized>(
    item: &VocabularyItem,
    pool: &[VocabularyItem],
    direction: Direction,
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut same_category = Vec::new();
    let mut same_tier = Vec::new();
    let mut rest = Vec::new();

    for candidate in pool.iter().filter(|c| c.id != item.id) {
        if !item.category.is_empty() && candidate.category == item.category {
            same_category.push(candidate);
        } else if candidate.difficulty_tier == item.difficulty_tier {
            same_tier.push(candidate);
        } else {
            rest.push(candidate);
        }
    }

    same_category.shuffle(rng);
    same_tier.shuffle(rng);
    rest.shuffle(rng);

    let mut seen = HashSet::new();
    seen.insert(option_key(direction.answer(item)));

    let mut distractors = Vec::with_capacity(count);
    for candidate in same_category.into_iter().chain(same_tier).chain(rest) {
        if distractors.len() >= count {
            break;
        }
        let text = direction.answer(candidate);
        let key = option_key(text);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        distractors.push(text.to_string());
    }

    distractors
}
