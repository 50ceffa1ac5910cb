//! Mixed sessions combining every question type.

use std::collections::HashSet;

use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use tracing::debug;

use super::{matching, multiple_choice, true_false, typing, TestQuestion};
use crate::error::EngineError;
use crate::types::{QuestionType, VocabularyItem};

/// Options for a mixed session.
#[derive(Debug, Clone)]
pub struct MixedOptions {
    /// Types to draw from. Empty means every type the pool supports.
    pub types: Vec<QuestionType>,
    pub distractor_count: usize,
    /// Consume items in pool order instead of shuffling them first.
    pub preserve_order: bool,
}

impl Default for MixedOptions {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            distractor_count: 3,
            preserve_order: false,
        }
    }
}

/// Generate up to `count` questions from `pool`.
///
/// Each step picks a type uniformly, then builds it from the next unused
/// item (or the next 4-6 items for matching). A type the remaining items
/// cannot support degrades to a typing question. The session ends early,
/// without error, once the pool runs out.
pub fn generate_mixed<R: Rng + ?Sized>(
    pool: &[VocabularyItem],
    count: usize,
    options: &MixedOptions,
    rng: &mut R,
) -> Vec<TestQuestion> {
    let mut order: Vec<&VocabularyItem> = pool.iter().collect();
    if !options.preserve_order {
        order.shuffle(rng);
    }

    let allowed = allowed_types(&options.types, pool.len());
    let mut questions = Vec::with_capacity(count.min(order.len()));
    let mut cursor = 0;

    while questions.len() < count && cursor < order.len() {
        let kind = allowed
            .choose(rng)
            .copied()
            .unwrap_or(QuestionType::Typing);
        let item = order[cursor];

        let (question, consumed) = match kind {
            QuestionType::MultipleChoice => {
                match multiple_choice::generate(item, pool, options.distractor_count, rng) {
                    Ok(question) => (question, 1),
                    Err(err) => {
                        debug!(
                            item_id = item.id,
                            kind = kind.as_str(),
                            %err,
                            "falling back to typing"
                        );
                        (typing::generate(item, rng), 1)
                    }
                }
            }
            QuestionType::Typing => (typing::generate(item, rng), 1),
            QuestionType::TrueFalse => (true_false::generate(item, pool, rng), 1),
            QuestionType::Matching => {
                let available = distinct_run(&order[cursor..], matching::MAX_GROUP);
                let built = if available >= matching::MIN_GROUP {
                    let take = rng.random_range(matching::MIN_GROUP..=available);
                    matching::generate(&order[cursor..cursor + take], rng).map(|q| (q, take))
                } else {
                    Err(EngineError::InsufficientPool {
                        kind: QuestionType::Matching,
                        available,
                        required: matching::MIN_GROUP,
                    })
                };
                match built {
                    Ok(pair) => pair,
                    Err(err) => {
                        debug!(
                            item_id = item.id,
                            kind = kind.as_str(),
                            %err,
                            "falling back to typing"
                        );
                        (typing::generate(item, rng), 1)
                    }
                }
            }
        };

        questions.push(question);
        cursor += consumed;
    }

    debug!(
        requested = count,
        generated = questions.len(),
        pool = pool.len(),
        "generated mixed session"
    );
    questions
}

/// Length of the leading run of `items` with distinct terms, at most `max`.
///
/// A matching group cut from this run keeps every item it consumes.
fn distinct_run(items: &[&VocabularyItem], max: usize) -> usize {
    let mut seen = HashSet::new();
    items
        .iter()
        .take(max)
        .take_while(|item| seen.insert(item.term.trim()))
        .count()
}

fn allowed_types(requested: &[QuestionType], pool_len: usize) -> Vec<QuestionType> {
    let base: Vec<QuestionType> = if requested.is_empty() {
        QuestionType::ALL.to_vec()
    } else {
        requested.to_vec()
    };
    base.into_iter()
        .filter(|kind| *kind != QuestionType::Matching || pool_len >= matching::MIN_GROUP)
        .collect()
}
