//! True/false statements of the form "term means meaning".

use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::debug;

use super::{option_key, QuestionKind, TestQuestion};
use crate::types::VocabularyItem;

/// Meaning used for a false statement when the pool offers no other item.
pub const PLACEHOLDER_MEANING: &str = "none of the above";

/// Build a true or false statement about `item` with equal probability.
///
/// False statements borrow a meaning from a same-category item when one
/// exists, else from any other item. With no other item at all the statement
/// uses `PLACEHOLDER_MEANING` and is flagged `low_confidence`.
pub fn generate<R: Rng + ?Sized>(
    item: &VocabularyItem,
    pool: &[VocabularyItem],
    rng: &mut R,
) -> TestQuestion {
    let is_true = rng.random_bool(0.5);

    let (shown_meaning, low_confidence) = if is_true {
        (item.meaning.clone(), false)
    } else {
        match false_meaning(item, pool, rng) {
            Some(meaning) => (meaning.to_string(), false),
            None => {
                debug!(item_id = item.id, "no distractor meaning, using placeholder");
                (PLACEHOLDER_MEANING.to_string(), true)
            }
        }
    };

    TestQuestion::new(
        item.id,
        item.difficulty_tier.score(),
        QuestionKind::TrueFalse {
            term: item.term.clone(),
            shown_meaning,
            is_true,
            low_confidence,
        },
        rng,
    )
}

fn false_meaning<'a, R: Rng + ?Sized>(
    item: &VocabularyItem,
    pool: &'a [VocabularyItem],
    rng: &mut R,
) -> Option<&'a str> {
    let own = option_key(&item.meaning);
    let others: Vec<&VocabularyItem> = pool
        .iter()
        .filter(|c| c.id != item.id && option_key(&c.meaning) != own)
        .collect();

    let same_category: Vec<&VocabularyItem> = others
        .iter()
        .copied()
        .filter(|c| !item.category.is_empty() && c.category == item.category)
        .collect();

    let source = if same_category.is_empty() {
        &others
    } else {
        &same_category
    };
    source.choose(rng).copied().map(|c| c.meaning.as_str())
}
