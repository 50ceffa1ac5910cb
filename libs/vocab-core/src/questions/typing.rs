//! Free-text questions.

use rand::Rng;

use super::{Direction, QuestionKind, TestQuestion};
use crate::types::VocabularyItem;

/// Ask for one side of `item` given the other, answered as free text.
pub fn generate<R: Rng + ?Sized>(item: &VocabularyItem, rng: &mut R) -> TestQuestion {
    let direction = Direction::random(rng);
    TestQuestion::new(
        item.id,
        item.difficulty_tier.score(),
        QuestionKind::Typing {
            direction,
            prompt: direction.prompt(item).to_string(),
            correct_answer: direction.answer(item).to_string(),
        },
        rng,
    )
}
