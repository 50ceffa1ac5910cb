//! Spaced repetition scheduling.

pub mod sm2;

use crate::error::Result;
use crate::types::{ScheduleState, VocabularyItem};
use chrono::{DateTime, Utc};

/// Highest quality score a review can carry.
pub const MAX_QUALITY: u8 = 5;

/// Trait for spaced repetition schedulers.
pub trait Scheduler: Send + Sync {
    /// Scheduler identifier.
    fn name(&self) -> &'static str;

    /// State for an item added at `now`.
    fn initial_state(&self, now: DateTime<Utc>) -> ScheduleState;

    /// Next state after a review of the given quality (0-5).
    ///
    /// Pure: the same `(state, quality, now)` always yields the same state.
    /// Quality above 5 is rejected with `EngineError::InvalidQuality`.
    fn advance(&self, state: &ScheduleState, quality: u8, now: DateTime<Utc>)
        -> Result<ScheduleState>;
}

/// Items due at `now`, most overdue first.
pub fn due_items(pool: &[VocabularyItem], now: DateTime<Utc>) -> Vec<&VocabularyItem> {
    let mut due: Vec<&VocabularyItem> = pool.iter().filter(|item| item.is_due(now)).collect();
    due.sort_by_key(|item| item.schedule.next_review_at);
    due
}
