//! SM-2 spaced repetition algorithm.
//!
//! Classic SuperMemo 2 update over a 0-5 quality score:
//! 1. quality < 3: streak resets to 0, interval to 1 day
//! 2. quality >= 3: interval 1 day, then 6 days, then `round(interval * EF)`
//! 3. EF' = EF + (0.1 - (5-q) * (0.08 + (5-q) * 0.02)), floored at the minimum ease

use super::{Scheduler, MAX_QUALITY};
use crate::config::EngineSettings;
use crate::error::{EngineError, Result};
use crate::types::ScheduleState;
use chrono::{DateTime, Duration, Utc};

/// Lowest quality that counts as a successful recall.
pub const PASSING_QUALITY: u8 = 3;

/// Roughly a hundred years.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

/// SM-2 scheduler with configurable ease bounds.
#[derive(Debug, Clone)]
pub struct Sm2 {
    pub initial_ease: f64,
    pub minimum_ease: f64,
    pub first_interval: u32,
    pub second_interval: u32,
    /// Upper bound on any interval, in days.
    pub maximum_interval: u32,
}

impl Default for Sm2 {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval: 1,
            second_interval: 6,
            maximum_interval: MAX_INTERVAL_DAYS,
        }
    }
}

impl Sm2 {
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            initial_ease: settings.initial_ease,
            minimum_ease: settings.minimum_ease,
            ..Self::default()
        }
    }

    fn next_ease(&self, ease: f64, quality: u8) -> f64 {
        let q = f64::from(quality);
        let delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
        (ease + delta).max(self.minimum_ease)
    }
}

impl Scheduler for Sm2 {
    fn name(&self) -> &'static str {
        "sm2"
    }

    fn initial_state(&self, now: DateTime<Utc>) -> ScheduleState {
        ScheduleState {
            ease_factor: self.initial_ease,
            ..ScheduleState::new(now)
        }
    }

    fn advance(
        &self,
        state: &ScheduleState,
        quality: u8,
        now: DateTime<Utc>,
    ) -> Result<ScheduleState> {
        if quality > MAX_QUALITY {
            return Err(EngineError::InvalidQuality(quality));
        }

        let (interval_days, repetition_streak) = if quality < PASSING_QUALITY {
            (1, 0)
        } else {
            let interval = match state.repetition_streak {
                0 => self.first_interval,
                1 => self.second_interval,
                _ => (f64::from(state.interval_days) * state.ease_factor).round() as u32,
            };
            (
                interval.clamp(1, self.maximum_interval.max(1)),
                state.repetition_streak.saturating_add(1),
            )
        };

        let ease_factor = self.next_ease(state.ease_factor, quality);

        Ok(ScheduleState {
            ease_factor,
            interval_days,
            repetition_streak,
            last_reviewed_at: Some(now),
            next_review_at: now + Duration::days(i64::from(interval_days)),
            last_quality: Some(quality),
        })
    }
}
