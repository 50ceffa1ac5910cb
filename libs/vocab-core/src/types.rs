//! Core types for vocabulary scheduling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a vocabulary item, as assigned by the persistence layer.
pub type ItemId = i64;

/// Difficulty tier chosen by the learner when adding a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl Default for DifficultyTier {
    fn default() -> Self {
        Self::Medium
    }
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Question difficulty score (1-5) for this tier.
    pub fn score(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 3,
            Self::Hard => 5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// Question kinds the engine can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Typing,
    Matching,
    TrueFalse,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        Self::MultipleChoice,
        Self::Typing,
        Self::Matching,
        Self::TrueFalse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::Typing => "typing",
            Self::Matching => "matching",
            Self::TrueFalse => "true_false",
        }
    }
}

/// Spaced repetition state of a single item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub ease_factor: f64,
    pub interval_days: u32,
    pub repetition_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    pub next_review_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_quality: Option<u8>,
}

impl ScheduleState {
    /// Fresh state for a term added at `now`: due immediately.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            ease_factor: 2.5,
            interval_days: 1,
            repetition_streak: 0,
            last_reviewed_at: None,
            next_review_at: now,
            last_quality: None,
        }
    }
}

/// A single learnable term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyItem {
    pub id: ItemId,
    pub term: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty_tier: DifficultyTier,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub incorrect_count: u32,
    #[serde(flatten)]
    pub schedule: ScheduleState,
}

impl VocabularyItem {
    pub fn new(
        id: ItemId,
        term: impl Into<String>,
        meaning: impl Into<String>,
        category: impl Into<String>,
        difficulty_tier: DifficultyTier,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            term: term.into(),
            meaning: meaning.into(),
            note: None,
            category: category.into(),
            difficulty_tier,
            correct_count: 0,
            incorrect_count: 0,
            schedule: ScheduleState::new(now),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.schedule.next_review_at <= now
    }

    /// Lifetime success rate, `None` before the first answer.
    pub fn success_rate(&self) -> Option<f64> {
        let total = self.correct_count + self.incorrect_count;
        if total == 0 {
            return None;
        }
        Some(self.correct_count as f64 / total as f64)
    }
}
