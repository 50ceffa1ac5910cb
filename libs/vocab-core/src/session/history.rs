//! Analysis of past sessions: urgent reviews and next-test suggestions.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{SessionFilters, TestSession};
use crate::types::{DifficultyTier, ItemId, QuestionType, VocabularyItem};

/// Below this success rate an item is always urgent.
pub const URGENT_SUCCESS_RATE: f64 = 0.6;
/// Below this rate an item is urgent if it failed recently.
pub const SHAKY_SUCCESS_RATE: f64 = 0.8;
pub const RECENT_FAILURE_DAYS: i64 = 7;
/// A question type weaker than this becomes the next session's focus.
pub const WEAK_TYPE_RATE: f64 = 0.7;

const TYPE_WINDOW: usize = 5;
const SCORE_WINDOW: usize = 3;
const DEFAULT_QUESTION_COUNT: usize = 10;

/// An item flagged for near-term re-study.
#[derive(Debug, Clone, PartialEq)]
pub struct UrgentReview<'a> {
    pub item: &'a VocabularyItem,
    pub success_rate: f64,
    pub attempts: usize,
    pub last_failure_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Outcomes {
    correct: usize,
    total: usize,
    last_failure_at: Option<DateTime<Utc>>,
}

impl Outcomes {
    fn rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

/// Items from `pool` whose test history calls for review, worst first.
///
/// An item is urgent when its success rate is below 0.6, or below 0.8 with a
/// failure in the 7 days before `now`.
pub fn find_urgent_review_items<'a>(
    history: &[TestSession],
    pool: &'a [VocabularyItem],
    now: DateTime<Utc>,
) -> Vec<UrgentReview<'a>> {
    let mut outcomes: HashMap<ItemId, Outcomes> = HashMap::new();
    for session in history {
        let at = session.timestamp();
        for question in &session.questions {
            let Some(is_correct) = question.is_correct() else {
                continue;
            };
            let entry = outcomes.entry(question.item_id).or_default();
            entry.total += 1;
            if is_correct {
                entry.correct += 1;
            } else if entry.last_failure_at.map_or(true, |prev| at > prev) {
                entry.last_failure_at = Some(at);
            }
        }
    }

    let recent_cutoff = now - Duration::days(RECENT_FAILURE_DAYS);
    let mut urgent: Vec<UrgentReview<'a>> = pool
        .iter()
        .filter_map(|item| {
            let stats = outcomes.get(&item.id)?;
            let rate = stats.rate();
            let failed_recently = stats
                .last_failure_at
                .is_some_and(|at| at >= recent_cutoff);
            let is_urgent =
                rate < URGENT_SUCCESS_RATE || (rate < SHAKY_SUCCESS_RATE && failed_recently);
            is_urgent.then_some(UrgentReview {
                item,
                success_rate: rate,
                attempts: stats.total,
                last_failure_at: stats.last_failure_at,
            })
        })
        .collect();

    urgent.sort_by(|a, b| {
        a.success_rate
            .total_cmp(&b.success_rate)
            .then(b.attempts.cmp(&a.attempts))
            .then(a.item.id.cmp(&b.item.id))
    });
    urgent
}

/// Suggested parameters for the next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRecommendation {
    /// Type to drill, or `None` for a balanced mix.
    pub focus: Option<QuestionType>,
    pub difficulty_tiers: Vec<DifficultyTier>,
    pub hardest_first: bool,
    pub question_count: usize,
    /// Per-type success rates over the recent sessions.
    pub type_success_rates: BTreeMap<QuestionType, f64>,
    /// Mean percentage over the most recent sessions.
    pub average_score: Option<f64>,
}

impl TestRecommendation {
    pub fn to_filters(&self) -> SessionFilters {
        SessionFilters {
            categories: Vec::new(),
            difficulties: self.difficulty_tiers.clone(),
            question_types: self.focus.into_iter().collect(),
            hardest_first: self.hardest_first,
        }
    }
}

impl Default for TestRecommendation {
    fn default() -> Self {
        Self {
            focus: None,
            difficulty_tiers: vec![DifficultyTier::Easy, DifficultyTier::Medium],
            hardest_first: false,
            question_count: DEFAULT_QUESTION_COUNT,
            type_success_rates: BTreeMap::new(),
            average_score: None,
        }
    }
}

/// Recommend the next session from completed sessions in `history`.
///
/// Focuses on the weakest question type of the last 5 sessions when its
/// success rate is below 0.7, otherwise suggests a harder balanced mix.
/// Difficulty tiers follow the mean score of the last 3 sessions.
pub fn suggest_next_test_parameters(history: &[TestSession]) -> TestRecommendation {
    let mut completed: Vec<&TestSession> = history
        .iter()
        .filter(|session| session.is_completed() && session.results.is_some())
        .collect();
    if completed.is_empty() {
        return TestRecommendation::default();
    }
    completed.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

    let mut per_type: BTreeMap<QuestionType, (usize, usize)> = BTreeMap::new();
    for session in completed.iter().take(TYPE_WINDOW) {
        for question in &session.questions {
            if let Some(is_correct) = question.is_correct() {
                let entry = per_type.entry(question.question_type()).or_default();
                entry.1 += 1;
                if is_correct {
                    entry.0 += 1;
                }
            }
        }
    }
    let type_success_rates: BTreeMap<QuestionType, f64> = per_type
        .into_iter()
        .map(|(kind, (correct, total))| (kind, correct as f64 / total as f64))
        .collect();

    let weakest = type_success_rates
        .iter()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(kind, rate)| (*kind, *rate));
    let (focus, hardest_first) = match weakest {
        Some((kind, rate)) if rate < WEAK_TYPE_RATE => (Some(kind), false),
        _ => (None, true),
    };

    let recent: Vec<f64> = completed
        .iter()
        .take(SCORE_WINDOW)
        .filter_map(|session| session.results.as_ref().map(|r| r.percentage))
        .collect();
    let average = recent.iter().sum::<f64>() / recent.len() as f64;
    let difficulty_tiers = if average >= 85.0 {
        vec![DifficultyTier::Medium, DifficultyTier::Hard]
    } else if average >= 70.0 {
        DifficultyTier::ALL.to_vec()
    } else {
        vec![DifficultyTier::Easy, DifficultyTier::Medium]
    };

    TestRecommendation {
        focus,
        difficulty_tiers,
        hardest_first,
        question_count: completed[0].settings.question_count,
        type_success_rates,
        average_score: Some(average),
    }
}
