//! Test sessions: assembly, answering and completion.
//!
//! Completing a session is the only place schedule state changes. Every new
//! state is computed first and written back to the items in one pass, so a
//! scheduler error leaves the vocabulary untouched.

pub mod grading;
pub mod history;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::algorithm::sm2::Sm2;
use crate::algorithm::Scheduler;
use crate::config::{EffectiveSettings, EngineSettings, TestSettings};
use crate::error::{EngineError, Result};
use crate::matching::SimilarityMatcher;
use crate::quality::derive_quality;
use crate::questions::{generate_mixed, random_id, MixedOptions, QuestionResult, TestQuestion};
use crate::types::{DifficultyTier, QuestionType, ScheduleState, VocabularyItem};

pub use grading::{grade, matched_pairs, Answer, SubmittedValue};
pub use history::{
    find_urgent_review_items, suggest_next_test_parameters, TestRecommendation, UrgentReview,
};

/// Which items and question types a session draws from.
///
/// Empty lists mean no restriction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionFilters {
    pub categories: Vec<String>,
    pub difficulties: Vec<DifficultyTier>,
    pub question_types: Vec<QuestionType>,
    /// Hard items first, then lower ease, instead of a random order.
    pub hardest_first: bool,
}

impl SessionFilters {
    pub fn matches(&self, item: &VocabularyItem) -> bool {
        (self.categories.is_empty() || self.categories.contains(&item.category))
            && (self.difficulties.is_empty() || self.difficulties.contains(&item.difficulty_tier))
    }
}

/// Aggregate outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
}

impl SessionResults {
    fn from_questions(questions: &[TestQuestion]) -> Self {
        let correct = questions
            .iter()
            .filter(|q| q.is_correct() == Some(true))
            .count();
        let total = questions.len();
        let percentage = if total == 0 {
            0.0
        } else {
            correct as f64 * 100.0 / total as f64
        };
        Self {
            correct,
            total,
            percentage,
        }
    }
}

/// Immediate response to a single answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub question_id: Uuid,
    pub is_correct: bool,
    pub timed_out: bool,
    /// Present when the session shows correct answers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

/// One assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSession {
    pub id: Uuid,
    /// Fixed at creation.
    pub questions: Vec<TestQuestion>,
    pub settings: EffectiveSettings,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<SessionResults>,
    /// Time spent on answers so far.
    #[serde(default)]
    pub elapsed_seconds: f64,
}

impl TestSession {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn question(&self, id: Uuid) -> Option<&TestQuestion> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// When the session happened, for history ordering.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.started_at)
    }
}

/// Builds sessions and feeds their outcomes back into item schedules.
#[derive(Debug, Clone)]
pub struct Orchestrator<S = Sm2> {
    pub settings: EngineSettings,
    pub scheduler: S,
}

impl Default for Orchestrator<Sm2> {
    fn default() -> Self {
        Self {
            settings: EngineSettings::default(),
            scheduler: Sm2::default(),
        }
    }
}

impl Orchestrator<Sm2> {
    /// Orchestrator with an SM-2 scheduler configured from `settings`.
    pub fn new(settings: EngineSettings) -> Result<Self> {
        settings.validate()?;
        let scheduler = Sm2::from_settings(&settings);
        Ok(Self {
            settings,
            scheduler,
        })
    }
}

impl<S: Scheduler> Orchestrator<S> {
    pub fn with_scheduler(settings: EngineSettings, scheduler: S) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            scheduler,
        })
    }

    /// Filter `pool`, order it, and generate the session's questions.
    pub fn build_session<R: Rng + ?Sized>(
        &self,
        pool: &[VocabularyItem],
        filters: &SessionFilters,
        settings: &TestSettings,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> TestSession {
        let effective = EffectiveSettings::merge(&self.settings, settings);

        let mut candidates: Vec<VocabularyItem> =
            pool.iter().filter(|item| filters.matches(item)).cloned().collect();
        if filters.hardest_first {
            candidates.sort_by(|a, b| {
                b.difficulty_tier
                    .cmp(&a.difficulty_tier)
                    .then(a.schedule.ease_factor.total_cmp(&b.schedule.ease_factor))
            });
        }

        let options = MixedOptions {
            types: filters.question_types.clone(),
            distractor_count: effective.distractor_count,
            preserve_order: filters.hardest_first,
        };
        let questions = generate_mixed(&candidates, effective.question_count, &options, rng);

        let session = TestSession {
            id: random_id(rng),
            questions,
            settings: effective,
            started_at: now,
            completed_at: None,
            results: None,
            elapsed_seconds: 0.0,
        };
        info!(
            session_id = %session.id,
            candidates = candidates.len(),
            questions = session.questions.len(),
            "built test session"
        );
        session
    }

    /// Grade one answer and record it on its question.
    ///
    /// Returns `None` for unknown or already answered questions; those
    /// answers are ignored.
    pub fn record_answer(
        &self,
        session: &mut TestSession,
        answer: &Answer,
    ) -> Result<Option<AnswerFeedback>> {
        if session.is_completed() {
            return Err(EngineError::SessionCompleted(session.id));
        }

        let matcher = SimilarityMatcher::new(
            session.settings.fuzzy_threshold,
            session.settings.fuzzy_min_length,
        );
        let time_spent = answer.time_spent_seconds.max(0.0);
        let time_limit = session.settings.time_limit_seconds;
        let show_correct = session.settings.show_correct_answer;
        let session_id = session.id;

        let Some(question) = session
            .questions
            .iter_mut()
            .find(|q| q.id == answer.question_id)
        else {
            warn!(%session_id, question_id = %answer.question_id, "answer for unknown question");
            return Ok(None);
        };
        if question.is_answered() {
            warn!(%session_id, question_id = %question.id, "question already answered");
            return Ok(None);
        }

        session.elapsed_seconds += time_spent;
        let timed_out = time_limit.is_some_and(|limit| session.elapsed_seconds > limit);

        let is_correct = match (&answer.value, timed_out) {
            (_, true) => {
                warn!(%session_id, question_id = %question.id, "answer after time limit");
                false
            }
            (None, false) => false,
            (Some(value), false) => grade(question, value, &matcher).unwrap_or_else(|err| {
                warn!(%session_id, %err, "grading malformed answer as incorrect");
                false
            }),
        };

        question.result = Some(QuestionResult {
            is_correct,
            time_spent_seconds: time_spent,
        });

        Ok(Some(AnswerFeedback {
            question_id: question.id,
            is_correct,
            timed_out,
            correct_answer: show_correct.then(|| question.kind.correct_answer_text()),
        }))
    }

    /// Record `answers`, reschedule every item with an answered question,
    /// and finalize the session.
    pub fn complete_session(
        &self,
        session: &mut TestSession,
        answers: &[Answer],
        items: &mut [VocabularyItem],
        now: DateTime<Utc>,
    ) -> Result<SessionResults> {
        if session.is_completed() {
            return Err(EngineError::SessionCompleted(session.id));
        }

        for answer in answers {
            self.record_answer(session, answer)?;
        }

        let mut updates: Vec<(usize, ScheduleState, bool)> = Vec::new();
        for question in &session.questions {
            let (Some(quality), Some(is_correct)) = (
                derive_quality(question, &session.settings),
                question.is_correct(),
            ) else {
                continue;
            };
            let Some(index) = items.iter().position(|item| item.id == question.item_id) else {
                warn!(item_id = question.item_id, "answered question for unknown item");
                continue;
            };

            // Later questions on the same item build on the pending state.
            let current = updates
                .iter()
                .rev()
                .find(|(i, _, _)| *i == index)
                .map(|(_, state, _)| state.clone())
                .unwrap_or_else(|| items[index].schedule.clone());
            let next = self.scheduler.advance(&current, quality, now)?;
            updates.push((index, next, is_correct));
        }

        for (index, state, is_correct) in updates {
            let item = &mut items[index];
            item.schedule = state;
            if is_correct {
                item.correct_count += 1;
            } else {
                item.incorrect_count += 1;
            }
        }

        let results = SessionResults::from_questions(&session.questions);
        session.completed_at = Some(now);
        session.results = Some(results.clone());

        info!(
            session_id = %session.id,
            scheduler = self.scheduler.name(),
            correct = results.correct,
            total = results.total,
            percentage = results.percentage,
            "completed test session"
        );
        Ok(results)
    }
}
