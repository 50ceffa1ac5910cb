//! Vocabulary scheduling and assessment engine.
//!
//! Provides:
//! - SM-2 scheduler over a 0-5 quality score
//! - Quality derivation from answered test questions
//! - Question generation (multiple choice, typing, matching, true/false)
//! - Typed-answer validation (Levenshtein similarity)
//! - Test sessions: assembly, grading, completion and history analysis
//!
//! All operations are synchronous and in-memory. Randomness is always
//! injected by the caller.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod matching;
pub mod quality;
pub mod questions;
pub mod session;
pub mod types;

pub use algorithm::sm2::Sm2;
pub use algorithm::{due_items, Scheduler};
pub use config::{EffectiveSettings, EngineSettings, TestSettings};
pub use error::{EngineError, Result};
pub use matching::{levenshtein_distance, normalized_similarity, MatchResult, SimilarityMatcher};
pub use quality::derive_quality;
pub use questions::{
    generate_mixed, Direction, MixedOptions, QuestionKind, QuestionResult, TestQuestion,
};
pub use session::{
    find_urgent_review_items, suggest_next_test_parameters, Answer, AnswerFeedback, Orchestrator,
    SessionFilters, SessionResults, SubmittedValue, TestRecommendation, TestSession,
    UrgentReview,
};
pub use types::{DifficultyTier, ItemId, QuestionType, ScheduleState, VocabularyItem};
