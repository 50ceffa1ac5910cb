//! Engine and per-session settings.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Global engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Distractors per multiple-choice question.
    pub distractor_count: usize,
    /// Minimum normalized similarity for a long typed answer to pass.
    pub fuzzy_threshold: f64,
    /// Fuzzy matching applies only when the correct answer is longer than this.
    pub fuzzy_min_length: usize,
    /// Per-question time limit used when a session does not set one.
    pub default_time_limit_seconds: f64,
    pub initial_ease: f64,
    pub minimum_ease: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            distractor_count: 3,
            fuzzy_threshold: 0.85,
            fuzzy_min_length: 10,
            default_time_limit_seconds: 30.0,
            initial_ease: 2.5,
            minimum_ease: 1.3,
        }
    }
}

impl EngineSettings {
    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.distractor_count == 0 {
            return Err(EngineError::InvalidSettings(
                "distractor_count must be at least 1".to_string(),
            ));
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(EngineError::InvalidSettings(format!(
                "fuzzy_threshold {} must be in (0, 1]",
                self.fuzzy_threshold
            )));
        }
        if !(self.default_time_limit_seconds > 0.0) {
            return Err(EngineError::InvalidSettings(format!(
                "default_time_limit_seconds {} must be positive",
                self.default_time_limit_seconds
            )));
        }
        if self.minimum_ease < 1.3 {
            return Err(EngineError::InvalidSettings(format!(
                "minimum_ease {} is below 1.3",
                self.minimum_ease
            )));
        }
        if self.initial_ease < self.minimum_ease {
            return Err(EngineError::InvalidSettings(format!(
                "initial_ease {} is below minimum_ease {}",
                self.initial_ease, self.minimum_ease
            )));
        }
        Ok(())
    }
}

/// Settings chosen for one test session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestSettings {
    pub question_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_question_time_limit_seconds: Option<f64>,
    /// Overall limit. Answers past it are graded as timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_seconds: Option<f64>,
    /// Whether feedback carries the correct answer.
    pub show_correct_answer: bool,
    /// Presentation hint: show feedback after each answer rather than at the
    /// end. The engine always returns feedback from `record_answer`.
    pub instant_feedback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distractor_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_threshold: Option<f64>,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            question_count: 10,
            per_question_time_limit_seconds: None,
            time_limit_seconds: None,
            show_correct_answer: true,
            instant_feedback: false,
            distractor_count: None,
            fuzzy_threshold: None,
        }
    }
}

/// Engine settings merged with session overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveSettings {
    pub question_count: usize,
    pub distractor_count: usize,
    pub fuzzy_threshold: f64,
    pub fuzzy_min_length: usize,
    pub per_question_time_limit_seconds: f64,
    pub time_limit_seconds: Option<f64>,
    pub show_correct_answer: bool,
    pub instant_feedback: bool,
}

impl EffectiveSettings {
    pub fn merge(engine: &EngineSettings, test: &TestSettings) -> Self {
        // Out-of-range overrides fall back to the engine value.
        let per_question = test
            .per_question_time_limit_seconds
            .filter(|limit| *limit > 0.0)
            .unwrap_or(engine.default_time_limit_seconds);

        Self {
            question_count: test.question_count,
            distractor_count: test
                .distractor_count
                .filter(|count| *count >= 1)
                .unwrap_or(engine.distractor_count),
            fuzzy_threshold: test
                .fuzzy_threshold
                .filter(|threshold| *threshold > 0.0 && *threshold <= 1.0)
                .unwrap_or(engine.fuzzy_threshold),
            fuzzy_min_length: engine.fuzzy_min_length,
            per_question_time_limit_seconds: per_question,
            time_limit_seconds: test.time_limit_seconds.filter(|limit| *limit > 0.0),
            show_correct_answer: test.show_correct_answer,
            instant_feedback: test.instant_feedback,
        }
    }
}

impl Default for EffectiveSettings {
    fn default() -> Self {
        Self::merge(&EngineSettings::default(), &TestSettings::default())
    }
}
