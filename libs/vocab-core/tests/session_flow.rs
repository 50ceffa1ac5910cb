mod common;

use chrono::Duration;
use pretty_assertions::assert_eq;

use vocab_core::{
    find_urgent_review_items, suggest_next_test_parameters, Answer, DifficultyTier, EngineError,
    EngineSettings, Orchestrator, QuestionKind, QuestionType, SessionFilters, TestSession,
    TestSettings, VocabularyItem,
};

use common::{correct_answer, now, rng, vocabulary, wrong_answer};

fn settings(question_count: usize) -> TestSettings {
    TestSettings {
        question_count,
        ..Default::default()
    }
}

/// Every item id a question touches, including whole matching groups.
fn touched_items(session: &TestSession) -> Vec<i64> {
    session
        .questions
        .iter()
        .flat_map(|q| match &q.kind {
            QuestionKind::Matching { item_ids, .. } => item_ids.clone(),
            _ => vec![q.item_id],
        })
        .collect()
}

fn item(items: &[VocabularyItem], id: i64) -> &VocabularyItem {
    items.iter().find(|i| i.id == id).unwrap()
}

#[test]
fn all_correct_session_advances_every_answered_item() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters::default(),
        &settings(6),
        now(),
        &mut rng(1),
    );
    assert_eq!(session.questions.len(), 6);

    let answers: Vec<Answer> = session
        .questions
        .iter()
        .map(|q| correct_answer(q, 3.0))
        .collect();
    let completed_at = now() + Duration::minutes(5);
    let results = orchestrator
        .complete_session(&mut session, &answers, &mut items, completed_at)
        .unwrap();

    assert_eq!(results.correct, 6);
    assert_eq!(results.total, 6);
    assert_eq!(results.percentage, 100.0);
    assert_eq!(session.completed_at, Some(completed_at));
    assert_eq!(session.results, Some(results));

    for question in &session.questions {
        let owner = item(&items, question.item_id);
        assert_eq!(owner.schedule.repetition_streak, 1);
        assert_eq!(owner.schedule.interval_days, 1);
        assert_eq!(owner.correct_count, 1);
        assert_eq!(owner.schedule.last_reviewed_at, Some(completed_at));
        assert_eq!(owner.schedule.next_review_at, completed_at + Duration::days(1));
        assert!(owner.schedule.last_quality.unwrap() >= 3);
    }
}

#[test]
fn wrong_answers_reset_schedules() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    for item in &mut items {
        item.schedule.repetition_streak = 4;
        item.schedule.interval_days = 20;
    }
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters::default(),
        &settings(5),
        now(),
        &mut rng(2),
    );
    let answers: Vec<Answer> = session
        .questions
        .iter()
        .map(|q| wrong_answer(q, 12.0))
        .collect();
    let results = orchestrator
        .complete_session(&mut session, &answers, &mut items, now())
        .unwrap();

    assert_eq!(results.correct, 0);
    assert_eq!(results.percentage, 0.0);
    for question in &session.questions {
        let owner = item(&items, question.item_id);
        assert_eq!(owner.schedule.repetition_streak, 0);
        assert_eq!(owner.schedule.interval_days, 1);
        assert_eq!(owner.incorrect_count, 1);
    }
}

#[test]
fn unanswered_questions_leave_items_untouched() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let before = items.clone();
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters {
            question_types: vec![QuestionType::Typing],
            ..Default::default()
        },
        &settings(4),
        now(),
        &mut rng(3),
    );
    let first = &session.questions[0];
    let answers = vec![correct_answer(first, 4.0)];
    let answered_id = first.item_id;

    let results = orchestrator
        .complete_session(&mut session, &answers, &mut items, now())
        .unwrap();

    // Unanswered questions count against the score
    assert_eq!(results.correct, 1);
    assert_eq!(results.total, 4);
    assert_eq!(results.percentage, 25.0);
    for (after, original) in items.iter().zip(&before) {
        if after.id == answered_id {
            assert_eq!(after.schedule.repetition_streak, 1);
        } else {
            assert_eq!(after, original);
        }
    }
}

#[test]
fn completing_twice_is_rejected() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters::default(),
        &settings(3),
        now(),
        &mut rng(4),
    );
    orchestrator
        .complete_session(&mut session, &[], &mut items, now())
        .unwrap();
    let err = orchestrator
        .complete_session(&mut session, &[], &mut items, now())
        .unwrap_err();
    assert!(matches!(err, EngineError::SessionCompleted(id) if id == session.id));
}

#[test]
fn feedback_reveals_answer_only_when_shown() {
    let orchestrator = Orchestrator::default();
    let items = vocabulary();
    let filters = SessionFilters {
        question_types: vec![QuestionType::Typing],
        ..Default::default()
    };

    let mut session =
        orchestrator.build_session(&items, &filters, &settings(2), now(), &mut rng(5));
    let question = session.questions[0].clone();
    let feedback = orchestrator
        .record_answer(&mut session, &Answer::text(question.id, "zzzz", 5.0))
        .unwrap()
        .unwrap();
    assert!(!feedback.is_correct);
    assert_eq!(
        feedback.correct_answer,
        Some(question.kind.correct_answer_text())
    );

    // A second answer for the same question is ignored
    let again = orchestrator
        .record_answer(&mut session, &correct_answer(&question, 5.0))
        .unwrap();
    assert_eq!(again, None);
    assert_eq!(session.questions[0].is_correct(), Some(false));

    let hidden = TestSettings {
        show_correct_answer: false,
        ..settings(2)
    };
    let mut session = orchestrator.build_session(&items, &filters, &hidden, now(), &mut rng(5));
    let question = session.questions[0].clone();
    let feedback = orchestrator
        .record_answer(&mut session, &correct_answer(&question, 5.0))
        .unwrap()
        .unwrap();
    assert!(feedback.is_correct);
    assert_eq!(feedback.correct_answer, None);
}

#[test]
fn invalid_fuzzy_override_keeps_engine_threshold() {
    let orchestrator = Orchestrator::default();
    let items = vec![VocabularyItem::new(
        1,
        "yawm al-istiqlal",
        "independence day",
        "holidays",
        DifficultyTier::Medium,
        now(),
    )];
    let loose = TestSettings {
        fuzzy_threshold: Some(-1.0),
        ..settings(1)
    };
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters {
            question_types: vec![QuestionType::Typing],
            ..Default::default()
        },
        &loose,
        now(),
        &mut rng(13),
    );
    assert_eq!(session.settings.fuzzy_threshold, 0.85);

    let question_id = session.questions[0].id;
    let feedback = orchestrator
        .record_answer(
            &mut session,
            &Answer::text(question_id, "qqqqqqqqqqqqqqqqqqqq", 5.0),
        )
        .unwrap()
        .unwrap();
    assert!(!feedback.is_correct);
}

#[test]
fn answers_past_the_overall_limit_are_incorrect() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let limited = TestSettings {
        time_limit_seconds: Some(10.0),
        ..settings(3)
    };
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters::default(),
        &limited,
        now(),
        &mut rng(6),
    );
    let answers: Vec<Answer> = session
        .questions
        .iter()
        .map(|q| correct_answer(q, 6.0))
        .collect();
    let results = orchestrator
        .complete_session(&mut session, &answers, &mut items, now())
        .unwrap();

    let outcomes: Vec<Option<bool>> = session.questions.iter().map(|q| q.is_correct()).collect();
    assert_eq!(outcomes, vec![Some(true), Some(false), Some(false)]);
    assert_eq!(results.correct, 1);
}

#[test]
fn malformed_and_skipped_answers_grade_incorrect() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters {
            question_types: vec![QuestionType::Typing],
            ..Default::default()
        },
        &settings(2),
        now(),
        &mut rng(7),
    );
    let answers = vec![
        Answer::boolean(session.questions[0].id, true, 4.0),
        Answer::skipped(session.questions[1].id, 30.0),
    ];
    let results = orchestrator
        .complete_session(&mut session, &answers, &mut items, now())
        .unwrap();
    assert_eq!(results.correct, 0);
    assert!(session.questions.iter().all(|q| q.is_correct() == Some(false)));
}

#[test]
fn filters_restrict_the_pool() {
    let orchestrator = Orchestrator::default();
    let items = vocabulary();
    let filters = SessionFilters {
        categories: vec!["verbs".into()],
        ..Default::default()
    };
    let session = orchestrator.build_session(&items, &filters, &settings(10), now(), &mut rng(8));
    let touched = touched_items(&session);
    assert!(!touched.is_empty());
    assert!(touched.len() <= 4);
    assert!(touched.iter().all(|id| item(&items, *id).category == "verbs"));
}

#[test]
fn hardest_first_orders_by_tier_then_ease() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    // Two Hard items; the lower ease factor should come first
    items[3].schedule.ease_factor = 2.4;
    items[7].schedule.ease_factor = 1.9;
    let filters = SessionFilters {
        question_types: vec![QuestionType::Typing],
        hardest_first: true,
        ..Default::default()
    };
    let session = orchestrator.build_session(&items, &filters, &settings(12), now(), &mut rng(9));
    let tiers: Vec<DifficultyTier> = session
        .questions
        .iter()
        .map(|q| item(&items, q.item_id).difficulty_tier)
        .collect();
    let mut sorted = tiers.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(tiers, sorted);
    assert_eq!(session.questions[0].item_id, items[7].id);
}

#[test]
fn same_seed_builds_same_session() {
    let orchestrator = Orchestrator::default();
    let items = vocabulary();
    let a = orchestrator.build_session(&items, &SessionFilters::default(), &settings(8), now(), &mut rng(10));
    let b = orchestrator.build_session(&items, &SessionFilters::default(), &settings(8), now(), &mut rng(10));
    assert_eq!(a, b);
}

#[test]
fn session_overrides_distractor_count() {
    let orchestrator = Orchestrator::new(EngineSettings::default()).unwrap();
    let items = vocabulary();
    let test_settings = TestSettings {
        distractor_count: Some(2),
        ..settings(6)
    };
    let session = orchestrator.build_session(
        &items,
        &SessionFilters {
            question_types: vec![QuestionType::MultipleChoice],
            ..Default::default()
        },
        &test_settings,
        now(),
        &mut rng(11),
    );
    for question in &session.questions {
        match &question.kind {
            QuestionKind::MultipleChoice { options, .. } => assert_eq!(options.len(), 3),
            other => panic!("expected multiple choice, got {:?}", other),
        }
    }
}

#[test]
fn completed_session_round_trips_through_json() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let mut session = orchestrator.build_session(
        &items,
        &SessionFilters::default(),
        &settings(6),
        now(),
        &mut rng(12),
    );
    let answers: Vec<Answer> = session
        .questions
        .iter()
        .map(|q| correct_answer(q, 8.0))
        .collect();
    orchestrator
        .complete_session(&mut session, &answers, &mut items, now())
        .unwrap();

    let json = serde_json::to_string(&session).unwrap();
    let back: TestSession = serde_json::from_str(&json).unwrap();
    assert_eq!(back, session);

    let json = serde_json::to_string(&items).unwrap();
    let back: Vec<VocabularyItem> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, items);
}

#[test]
fn repeated_failures_surface_as_urgent_and_drive_recommendation() {
    let orchestrator = Orchestrator::default();
    let mut items = vocabulary();
    let filters = SessionFilters {
        question_types: vec![QuestionType::TrueFalse],
        ..Default::default()
    };

    let mut history = Vec::new();
    for day in 0..3 {
        let started = now() + Duration::days(day);
        let mut session =
            orchestrator.build_session(&items, &filters, &settings(12), started, &mut rng(20 + day as u64));
        let answers: Vec<Answer> = session
            .questions
            .iter()
            .map(|q| {
                // "book" is always missed
                if q.item_id == 1 {
                    wrong_answer(q, 10.0)
                } else {
                    correct_answer(q, 10.0)
                }
            })
            .collect();
        orchestrator
            .complete_session(&mut session, &answers, &mut items, started)
            .unwrap();
        history.push(session);
    }

    let urgent = find_urgent_review_items(&history, &items, now() + Duration::days(3));
    assert_eq!(urgent.len(), 1);
    assert_eq!(urgent[0].item.id, 1);
    assert_eq!(urgent[0].success_rate, 0.0);
    assert_eq!(urgent[0].attempts, 3);

    // 11/12 per session: true/false is strong, scores are above 85%
    let recommendation = suggest_next_test_parameters(&history);
    assert_eq!(recommendation.focus, None);
    assert!(recommendation.hardest_first);
    assert_eq!(
        recommendation.difficulty_tiers,
        vec![DifficultyTier::Medium, DifficultyTier::Hard]
    );
    assert_eq!(recommendation.question_count, 12);
}
