use sqlx::types::Json;
use thiserror::Error;
use uuid::Uuid;

use crate::content::{validate_sections, AnswerKey, ContentError, Section, TestKind};
use crate::core::{metrics, time::primitive_now_utc};
use crate::db::models::{AnswerMap, QuestionResult, SectionResult, Submission, User};
use crate::db::types::UserRole;
use crate::repositories::store::{ExamStore, StoreError};
use crate::services::chunk_resolver::{self, ResolveError};

#[derive(Debug, Error)]
pub(crate) enum GradingError {
    #[error("Only students can submit tests")]
    NotStudent,
    #[error("{0}")]
    Invalid(String),
    #[error("Test not found")]
    TestNotFound,
    #[error("Test is not available")]
    TestUnavailable,
    #[error("stored test content is invalid: {0}")]
    InvalidContent(ContentError),
    #[error("Test already submitted")]
    AlreadySubmitted,
    #[error(transparent)]
    Store(StoreError),
}

impl From<ResolveError> for GradingError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound => Self::TestNotFound,
            ResolveError::Store(err) => Self::Store(err),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreCard {
    pub(crate) sections: Vec<SectionResult>,
    pub(crate) total_score: u32,
    pub(crate) total_max_score: u32,
    pub(crate) percentage: u32,
}

/// A persisted submission together with the answer-key flag read while grading it.
#[derive(Debug, Clone)]
pub(crate) struct Graded {
    pub(crate) submission: Submission,
    pub(crate) show_answer_key: bool,
}

pub(crate) fn percentage(score: u32, max_score: u32) -> u32 {
    if max_score == 0 {
        return 0;
    }
    (100.0 * f64::from(score) / f64::from(max_score)).round() as u32
}

/// Only a JSON number equal to the key counts; strings and other shapes are wrong.
fn matches_key(selected: &serde_json::Value, correct_option: u32) -> bool {
    selected.as_f64().is_some_and(|value| value == f64::from(correct_option))
}

pub(crate) fn score_section(section: &Section, answers: &AnswerMap) -> SectionResult {
    let marks = section.marks_per_question();
    let mut result = SectionResult {
        subject: section.subject,
        marks_per_question: marks,
        score: 0,
        max_score: section.max_score(),
        correct: 0,
        incorrect: 0,
        unanswered: 0,
        questions: Vec::with_capacity(section.questions.len()),
    };

    for (index, question) in section.questions.iter().enumerate() {
        let key = AnswerKey::new(section.subject, index).to_string();
        let selected = answers.get(&key).filter(|value| !value.is_null()).cloned();

        let is_correct = match &selected {
            None => {
                result.unanswered += 1;
                false
            }
            Some(value) if matches_key(value, question.correct_option) => {
                result.correct += 1;
                true
            }
            Some(_) => {
                result.incorrect += 1;
                false
            }
        };
        let marks_awarded = if is_correct { marks } else { 0 };
        result.score += marks_awarded;

        result.questions.push(QuestionResult {
            index,
            text: question.text.clone(),
            image: question.image.clone(),
            options: question.options.clone(),
            selected,
            correct_option: question.correct_option,
            is_correct,
            marks_awarded,
            explanation: question.explanation.clone(),
        });
    }

    result
}

pub(crate) fn score_sections(sections: &[Section], answers: &AnswerMap) -> ScoreCard {
    let sections: Vec<SectionResult> =
        sections.iter().map(|section| score_section(section, answers)).collect();
    let total_score = sections.iter().map(|s| s.score).sum();
    let total_max_score = sections.iter().map(|s| s.max_score).sum();

    ScoreCard {
        sections,
        total_score,
        total_max_score,
        percentage: percentage(total_score, total_max_score),
    }
}

/// Scoring looks answers up by the canonical `{subject}_{index}` spelling, so any other
/// spelling the parser tolerates (case, aliases, leading zeros) would be silently ignored.
fn is_canonical_key(key: &str) -> bool {
    key.parse::<AnswerKey>().is_ok_and(|parsed| parsed.to_string() == key)
}

fn check_request(candidate: &User, test_id: &str, answers: &AnswerMap) -> Result<(), GradingError> {
    if candidate.role != UserRole::Student {
        return Err(GradingError::NotStudent);
    }
    if test_id.trim().is_empty() || answers.is_empty() {
        return Err(GradingError::Invalid("Test ID and answers are required".to_string()));
    }
    if let Some(bad) = answers.keys().find(|key| !is_canonical_key(key)) {
        return Err(GradingError::Invalid(format!("Malformed answer key '{bad}'")));
    }
    Ok(())
}

/// Grades `answers` against the logical test `test_id` belongs to and persists the
/// result once per (test group, candidate).
pub(crate) async fn submit(
    store: &dyn ExamStore,
    candidate: &User,
    test_id: &str,
    answers: AnswerMap,
) -> Result<Graded, GradingError> {
    check_request(candidate, test_id, &answers)?;

    let logical = chunk_resolver::resolve(store, test_id.trim()).await?;
    if !logical.is_available() {
        return Err(GradingError::TestUnavailable);
    }
    validate_sections(&logical.sections).map_err(GradingError::InvalidContent)?;
    let group_id = logical.group_id().to_string();

    let existing =
        store.find_submission(&group_id, &candidate.id).await.map_err(GradingError::Store)?;
    if existing.is_some() {
        tracing::info!(
            test_group_id = %group_id,
            student_id = %candidate.id,
            source = "precheck",
            "Duplicate submission rejected"
        );
        metrics::record_duplicate("precheck");
        return Err(GradingError::AlreadySubmitted);
    }

    let card = score_sections(&logical.sections, &answers);
    let now = primitive_now_utc();
    let record = Submission {
        id: Uuid::new_v4().to_string(),
        test_group_id: group_id.clone(),
        test_id: test_id.trim().to_string(),
        student_id: candidate.id.clone(),
        answers: Json(answers),
        section_results: Json(card.sections),
        total_score: card.total_score as i32,
        total_max_score: card.total_max_score as i32,
        percentage: card.percentage as i32,
        submitted_at: now,
        created_at: now,
    };

    let submission = match store.create_submission(record).await {
        Ok(submission) => submission,
        Err(StoreError::Duplicate) => {
            tracing::info!(
                test_group_id = %group_id,
                student_id = %candidate.id,
                source = "constraint",
                "Duplicate submission rejected"
            );
            metrics::record_duplicate("constraint");
            return Err(GradingError::AlreadySubmitted);
        }
        Err(err) => return Err(GradingError::Store(err)),
    };

    metrics::record_graded(match logical.kind() {
        TestKind::Mock => "mock",
        TestKind::Custom => "custom",
    });
    tracing::info!(
        submission_id = %submission.id,
        test_group_id = %group_id,
        student_id = %candidate.id,
        score = submission.total_score,
        max_score = submission.total_max_score,
        fragments = logical.fragment_ids.len(),
        "Submission graded"
    );

    Ok(Graded { submission, show_answer_key: logical.show_answer_key() })
}
