use crate::core::time::format_primitive;
use crate::db::models::Submission;
use crate::schemas::submission::SubmissionResponse;

/// Shapes a stored submission for a reader. The stored record always keeps full
/// per-question detail; while the answer key is withheld only aggregates leave.
pub(crate) fn shape(submission: Submission, show_answer_key: bool) -> SubmissionResponse {
    let mut section_results = submission.section_results.0;
    if !show_answer_key {
        for section in &mut section_results {
            section.questions.clear();
        }
    }

    SubmissionResponse {
        id: submission.id,
        test_id: submission.test_id,
        test_group_id: submission.test_group_id,
        student_id: submission.student_id,
        answers: submission.answers.0,
        section_results,
        total_score: submission.total_score,
        total_max_score: submission.total_max_score,
        percentage: submission.percentage,
        show_answer_key,
        submitted_at: format_primitive(submission.submitted_at),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::content::Subject;
    use crate::db::models::AnswerMap;
    use crate::services::grading::score_sections;
    use crate::test_support::{base_time, section};
    use sqlx::types::Json;

    fn graded_submission() -> Submission {
        let answers: AnswerMap =
            serde_json::from_value(json!({ "physics_0": 1, "maths_1": 2 })).expect("answers");
        let card = score_sections(
            &[section(Subject::Physics, &[1, 0]), section(Subject::Maths, &[0, 2])],
            &answers,
        );
        Submission {
            id: "sub-1".into(),
            test_group_id: "root".into(),
            test_id: "root".into(),
            student_id: "s1".into(),
            answers: Json(answers),
            section_results: Json(card.sections),
            total_score: card.total_score as i32,
            total_max_score: card.total_max_score as i32,
            percentage: card.percentage as i32,
            submitted_at: base_time(),
            created_at: base_time(),
        }
    }

    #[test]
    fn hidden_key_keeps_only_aggregates() {
        let response = shape(graded_submission(), false);

        assert!(!response.show_answer_key);
        assert!(response.section_results.iter().all(|s| s.questions.is_empty()));
        let physics = &response.section_results[0];
        assert_eq!((physics.correct, physics.incorrect, physics.unanswered), (1, 0, 1));
        assert_eq!((response.total_score, response.total_max_score), (3, 6));
        assert_eq!(response.percentage, 50);
    }

    #[test]
    fn released_key_returns_full_detail() {
        let response = shape(graded_submission(), true);

        assert!(response.show_answer_key);
        let maths = &response.section_results[1];
        assert_eq!(maths.questions.len(), 2);
        assert!(maths.questions[1].is_correct);
        assert_eq!(maths.questions[1].marks_awarded, 2);
    }
}
