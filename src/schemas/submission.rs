use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::models::{AnswerMap, SectionResult};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubmitTestRequest {
    #[serde(default, alias = "testId")]
    #[validate(length(min = 1, message = "Test ID and answers are required"))]
    pub(crate) test_id: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Test ID and answers are required"))]
    pub(crate) answers: AnswerMap,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) test_id: String,
    pub(crate) test_group_id: String,
    pub(crate) student_id: String,
    pub(crate) answers: AnswerMap,
    pub(crate) section_results: Vec<SectionResult>,
    pub(crate) total_score: i32,
    pub(crate) total_max_score: i32,
    pub(crate) percentage: i32,
    pub(crate) show_answer_key: bool,
    pub(crate) submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionListQuery {
    #[serde(default)]
    pub(crate) skip: i64,
    #[serde(default = "crate::api::pagination::default_limit")]
    pub(crate) limit: i64,
}
