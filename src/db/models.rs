use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::content::{Explanation, PhaseDurations, QuestionOption, Section, Subject, TestKind};
use crate::db::types::UserRole;

/// Raw answer map as submitted: `{subject}_{index}` to whatever the client sent.
pub(crate) type AnswerMap = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) username: String,
    pub(crate) full_name: String,
    pub(crate) role: UserRole,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
}

/// One stored test document. Either a whole logical test or one fragment of it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct TestDocument {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) course_id: Option<String>,
    pub(crate) kind: TestKind,
    pub(crate) sections: Json<Vec<Section>>,
    pub(crate) phase1_minutes: Option<i32>,
    pub(crate) phase2_minutes: Option<i32>,
    pub(crate) duration_minutes: Option<i32>,
    pub(crate) show_answer_key: bool,
    pub(crate) is_approved: bool,
    pub(crate) is_active: bool,
    pub(crate) parent_test_id: Option<String>,
    pub(crate) chunk_index: Option<i32>,
    pub(crate) total_chunks: Option<i32>,
    pub(crate) created_at: PrimitiveDateTime,
}

impl TestDocument {
    pub(crate) fn durations(&self) -> PhaseDurations {
        PhaseDurations {
            phase_one_minutes: self.phase1_minutes,
            phase_two_minutes: self.phase2_minutes,
            duration_minutes: self.duration_minutes,
        }
    }

    /// True when the document declares itself part of a multi-document test.
    pub(crate) fn is_chunked(&self) -> bool {
        self.parent_test_id.is_some() || self.total_chunks.is_some_and(|total| total > 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct QuestionResult {
    pub(crate) index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) image: Option<String>,
    pub(crate) options: Vec<QuestionOption>,
    pub(crate) selected: Option<serde_json::Value>,
    pub(crate) correct_option: u32,
    pub(crate) is_correct: bool,
    pub(crate) marks_awarded: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) explanation: Option<Explanation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct SectionResult {
    pub(crate) subject: Subject,
    pub(crate) marks_per_question: u32,
    pub(crate) score: u32,
    pub(crate) max_score: u32,
    pub(crate) correct: u32,
    pub(crate) incorrect: u32,
    pub(crate) unanswered: u32,
    pub(crate) questions: Vec<QuestionResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Submission {
    pub(crate) id: String,
    pub(crate) test_group_id: String,
    pub(crate) test_id: String,
    pub(crate) student_id: String,
    pub(crate) answers: Json<AnswerMap>,
    pub(crate) section_results: Json<Vec<SectionResult>>,
    pub(crate) total_score: i32,
    pub(crate) total_max_score: i32,
    pub(crate) percentage: i32,
    pub(crate) submitted_at: PrimitiveDateTime,
    pub(crate) created_at: PrimitiveDateTime,
}
