use serde::{Deserialize, Serialize};

use super::Subject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "testkind", rename_all = "lowercase")]
pub enum TestKind {
    Mock,
    Custom,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub options: Vec<QuestionOption>,
    /// Zero-based index into `options`.
    #[serde(alias = "correctAnswer", alias = "correct_answer")]
    pub correct_option: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub subject: Subject,
    /// Explicit override; `None` falls back to the subject default.
    #[serde(default, alias = "marksPerQuestion", skip_serializing_if = "Option::is_none")]
    pub marks_per_question: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Section {
    pub fn marks_per_question(&self) -> u32 {
        self.marks_per_question.unwrap_or_else(|| self.subject.default_marks_per_question())
    }

    pub fn max_score(&self) -> u32 {
        let questions = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        self.marks_per_question().saturating_mul(questions)
    }
}

pub(crate) fn has_content(text: &Option<String>, image: &Option<String>) -> bool {
    let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.trim().is_empty());
    present(text) || present(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_falls_back_to_subject_marks() {
        let section: Section = serde_json::from_value(json!({
            "subject": "maths",
            "questions": []
        }))
        .unwrap();
        assert_eq!(section.marks_per_question(), 2);

        let overridden: Section = serde_json::from_value(json!({
            "subject": "maths",
            "marksPerQuestion": 4,
            "questions": []
        }))
        .unwrap();
        assert_eq!(overridden.marks_per_question(), 4);
    }

    #[test]
    fn question_accepts_authoring_field_names() {
        let question: Question = serde_json::from_value(json!({
            "text": "2 + 2",
            "options": [{ "text": "3" }, { "text": "4" }],
            "correctAnswer": 1
        }))
        .unwrap();
        assert_eq!(question.correct_option, 1);
        assert!(question.explanation.is_none());
    }

    #[test]
    fn blank_strings_do_not_count_as_content() {
        assert!(!has_content(&Some("  ".into()), &None));
        assert!(has_content(&None, &Some("img/1.png".into())));
    }
}
