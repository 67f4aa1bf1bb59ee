use serde::{Deserialize, Serialize};

use super::{PhasePlan, Question, QuestionOption, Section, Subject};

/// A question as a candidate sees it during an attempt: no key, no explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub options: Vec<QuestionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSection {
    pub subject: Subject,
    pub marks_per_question: u32,
    pub questions: Vec<CandidateQuestion>,
}

/// Everything a candidate device needs to run one attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTest {
    pub test_id: String,
    pub test_group_id: String,
    pub title: String,
    pub plan: PhasePlan,
    pub sections: Vec<CandidateSection>,
}

impl From<&Question> for CandidateQuestion {
    fn from(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            image: question.image.clone(),
            options: question.options.clone(),
        }
    }
}

impl From<&Section> for CandidateSection {
    fn from(section: &Section) -> Self {
        Self {
            subject: section.subject,
            marks_per_question: section.marks_per_question(),
            questions: section.questions.iter().map(CandidateQuestion::from).collect(),
        }
    }
}
