//! Immutable test content as authored: subjects, sections and questions, plus the
//! answer-key addressing and phase plan shared by the grading server and the
//! candidate-side session.

mod answers;
mod candidate;
mod model;
mod plan;
mod subject;
mod validation;

pub use answers::{AnswerKey, AnswerKeyError};
pub use candidate::{CandidateQuestion, CandidateSection, CandidateTest};
pub use model::{Explanation, Question, QuestionOption, Section, TestKind};
pub use plan::{PhaseDurations, PhasePlan, DEFAULT_MOCK_PHASE_MINUTES};
pub use subject::{Subject, UnknownSubject};
pub use validation::{
    validate_sections, ContentError, MAX_MARKS_PER_QUESTION, MAX_QUESTIONS_PER_SECTION,
};
