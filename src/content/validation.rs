use std::collections::HashSet;

use thiserror::Error;

use super::model::has_content;
use super::{Section, Subject};

pub const MAX_MARKS_PER_QUESTION: u32 = 100;
pub const MAX_QUESTIONS_PER_SECTION: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("test has no sections")]
    NoSections,
    #[error("subject {0} appears more than once")]
    DuplicateSubject(Subject),
    #[error("{subject} marks per question must be between 1 and {MAX_MARKS_PER_QUESTION}")]
    InvalidMarks { subject: Subject },
    #[error("{subject} has more than {MAX_QUESTIONS_PER_SECTION} questions")]
    TooManyQuestions { subject: Subject },
    #[error("{subject} question {index} has neither text nor image")]
    BlankQuestion { subject: Subject, index: usize },
    #[error("{subject} question {index} needs at least 2 options")]
    TooFewOptions { subject: Subject, index: usize },
    #[error("{subject} question {index} option {option} has neither text nor image")]
    BlankOption { subject: Subject, index: usize, option: usize },
    #[error("{subject} question {index} correct option {correct} is out of range")]
    CorrectOptionOutOfRange { subject: Subject, index: usize, correct: u32 },
    #[error("mock test is missing phase-one subject {0}")]
    MissingPhaseOneSubject(Subject),
    #[error("mock test must carry exactly one phase-two subject, found {0}")]
    PhaseTwoSubjectCount(usize),
    #[error("{field} must be positive")]
    InvalidDuration { field: &'static str },
    #[error("custom test requires a duration")]
    MissingDuration,
}

/// Checks the structural invariants of a (merged) section list.
pub fn validate_sections(sections: &[Section]) -> Result<(), ContentError> {
    if sections.is_empty() {
        return Err(ContentError::NoSections);
    }

    let mut seen = HashSet::new();
    for section in sections {
        let subject = section.subject;
        if !seen.insert(subject) {
            return Err(ContentError::DuplicateSubject(subject));
        }
        if !(1..=MAX_MARKS_PER_QUESTION).contains(&section.marks_per_question()) {
            return Err(ContentError::InvalidMarks { subject });
        }
        if section.questions.len() > MAX_QUESTIONS_PER_SECTION {
            return Err(ContentError::TooManyQuestions { subject });
        }

        for (index, question) in section.questions.iter().enumerate() {
            if !has_content(&question.text, &question.image) {
                return Err(ContentError::BlankQuestion { subject, index });
            }
            if question.options.len() < 2 {
                return Err(ContentError::TooFewOptions { subject, index });
            }
            if let Some(option) =
                question.options.iter().position(|o| !has_content(&o.text, &o.image))
            {
                return Err(ContentError::BlankOption { subject, index, option });
            }
            if question.correct_option as usize >= question.options.len() {
                return Err(ContentError::CorrectOptionOutOfRange {
                    subject,
                    index,
                    correct: question.correct_option,
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Question, QuestionOption};

    fn option(text: &str) -> QuestionOption {
        QuestionOption { text: Some(text.to_string()), image: None }
    }

    fn question(correct: u32) -> Question {
        Question {
            text: Some("q".into()),
            image: None,
            options: vec![option("a"), option("b")],
            correct_option: correct,
            explanation: None,
        }
    }

    fn section(subject: Subject, questions: Vec<Question>) -> Section {
        Section { subject, marks_per_question: None, questions }
    }

    #[test]
    fn accepts_well_formed_sections() {
        let sections = vec![
            section(Subject::Physics, vec![question(0), question(1)]),
            section(Subject::Maths, vec![question(1)]),
        ];
        assert_eq!(validate_sections(&sections), Ok(()));
    }

    #[test]
    fn rejects_duplicate_subjects() {
        let sections = vec![
            section(Subject::Physics, vec![question(0)]),
            section(Subject::Physics, vec![question(0)]),
        ];
        assert_eq!(
            validate_sections(&sections),
            Err(ContentError::DuplicateSubject(Subject::Physics))
        );
    }

    #[test]
    fn rejects_out_of_range_correct_option() {
        let sections = vec![section(Subject::Chemistry, vec![question(0), question(2)])];
        assert_eq!(
            validate_sections(&sections),
            Err(ContentError::CorrectOptionOutOfRange {
                subject: Subject::Chemistry,
                index: 1,
                correct: 2
            })
        );
    }

    #[test]
    fn image_only_question_and_option_are_valid() {
        let mut q = question(0);
        q.text = None;
        q.image = Some("figure.png".into());
        q.options[1] = QuestionOption { text: None, image: Some("b.png".into()) };
        assert_eq!(validate_sections(&[section(Subject::Biology, vec![q])]), Ok(()));
    }

    #[test]
    fn rejects_blank_option_and_single_option() {
        let mut blank = question(0);
        blank.options[1] = QuestionOption::default();
        assert_eq!(
            validate_sections(&[section(Subject::Physics, vec![blank])]),
            Err(ContentError::BlankOption { subject: Subject::Physics, index: 0, option: 1 })
        );

        let mut single = question(0);
        single.options.truncate(1);
        assert_eq!(
            validate_sections(&[section(Subject::Physics, vec![single])]),
            Err(ContentError::TooFewOptions { subject: Subject::Physics, index: 0 })
        );
    }

    #[test]
    fn rejects_zero_marks_override() {
        let mut s = section(Subject::Physics, vec![question(0)]);
        s.marks_per_question = Some(0);
        assert_eq!(
            validate_sections(&[s]),
            Err(ContentError::InvalidMarks { subject: Subject::Physics })
        );
    }

    #[test]
    fn rejects_oversized_marks_and_sections() {
        let mut heavy = section(Subject::Physics, vec![question(0), question(1), question(2)]);
        heavy.marks_per_question = Some(2_000_000_000);
        assert_eq!(
            validate_sections(&[heavy]),
            Err(ContentError::InvalidMarks { subject: Subject::Physics })
        );

        let long = section(Subject::Biology, vec![question(0); MAX_QUESTIONS_PER_SECTION + 1]);
        assert_eq!(
            validate_sections(&[long]),
            Err(ContentError::TooManyQuestions { subject: Subject::Biology })
        );
    }
}
