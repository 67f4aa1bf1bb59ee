use serde::Serialize;

use crate::content::Subject;

use super::state::{ExamSession, Phase, SubjectAccess};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubjectCounts {
    pub total: usize,
    pub answered: usize,
    pub unanswered: usize,
    pub marked_for_review: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionTotals {
    pub answered: usize,
    pub unanswered: usize,
    pub marked_for_review: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectSummary {
    pub subject: Subject,
    pub access: SubjectAccess,
    pub counts: SubjectCounts,
}

/// What a renderer needs after every tick or command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub active_subject: Subject,
    pub active_question: usize,
    pub remaining_seconds: Option<u32>,
    pub warning: bool,
    pub is_last_question: bool,
    pub subjects: Vec<SubjectSummary>,
    pub totals: SessionTotals,
}

impl ExamSession {
    pub fn subject_counts(&self, subject: Subject) -> SubjectCounts {
        let total = self.question_count(subject);
        let answered = self
            .answers()
            .keys()
            .filter(|key| key.subject == subject && key.index < total)
            .count();
        let marked_for_review =
            (0..total).filter(|index| self.is_marked_for_review(subject, *index)).count();

        SubjectCounts { total, answered, unanswered: total - answered, marked_for_review }
    }

    /// Sums over every subject the current phase lets the candidate see.
    pub fn totals(&self) -> SessionTotals {
        self.subjects()
            .iter()
            .filter(|subject| self.access(**subject) != SubjectAccess::Hidden)
            .map(|subject| self.subject_counts(*subject))
            .fold(SessionTotals::default(), |mut totals, counts| {
                totals.answered += counts.answered;
                totals.unanswered += counts.unanswered;
                totals.marked_for_review += counts.marked_for_review;
                totals
            })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let countdown = self.active_countdown();
        SessionSnapshot {
            phase: self.phase(),
            active_subject: self.active_subject(),
            active_question: self.active_question(),
            remaining_seconds: countdown.map(|c| c.remaining()),
            warning: countdown.is_some_and(|c| c.is_warning()),
            is_last_question: self.is_last_navigable_question(),
            subjects: self
                .subjects()
                .iter()
                .map(|subject| SubjectSummary {
                    subject: *subject,
                    access: self.access(*subject),
                    counts: self.subject_counts(*subject),
                })
                .collect(),
            totals: self.totals(),
        }
    }
}
