use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;
use thiserror::Error;

use crate::content::{AnswerKey, CandidateSection, CandidateTest, PhasePlan, Subject};

use super::timer::Countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Phase1Active,
    Transition,
    Phase2Active,
    /// Single-timer custom test.
    Active,
    Submitted,
}

impl Phase {
    pub fn is_interactive(self) -> bool {
        matches!(self, Self::Phase1Active | Self::Phase2Active | Self::Active)
    }

    fn accepts_submit(self) -> bool {
        matches!(self, Self::Phase2Active | Self::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectAccess {
    Editable,
    ReadOnly,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    Confirmed,
    TimeExpired,
}

/// Body of the submit call: `{test_id, answers: {"physics_0": 2, ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    pub test_id: String,
    pub answers: BTreeMap<AnswerKey, u32>,
    #[serde(skip)]
    pub reason: SubmitReason,
}

/// What the confirmation dialog summarizes before an explicit submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPrompt {
    pub unanswered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No countdown is running in the current phase.
    Idle,
    Running,
    PhaseOneExpired,
    Submitted(SubmissionPayload),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("test has no subjects")]
    NoSubjects,
}

#[derive(Debug, Clone)]
pub struct ExamSession {
    test_id: String,
    plan: PhasePlan,
    subjects: Vec<Subject>,
    /// Option count of every question, per subject.
    layout: HashMap<Subject, Vec<usize>>,
    phase: Phase,
    active_subject: Subject,
    active_question: usize,
    answers: BTreeMap<AnswerKey, u32>,
    review: BTreeSet<AnswerKey>,
    primary: Countdown,
    phase_two: Option<Countdown>,
}

impl ExamSession {
    pub fn start(test: &CandidateTest) -> Result<Self, SessionError> {
        Self::new(test.test_id.clone(), test.plan.clone(), &test.sections)
    }

    pub fn new(
        test_id: impl Into<String>,
        plan: PhasePlan,
        sections: &[CandidateSection],
    ) -> Result<Self, SessionError> {
        let subjects = plan.subjects();
        let first = *subjects.first().ok_or(SessionError::NoSubjects)?;
        let layout = sections
            .iter()
            .map(|section| {
                (section.subject, section.questions.iter().map(|q| q.options.len()).collect())
            })
            .collect();

        let (phase, mut primary, phase_two) = match &plan {
            PhasePlan::Mock { phase_one_seconds, phase_two_seconds, .. } => (
                Phase::Phase1Active,
                Countdown::new(*phase_one_seconds),
                Some(Countdown::new(*phase_two_seconds)),
            ),
            PhasePlan::Custom { duration_seconds, .. } => {
                (Phase::Active, Countdown::new(*duration_seconds), None)
            }
        };
        primary.start();

        let session = Self {
            test_id: test_id.into(),
            plan,
            subjects,
            layout,
            phase,
            active_subject: first,
            active_question: 0,
            answers: BTreeMap::new(),
            review: BTreeSet::new(),
            primary,
            phase_two,
        };
        tracing::info!(test_id = %session.test_id, phase = ?session.phase, "Exam session started");
        Ok(session)
    }

    pub fn test_id(&self) -> &str {
        &self.test_id
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Subjects in navigation order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn active_subject(&self) -> Subject {
        self.active_subject
    }

    pub fn active_question(&self) -> usize {
        self.active_question
    }

    pub fn question_count(&self, subject: Subject) -> usize {
        self.layout.get(&subject).map_or(0, Vec::len)
    }

    pub fn answers(&self) -> &BTreeMap<AnswerKey, u32> {
        &self.answers
    }

    pub fn answer(&self, subject: Subject, index: usize) -> Option<u32> {
        self.answers.get(&AnswerKey::new(subject, index)).copied()
    }

    pub fn is_marked_for_review(&self, subject: Subject, index: usize) -> bool {
        self.review.contains(&AnswerKey::new(subject, index))
    }

    pub fn access(&self, subject: Subject) -> SubjectAccess {
        if !self.subjects.contains(&subject) {
            return SubjectAccess::Hidden;
        }
        match (&self.plan, self.phase) {
            (_, Phase::Submitted) => SubjectAccess::ReadOnly,
            (PhasePlan::Custom { .. }, _) => SubjectAccess::Editable,
            (PhasePlan::Mock { phase_two, .. }, phase) => {
                let in_phase_two = subject == *phase_two;
                match (phase, in_phase_two) {
                    (Phase::Phase1Active, false) => SubjectAccess::Editable,
                    (Phase::Phase1Active | Phase::Transition, true) => SubjectAccess::Hidden,
                    (Phase::Phase2Active | Phase::Active, true) => SubjectAccess::Editable,
                    _ => SubjectAccess::ReadOnly,
                }
            }
        }
    }

    /// The countdown of the current phase, if one is running or frozen in it.
    pub fn active_countdown(&self) -> Option<&Countdown> {
        match self.phase {
            Phase::Phase1Active | Phase::Active => Some(&self.primary),
            Phase::Phase2Active => self.phase_two.as_ref(),
            Phase::Transition | Phase::Submitted => None,
        }
    }

    fn editable(&self, subject: Subject, index: usize) -> bool {
        self.phase.is_interactive()
            && self.access(subject) == SubjectAccess::Editable
            && index < self.question_count(subject)
    }

    /// Records or overwrites a selection. Returns false when the question is locked.
    pub fn set_answer(&mut self, subject: Subject, index: usize, option: u32) -> bool {
        if !self.editable(subject, index) {
            return false;
        }
        let options = self.layout.get(&subject).and_then(|qs| qs.get(index)).copied().unwrap_or(0);
        if option as usize >= options {
            return false;
        }
        self.answers.insert(AnswerKey::new(subject, index), option);
        true
    }

    pub fn clear_answer(&mut self, subject: Subject, index: usize) -> bool {
        if !self.editable(subject, index) {
            return false;
        }
        self.answers.remove(&AnswerKey::new(subject, index)).is_some()
    }

    pub fn toggle_review(&mut self, subject: Subject, index: usize) -> bool {
        if !self.editable(subject, index) {
            return false;
        }
        let key = AnswerKey::new(subject, index);
        if !self.review.remove(&key) {
            self.review.insert(key);
        }
        true
    }

    pub fn navigate(&mut self, subject: Subject, index: usize) -> bool {
        if !self.phase.is_interactive()
            || self.access(subject) == SubjectAccess::Hidden
            || index >= self.question_count(subject)
        {
            return false;
        }
        self.active_subject = subject;
        self.active_question = index;
        true
    }

    /// The position "Next" would move to, or `None` on the last navigable question.
    pub fn next_position(&self) -> Option<(Subject, usize)> {
        if self.active_question + 1 < self.question_count(self.active_subject) {
            return Some((self.active_subject, self.active_question + 1));
        }
        let current = self.subjects.iter().position(|s| *s == self.active_subject)?;
        self.subjects[current + 1..]
            .iter()
            .copied()
            .find(|s| self.access(*s) != SubjectAccess::Hidden && self.question_count(*s) > 0)
            .map(|s| (s, 0))
    }

    pub fn is_last_navigable_question(&self) -> bool {
        self.next_position().is_none()
    }

    pub fn go_next(&mut self) -> bool {
        match self.next_position() {
            Some((subject, index)) => self.navigate(subject, index),
            None => false,
        }
    }

    /// Early end of phase one, confirmed by the candidate.
    pub fn confirm_phase1_submit(&mut self) -> bool {
        if self.phase != Phase::Phase1Active {
            return false;
        }
        self.leave_phase_one("confirmed");
        true
    }

    fn leave_phase_one(&mut self, trigger: &'static str) {
        self.primary.stop();
        self.phase = Phase::Transition;
        tracing::info!(
            test_id = %self.test_id,
            trigger,
            remaining_seconds = self.primary.remaining(),
            "Phase one closed"
        );
    }

    pub fn acknowledge_transition(&mut self) -> bool {
        let PhasePlan::Mock { phase_two, .. } = &self.plan else {
            return false;
        };
        if self.phase != Phase::Transition {
            return false;
        }
        let phase_two = *phase_two;
        if let Some(countdown) = self.phase_two.as_mut() {
            countdown.restart();
        }
        self.phase = Phase::Phase2Active;
        self.active_subject = phase_two;
        self.active_question = 0;
        tracing::info!(test_id = %self.test_id, subject = %phase_two, "Phase two started");
        true
    }

    pub fn request_submit(&self) -> Option<SubmitPrompt> {
        if !self.phase.accepts_submit() {
            return None;
        }
        Some(SubmitPrompt { unanswered: self.totals().unanswered })
    }

    /// Ends the attempt. A second call, or a call outside a submittable phase, is a no-op.
    pub fn confirm_submit(&mut self) -> Option<SubmissionPayload> {
        if !self.phase.accepts_submit() {
            return None;
        }
        Some(self.finish(SubmitReason::Confirmed))
    }

    fn finish(&mut self, reason: SubmitReason) -> SubmissionPayload {
        self.primary.stop();
        if let Some(countdown) = self.phase_two.as_mut() {
            countdown.stop();
        }
        self.phase = Phase::Submitted;
        tracing::info!(
            test_id = %self.test_id,
            reason = ?reason,
            answered = self.answers.len(),
            "Exam session submitted"
        );
        SubmissionPayload { test_id: self.test_id.clone(), answers: self.answers.clone(), reason }
    }

    /// One wall-clock second.
    pub fn tick(&mut self) -> TickOutcome {
        match self.phase {
            Phase::Phase1Active => {
                if self.primary.tick() {
                    self.leave_phase_one("timer");
                    TickOutcome::PhaseOneExpired
                } else {
                    TickOutcome::Running
                }
            }
            Phase::Phase2Active => {
                let expired = self.phase_two.as_mut().is_some_and(Countdown::tick);
                if expired {
                    TickOutcome::Submitted(self.finish(SubmitReason::TimeExpired))
                } else {
                    TickOutcome::Running
                }
            }
            Phase::Active => {
                if self.primary.tick() {
                    TickOutcome::Submitted(self.finish(SubmitReason::TimeExpired))
                } else {
                    TickOutcome::Running
                }
            }
            Phase::Transition | Phase::Submitted => TickOutcome::Idle,
        }
    }
}
