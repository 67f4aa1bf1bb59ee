use serde::{Deserialize, Serialize};

use super::{ContentError, Section, Subject, TestKind};

pub const DEFAULT_MOCK_PHASE_MINUTES: u32 = 90;

/// Durations as stored with a test, in minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseDurations {
    pub phase_one_minutes: Option<i32>,
    pub phase_two_minutes: Option<i32>,
    pub duration_minutes: Option<i32>,
}

/// Which subjects belong to which timed phase, and for how long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PhasePlan {
    Mock {
        phase_one: Vec<Subject>,
        phase_two: Subject,
        phase_one_seconds: u32,
        phase_two_seconds: u32,
    },
    Custom {
        subjects: Vec<Subject>,
        duration_seconds: u32,
    },
}

impl PhasePlan {
    pub fn build(
        kind: TestKind,
        sections: &[Section],
        durations: PhaseDurations,
    ) -> Result<Self, ContentError> {
        match kind {
            TestKind::Mock => {
                let phase_one: Vec<Subject> =
                    sections.iter().map(|s| s.subject).filter(|s| s.is_phase_one()).collect();
                for required in [Subject::Physics, Subject::Chemistry] {
                    if !phase_one.contains(&required) {
                        return Err(ContentError::MissingPhaseOneSubject(required));
                    }
                }
                let phase_two: Vec<Subject> =
                    sections.iter().map(|s| s.subject).filter(|s| !s.is_phase_one()).collect();
                let &[phase_two] = phase_two.as_slice() else {
                    return Err(ContentError::PhaseTwoSubjectCount(phase_two.len()));
                };
                Ok(Self::Mock {
                    phase_one,
                    phase_two,
                    phase_one_seconds: minutes_to_seconds(
                        "phase1_minutes",
                        durations.phase_one_minutes,
                        DEFAULT_MOCK_PHASE_MINUTES,
                    )?,
                    phase_two_seconds: minutes_to_seconds(
                        "phase2_minutes",
                        durations.phase_two_minutes,
                        DEFAULT_MOCK_PHASE_MINUTES,
                    )?,
                })
            }
            TestKind::Custom => {
                let minutes = durations.duration_minutes.ok_or(ContentError::MissingDuration)?;
                Ok(Self::Custom {
                    subjects: sections.iter().map(|s| s.subject).collect(),
                    duration_seconds: minutes_to_seconds("duration_minutes", Some(minutes), 0)?,
                })
            }
        }
    }

    pub fn kind(&self) -> TestKind {
        match self {
            Self::Mock { .. } => TestKind::Mock,
            Self::Custom { .. } => TestKind::Custom,
        }
    }

    /// All subjects in navigation order.
    pub fn subjects(&self) -> Vec<Subject> {
        match self {
            Self::Mock { phase_one, phase_two, .. } => {
                let mut subjects = phase_one.clone();
                subjects.push(*phase_two);
                subjects
            }
            Self::Custom { subjects, .. } => subjects.clone(),
        }
    }
}

fn minutes_to_seconds(
    field: &'static str,
    minutes: Option<i32>,
    default: u32,
) -> Result<u32, ContentError> {
    let minutes = match minutes {
        Some(value) if value > 0 => value as u32,
        Some(_) => return Err(ContentError::InvalidDuration { field }),
        None => default,
    };
    Ok(minutes.saturating_mul(60))
}
