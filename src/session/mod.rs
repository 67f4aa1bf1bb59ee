//! Candidate-side exam session.
//!
//! [`ExamSession`] is a plain in-memory value owned by whoever renders the attempt.
//! It is never persisted; dropping it discards the attempt. [`SessionDriver`] runs
//! one on the wall clock and hands the final answers to a [`SubmissionSink`].

mod client;
mod driver;
mod state;
mod timer;
mod views;

pub use client::{HttpSubmitClient, SubmitClientError};
pub use driver::{DriverHandle, SessionCommand, SessionDriver, SessionOutcome, SubmissionSink};
pub use state::{
    ExamSession, Phase, SessionError, SubjectAccess, SubmissionPayload, SubmitPrompt,
    SubmitReason, TickOutcome,
};
pub use timer::{Countdown, WARNING_THRESHOLD_SECS};
pub use views::{SessionSnapshot, SessionTotals, SubjectCounts, SubjectSummary};
