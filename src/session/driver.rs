use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};

use crate::content::Subject;

use super::state::{ExamSession, SubmissionPayload, TickOutcome};
use super::views::SessionSnapshot;

const TICK: Duration = Duration::from_secs(1);
const COMMAND_BUFFER: usize = 64;

/// Receives the final answers of an attempt. Called at most once per session.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, payload: &SubmissionPayload) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetAnswer { subject: Subject, index: usize, option: u32 },
    ClearAnswer { subject: Subject, index: usize },
    ToggleReview { subject: Subject, index: usize },
    Navigate { subject: Subject, index: usize },
    Next,
    ConfirmPhaseOneSubmit,
    AcknowledgeTransition,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The session reached `submitted`. `delivered` is false when the sink failed;
    /// the session does not roll back in that case.
    Submitted { payload: SubmissionPayload, delivered: bool },
    /// Every handle was dropped before submission.
    Abandoned,
}

#[derive(Clone)]
pub struct DriverHandle {
    commands: mpsc::Sender<SessionCommand>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl DriverHandle {
    /// Returns false once the driver has stopped.
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.commands.send(command).await.is_ok()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }
}

pub struct SessionDriver<S> {
    session: ExamSession,
    sink: S,
    commands: mpsc::Receiver<SessionCommand>,
    snapshots: watch::Sender<SessionSnapshot>,
}

impl<S: SubmissionSink> SessionDriver<S> {
    pub fn new(session: ExamSession, sink: S) -> (Self, DriverHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let driver = Self { session, sink, commands: command_rx, snapshots: snapshot_tx };
        (driver, DriverHandle { commands: command_tx, snapshots: snapshot_rx })
    }

    /// Ticks the session once per second and applies commands between ticks until
    /// it is submitted or abandoned.
    pub async fn run(mut self) -> SessionOutcome {
        let mut ticker = time::interval_at(Instant::now() + TICK, TICK);

        loop {
            let payload = tokio::select! {
                _ = ticker.tick() => match self.session.tick() {
                    TickOutcome::Submitted(payload) => Some(payload),
                    TickOutcome::PhaseOneExpired | TickOutcome::Running | TickOutcome::Idle => None,
                },
                command = self.commands.recv() => match command {
                    Some(command) => self.apply(command),
                    None => {
                        tracing::info!(
                            test_id = %self.session.test_id(),
                            "Exam session abandoned before submission"
                        );
                        return SessionOutcome::Abandoned;
                    }
                },
            };

            self.snapshots.send_replace(self.session.snapshot());

            if let Some(payload) = payload {
                return self.deliver(payload).await;
            }
        }
    }

    fn apply(&mut self, command: SessionCommand) -> Option<SubmissionPayload> {
        let session = &mut self.session;
        match command {
            SessionCommand::SetAnswer { subject, index, option } => {
                session.set_answer(subject, index, option);
            }
            SessionCommand::ClearAnswer { subject, index } => {
                session.clear_answer(subject, index);
            }
            SessionCommand::ToggleReview { subject, index } => {
                session.toggle_review(subject, index);
            }
            SessionCommand::Navigate { subject, index } => {
                session.navigate(subject, index);
            }
            SessionCommand::Next => {
                session.go_next();
            }
            SessionCommand::ConfirmPhaseOneSubmit => {
                session.confirm_phase1_submit();
            }
            SessionCommand::AcknowledgeTransition => {
                session.acknowledge_transition();
            }
            SessionCommand::Submit => return session.confirm_submit(),
        }
        None
    }

    async fn deliver(self, payload: SubmissionPayload) -> SessionOutcome {
        let delivered = match self.sink.deliver(&payload).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(
                    test_id = %payload.test_id,
                    reason = ?payload.reason,
                    error = %err,
                    "Failed to deliver submission"
                );
                false
            }
        };
        SessionOutcome::Submitted { payload, delivered }
    }
}
