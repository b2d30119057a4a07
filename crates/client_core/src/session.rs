//! Interactive driver: runs an [`UploadController`] on its own task so a UI
//! can keep sending commands while a request is in flight.

use tokio::{
    sync::{mpsc, watch},
    task::{JoinError, JoinHandle, JoinSet},
};
use tracing::{debug, info, warn};

use crate::{
    controller::{AnalysisOutcome, UploadController},
    error::AnalysisError,
    types::{VideoFile, WorkflowState},
};

const COMMAND_QUEUE_DEPTH: usize = 32;

#[derive(Debug)]
pub enum SessionCommand {
    SelectFile(VideoFile),
    Analyze,
}

pub struct AnalysisSession {
    commands: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<WorkflowState>,
    task: JoinHandle<()>,
}

impl AnalysisSession {
    /// Spawns the session task on the current tokio runtime.
    pub fn spawn(controller: UploadController) -> Self {
        let (commands, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (state_tx, state) = watch::channel(controller.state().clone());
        let task = tokio::spawn(run_session(controller, command_rx, state_tx));
        Self {
            commands,
            state,
            task,
        }
    }

    pub async fn send(&self, command: SessionCommand) -> Result<(), AnalysisError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AnalysisError::SessionClosed)
    }

    pub async fn select_file(&self, file: VideoFile) -> Result<(), AnalysisError> {
        self.send(SessionCommand::SelectFile(file)).await
    }

    pub async fn analyze(&self) -> Result<(), AnalysisError> {
        self.send(SessionCommand::Analyze).await
    }

    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.clone()
    }

    /// Waits until the published state matches `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&WorkflowState) -> bool,
    ) -> Result<WorkflowState, AnalysisError> {
        let mut state = self.state.clone();
        let matched = state
            .wait_for(|current| predicate(current))
            .await
            .map_err(|_| AnalysisError::SessionClosed)?;
        Ok(matched.clone())
    }

    /// Closes the command queue and waits for the task. An in-flight request
    /// still settles before the task exits.
    pub async fn shutdown(self) -> WorkflowState {
        let Self {
            commands,
            state,
            task,
        } = self;
        drop(commands);
        if let Err(err) = task.await {
            warn!("analysis session task ended abnormally: {err}");
        }
        let final_state = state.borrow().clone();
        final_state
    }
}

async fn run_session(
    mut controller: UploadController,
    mut commands: mpsc::Receiver<SessionCommand>,
    state_tx: watch::Sender<WorkflowState>,
) {
    let mut in_flight: JoinSet<AnalysisOutcome> = JoinSet::new();

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else {
                    break;
                };
                match command {
                    SessionCommand::SelectFile(file) => {
                        if let Err(err) = controller.select_file(file) {
                            debug!("select rejected: {err}");
                        }
                    }
                    SessionCommand::Analyze => match controller.begin_analysis() {
                        Ok(pending) => {
                            in_flight.spawn(pending.run());
                        }
                        Err(err) => debug!("analyze rejected: {err}"),
                    },
                }
                state_tx.send_replace(controller.state().clone());
            }
            Some(joined) = in_flight.join_next() => {
                controller.complete(settle_joined(joined));
                state_tx.send_replace(controller.state().clone());
            }
        }
    }

    if controller.state().is_analyzing() {
        info!("command queue closed; waiting for in-flight analysis");
        if let Some(joined) = in_flight.join_next().await {
            controller.complete(settle_joined(joined));
            state_tx.send_replace(controller.state().clone());
        }
    }
}

/// A request task that panicked or was cancelled still settles the attempt.
fn settle_joined(joined: Result<AnalysisOutcome, JoinError>) -> AnalysisOutcome {
    joined.unwrap_or_else(|err| {
        warn!("analysis request task ended abnormally: {err}");
        Err(AnalysisError::transport(format!(
            "analysis request ended abnormally: {err}"
        )))
    })
}
