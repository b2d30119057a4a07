//! Backend worker: owns the tokio runtime and the analysis session, and
//! feeds workflow state back to the UI thread.

use std::{sync::Arc, thread, time::Duration};

use client_core::{
    AnalysisSession, ClientSettings, HttpAnalysisTransport, UploadController, VideoFile,
    WorkflowState,
};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

const STATE_RETRY_DELAY: Duration = Duration::from_millis(25);

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    thread::spawn(move || run_backend(cmd_rx, ui_tx, settings));
}

fn report_error(ui_tx: &Sender<UiEvent>, context: UiErrorContext, message: impl Into<String>) {
    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(context, message)));
}

/// Pushes every workflow state to the UI. When the UI queue is full the
/// latest state is offered again until it fits, so the final state of an
/// attempt is never lost.
async fn forward_state(mut state_rx: watch::Receiver<WorkflowState>, ui_tx: Sender<UiEvent>) {
    loop {
        let state = state_rx.borrow_and_update().clone();
        match ui_tx.try_send(UiEvent::StateChanged(state)) {
            Ok(()) => {
                if state_rx.changed().await.is_err() {
                    break;
                }
            }
            Err(TrySendError::Full(_)) => {
                debug!("ui event queue full; retrying latest state");
                tokio::time::sleep(STATE_RETRY_DELAY).await;
            }
            Err(TrySendError::Disconnected(_)) => break,
        }
    }
}

fn run_backend(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, settings: ClientSettings) {
    let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            report_error(
                &ui_tx,
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: failed to build runtime: {err}"),
            );
            error!("failed to build backend runtime: {err}");
            return;
        }
    };

    let transport = match HttpAnalysisTransport::from_settings(&settings) {
        Ok(transport) => transport,
        Err(err) => {
            report_error(
                &ui_tx,
                UiErrorContext::BackendStartup,
                format!("backend worker startup failure: {err}"),
            );
            error!("invalid analysis API settings: {err}");
            return;
        }
    };
    info!(api = transport.api_base_url(), "analysis backend ready");

    let controller = UploadController::new(Arc::new(transport), settings.request_timeout());
    let session = {
        let _guard = runtime.enter();
        AnalysisSession::spawn(controller)
    };

    runtime.spawn(forward_state(session.subscribe(), ui_tx.clone()));
    let _ = ui_tx.try_send(UiEvent::Info("Choose a running video to analyze".to_string()));

    while let Ok(command) = cmd_rx.recv() {
        match command {
            BackendCommand::SelectFile { path } => {
                let file = match runtime.block_on(VideoFile::from_path(&path)) {
                    Ok(file) => file,
                    Err(err) => {
                        warn!(path = %path.display(), "failed to read selected video: {err}");
                        report_error(
                            &ui_tx,
                            UiErrorContext::SelectFile,
                            format!("failed to read '{}': {err}", path.display()),
                        );
                        continue;
                    }
                };
                if !file.is_video() {
                    warn!(
                        file = file.name(),
                        content_type = file.content_type(),
                        "selected file does not look like a video"
                    );
                }
                if let Err(err) = runtime.block_on(session.select_file(file)) {
                    report_error(&ui_tx, UiErrorContext::SelectFile, err.to_string());
                }
            }
            BackendCommand::Analyze => {
                if let Err(err) = runtime.block_on(session.analyze()) {
                    report_error(&ui_tx, UiErrorContext::Analyze, err.to_string());
                }
            }
        }
    }

    info!("ui command queue closed; stopping analysis backend");
    runtime.block_on(session.shutdown());
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use client_core::AnalysisError;

    use super::*;

    #[tokio::test]
    async fn final_state_reaches_a_backed_up_ui_queue() {
        let (ui_tx, ui_rx) = crossbeam_channel::bounded(1);
        ui_tx
            .try_send(UiEvent::Info("busy".to_string()))
            .expect("fill queue");
        let (state_tx, state_rx) = watch::channel(WorkflowState::NoFile);
        let forwarder = tokio::spawn(forward_state(state_rx, ui_tx));

        let file = VideoFile::new("run.mp4", "video/mp4", vec![0; 8]);
        state_tx.send_replace(WorkflowState::Analyzing(file.clone()));
        state_tx.send_replace(WorkflowState::Failed {
            file: Some(file),
            error: AnalysisError::Timeout { timeout_ms: 30_000 },
        });

        let deadline = Instant::now() + Duration::from_secs(2);
        let mut settled = None;
        while settled.is_none() && Instant::now() < deadline {
            match ui_rx.try_recv() {
                Ok(UiEvent::StateChanged(state)) if state.is_settled() => settled = Some(state),
                Ok(_) => {}
                Err(_) => tokio::time::sleep(Duration::from_millis(10)).await,
            }
        }
        assert_eq!(
            settled.as_ref().and_then(WorkflowState::error),
            Some(&AnalysisError::Timeout { timeout_ms: 30_000 })
        );

        drop(state_tx);
        forwarder.await.expect("forwarder exits once the session is gone");
    }
}
