//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::Dispatcher;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::{error::RunError, protocol::RunRequest};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. It owns a tokio runtime and spawns one
/// task per queued run; the thread exits when the UI drops its sender.
pub fn launch(dispatcher: Dispatcher, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            tracing::info!("backend worker ready");
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Run { run_id, request } => {
                        tokio::spawn(run_and_report(
                            dispatcher.clone(),
                            run_id,
                            request,
                            ui_tx.clone(),
                        ));
                    }
                }
            }
            tracing::info!("ui command channel closed; backend worker stopping");
        });
    });
}

async fn run_and_report(
    dispatcher: Dispatcher,
    run_id: u64,
    request: RunRequest,
    ui_tx: Sender<UiEvent>,
) {
    let progress_tx = ui_tx.clone();
    let task = tokio::spawn(async move {
        dispatcher
            .execute(&request, |progress| {
                report_progress(&progress_tx, UiEvent::Progress { run_id, progress });
            })
            .await
    });

    // A panicking transform still has to hand the run control back.
    let outcome = match task.await {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::error!(run_id, error = %err, "run task aborted");
            Err(RunError::Unexpected(None))
        }
    };
    if let Err(err) = &outcome {
        tracing::debug!(run_id, error = %err, "run finished with error");
    }
    report_finished(ui_tx, run_id, outcome).await;
}

/// Progress is advisory: a full queue drops the event instead of stalling the run.
fn report_progress(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(?event, "ui event queue full; dropped progress");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::debug!("ui closed; dropped progress");
            false
        }
    }
}

/// The final event unlocks the run control, so it waits for queue space on a
/// blocking thread rather than on a runtime worker.
async fn report_finished(
    ui_tx: Sender<UiEvent>,
    run_id: u64,
    outcome: Result<Option<String>, RunError>,
) -> bool {
    let sent = tokio::task::spawn_blocking(move || {
        ui_tx.send(UiEvent::RunFinished { run_id, outcome }).is_ok()
    })
    .await;
    match sent {
        Ok(true) => true,
        Ok(false) => {
            tracing::debug!(run_id, "ui closed before run finished");
            false
        }
        Err(err) => {
            tracing::error!(run_id, error = %err, "run result delivery aborted");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use shared::protocol::RunProgress;

    fn progress(run_id: u64) -> UiEvent {
        UiEvent::Progress {
            run_id,
            progress: RunProgress::LoadingRuntime,
        }
    }

    #[test]
    fn progress_is_dropped_when_the_queue_is_full() {
        let (ui_tx, ui_rx) = bounded(1);
        assert!(report_progress(&ui_tx, progress(1)));
        assert!(!report_progress(&ui_tx, progress(2)));

        assert!(matches!(ui_rx.try_recv(), Ok(UiEvent::Progress { run_id: 1, .. })));
        assert!(ui_rx.try_recv().is_err());

        drop(ui_rx);
        assert!(!report_progress(&ui_tx, progress(3)));
    }

    #[tokio::test]
    async fn run_result_waits_for_queue_space() {
        let (ui_tx, ui_rx) = bounded(1);
        assert!(report_progress(&ui_tx, progress(7)));

        let delivery = tokio::spawn(report_finished(ui_tx, 7, Ok(Some("done".into()))));
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!delivery.is_finished());

        assert!(matches!(ui_rx.recv(), Ok(UiEvent::Progress { run_id: 7, .. })));
        assert!(delivery.await.expect("join"));
        match ui_rx.recv() {
            Ok(UiEvent::RunFinished { run_id, outcome }) => {
                assert_eq!(run_id, 7);
                assert_eq!(outcome, Ok(Some("done".to_string())));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn run_result_for_a_closed_ui_is_dropped() {
        let (ui_tx, ui_rx) = bounded(1);
        drop(ui_rx);
        assert!(!report_finished(ui_tx, 1, Err(RunError::Initialization)).await);
    }
}
