use std::sync::Arc;

use shared::{
    domain::{PageVariant, ShiftAmount},
    error::RunError,
    protocol::{RunProgress, RunRequest, TransformFn},
};
use tracing::{debug, warn};

use crate::{
    bootstrap::Bootstrapper,
    mode::blank_input_message,
    runtime::RuntimeValue,
    session::Session,
};

/// Carries one run request from the UI through bootstrap, validation and the
/// selected transform.
#[derive(Clone)]
pub struct Dispatcher {
    bootstrapper: Arc<Bootstrapper>,
}

impl Dispatcher {
    pub fn new(bootstrapper: Arc<Bootstrapper>) -> Self {
        Self { bootstrapper }
    }

    pub fn bootstrapper(&self) -> &Arc<Bootstrapper> {
        &self.bootstrapper
    }

    /// Runs `request` to completion. `Ok(None)` means the page has nothing to
    /// run; `progress` hears about runtime loading.
    pub async fn execute<P>(
        &self,
        request: &RunRequest,
        mut progress: P,
    ) -> Result<Option<String>, RunError>
    where
        P: FnMut(RunProgress) + Send,
    {
        if self.bootstrapper.needs_runtime() && !self.bootstrapper.is_ready() {
            progress(RunProgress::LoadingRuntime);
            let ready = self.bootstrapper.ensure_ready().await;
            progress(RunProgress::RuntimeReady);
            ready?;
        }

        let Some(variant) = request.variant else {
            return Ok(None);
        };

        let (function, args) = match variant {
            PageVariant::Cipher => {
                let shift = ShiftAmount::parse(&request.shift)?;
                require_text(request, variant)?;
                (
                    TransformFn::Caesar,
                    vec![
                        RuntimeValue::from(request.text.as_str()),
                        RuntimeValue::from(i64::from(shift.get())),
                        RuntimeValue::from(request.mode.as_str()),
                    ],
                )
            }
            PageVariant::Binary | PageVariant::Morse => {
                require_text(request, variant)?;
                (
                    TransformFn::for_page(variant, request.mode),
                    vec![RuntimeValue::from(request.text.as_str())],
                )
            }
        };

        self.invoke(function, &args).await.map(Some)
    }

    /// `execute` against a session, with the run control released on every
    /// exit path, including a dropped future.
    pub async fn run(&self, session: &mut Session) {
        let request = session.begin_run();
        let mut guard = RunGuard { session };
        let outcome = self
            .execute(&request, |progress| guard.session.show_progress(progress))
            .await;
        guard.session.finish_run(outcome);
    }

    async fn invoke(&self, function: TransformFn, args: &[RuntimeValue]) -> Result<String, RunError> {
        let runtime = self.bootstrapper.runtime().await?;
        let handle = runtime
            .get(function.export_name())
            .map_err(|err| RunError::Transform(err.to_string()))?;
        let result = handle.call(args);
        handle.release();

        match result {
            Ok(value) => {
                debug!(transform = %function, "transform completed");
                Ok(value.into_display_string())
            }
            Err(err) => {
                warn!(transform = %function, error = %err, "transform call failed");
                Err(RunError::Transform(err.to_string()))
            }
        }
    }
}

fn require_text(request: &RunRequest, variant: PageVariant) -> Result<(), RunError> {
    if request.text.trim().is_empty() {
        return Err(RunError::validation(blank_input_message(variant, request.mode)));
    }
    Ok(())
}

struct RunGuard<'a> {
    session: &'a mut Session,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.session.is_busy() {
            self.session.release_run();
        }
    }
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
