//! Lazy, single-flight bootstrap of the transform runtime.
//!
//! The first caller starts the initialization sequence (instantiate the
//! runtime, fetch the module source, evaluate it); every concurrent or later
//! caller awaits the same shared future instead of starting another one.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};

use futures::future::{BoxFuture, FutureExt, Shared};
use shared::error::RunError;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    module::{FetchError, ModuleSource},
    runtime::{RuntimeHost, TransformRuntime},
};

/// What happens to a memoized initialization that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The failure stays memoized; every later call reports it again.
    #[default]
    Sticky,
    /// The failed attempt is forgotten and the next call starts a new one.
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to construct transform runtime: {0}")]
    Instantiate(String),
    #[error("failed to evaluate transform module: {0}")]
    Evaluate(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    #[error("transform runtime could not be installed: {0}")]
    RuntimeLoad(String),
    #[error("transform module initialization failed: {0}")]
    Initialization(#[source] InitFailure),
}

impl From<BootstrapError> for RunError {
    fn from(value: BootstrapError) -> Self {
        match value {
            BootstrapError::RuntimeLoad(_) => RunError::RuntimeLoad,
            BootstrapError::Initialization(_) => RunError::Initialization,
        }
    }
}

type InitFuture = Shared<BoxFuture<'static, Result<Arc<dyn TransformRuntime>, InitFailure>>>;

struct InitSlot {
    attempt: u64,
    future: InitFuture,
}

pub struct Bootstrapper {
    needs_runtime: bool,
    host: Arc<dyn RuntimeHost>,
    source: Arc<dyn ModuleSource>,
    policy: FailurePolicy,
    slot: Mutex<Option<InitSlot>>,
    ready: Arc<AtomicBool>,
    attempts: AtomicU64,
}

impl Bootstrapper {
    pub fn new(
        needs_runtime: bool,
        host: Arc<dyn RuntimeHost>,
        source: Arc<dyn ModuleSource>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            needs_runtime,
            host,
            source,
            policy,
            slot: Mutex::new(None),
            ready: Arc::new(AtomicBool::new(false)),
            attempts: AtomicU64::new(0),
        }
    }

    pub fn needs_runtime(&self) -> bool {
        self.needs_runtime
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Number of initialization sequences started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub async fn ensure_ready(&self) -> Result<(), BootstrapError> {
        if !self.needs_runtime {
            return Ok(());
        }
        self.runtime().await.map(|_| ())
    }

    /// Awaits the memoized runtime, starting initialization if nobody has.
    pub async fn runtime(&self) -> Result<Arc<dyn TransformRuntime>, BootstrapError> {
        if !self.host.is_installed() {
            info!("transform runtime not installed; installing");
            self.host.install().await.map_err(|err| {
                warn!(error = %err, "transform runtime install failed");
                BootstrapError::RuntimeLoad(err.to_string())
            })?;
        }

        let (attempt, future) = self.initialization();
        match future.await {
            Ok(runtime) => Ok(runtime),
            Err(failure) => {
                error!(attempt, error = %failure, "transform runtime initialization failed");
                if self.policy == FailurePolicy::Retry {
                    self.forget_attempt(attempt);
                }
                Err(BootstrapError::Initialization(failure))
            }
        }
    }

    fn initialization(&self) -> (u64, InitFuture) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return (existing.attempt, existing.future.clone());
        }

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(attempt, module = %self.source.location(), "starting transform runtime initialization");
        let future = initialize(
            Arc::clone(&self.host),
            Arc::clone(&self.source),
            Arc::clone(&self.ready),
        )
        .boxed()
        .shared();
        *slot = Some(InitSlot {
            attempt,
            future: future.clone(),
        });
        (attempt, future)
    }

    fn forget_attempt(&self, attempt: u64) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|existing| existing.attempt == attempt) {
            *slot = None;
            info!(attempt, "cleared failed initialization; next run will retry");
        }
    }
}

async fn initialize(
    host: Arc<dyn RuntimeHost>,
    source: Arc<dyn ModuleSource>,
    ready: Arc<AtomicBool>,
) -> Result<Arc<dyn TransformRuntime>, InitFailure> {
    let runtime = host
        .instantiate()
        .await
        .map_err(|err| InitFailure::Instantiate(err.to_string()))?;
    let code = source.fetch().await?;
    runtime
        .evaluate(&code)
        .await
        .map_err(|err| InitFailure::Evaluate(err.to_string()))?;
    ready.store(true, Ordering::SeqCst);
    info!(module = %source.location(), "transform runtime ready");
    Ok(runtime)
}

#[cfg(test)]
#[path = "tests/bootstrap_tests.rs"]
mod tests;
