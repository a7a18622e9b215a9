use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    bootstrap::{Bootstrapper, FailurePolicy},
    module::{FetchError, ModuleSource, EMBEDDED_MODULE},
    runtime::{NativeRuntime, RuntimeError, RuntimeHost, TransformRuntime},
};

pub struct TestHost {
    installed: AtomicBool,
    install_fails: bool,
    install_calls: AtomicUsize,
    instantiate_calls: AtomicUsize,
    failing_instantiations: AtomicUsize,
    delay: Duration,
}

impl TestHost {
    pub fn installed() -> Self {
        Self {
            installed: AtomicBool::new(true),
            install_fails: false,
            install_calls: AtomicUsize::new(0),
            instantiate_calls: AtomicUsize::new(0),
            failing_instantiations: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    pub fn not_installed() -> Self {
        let host = Self::installed();
        host.installed.store(false, Ordering::SeqCst);
        host
    }

    pub fn blocked() -> Self {
        let mut host = Self::not_installed();
        host.install_fails = true;
        host
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_first(self, count: usize) -> Self {
        self.failing_instantiations.store(count, Ordering::SeqCst);
        self
    }

    pub fn install_calls(&self) -> usize {
        self.install_calls.load(Ordering::SeqCst)
    }

    pub fn instantiate_calls(&self) -> usize {
        self.instantiate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuntimeHost for TestHost {
    fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    async fn install(&self) -> Result<(), RuntimeError> {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
        if self.install_fails {
            return Err(RuntimeError::HostUnavailable("script blocked".into()));
        }
        self.installed.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn instantiate(&self) -> Result<Arc<dyn TransformRuntime>, RuntimeError> {
        self.instantiate_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let remaining_failures = self.failing_instantiations.load(Ordering::SeqCst);
        if remaining_failures > 0 {
            self.failing_instantiations
                .store(remaining_failures - 1, Ordering::SeqCst);
            return Err(RuntimeError::HostUnavailable("instance crashed".into()));
        }
        Ok(Arc::new(NativeRuntime::new()))
    }
}

pub struct StaticModule {
    source: Result<String, String>,
    fetches: AtomicUsize,
}

impl StaticModule {
    pub fn embedded() -> Self {
        Self::with_source(EMBEDDED_MODULE)
    }

    pub fn with_source(source: &str) -> Self {
        Self {
            source: Ok(source.to_string()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn unreachable(reason: &str) -> Self {
        Self {
            source: Err(reason.to_string()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleSource for StaticModule {
    fn location(&self) -> String {
        "test://transforms.toml".to_string()
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.source.clone().map_err(|reason| FetchError {
            location: self.location(),
            reason,
        })
    }
}

pub fn bootstrapper(
    host: &Arc<TestHost>,
    module: &Arc<StaticModule>,
    policy: FailurePolicy,
) -> Arc<Bootstrapper> {
    Arc::new(Bootstrapper::new(
        true,
        Arc::clone(host) as Arc<dyn RuntimeHost>,
        Arc::clone(module) as Arc<dyn ModuleSource>,
        policy,
    ))
}
