//! Controller core shared by the desktop window and the CLI: runtime
//! bootstrap, run dispatch, session/mode state, theme preference and config.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod mode;
pub mod module;
pub mod runtime;
pub mod session;
pub mod theme;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

pub use bootstrap::{BootstrapError, Bootstrapper, FailurePolicy, InitFailure};
pub use config::{load_settings, Settings};
pub use dispatch::Dispatcher;
pub use mode::ModeAffordances;
pub use module::{EmbeddedModule, FetchError, FileModule, HttpModule, ModuleSource};
pub use runtime::{
    FunctionHandle, NativeHost, NativeRuntime, RuntimeError, RuntimeHost, RuntimeValue,
    TransformRuntime,
};
pub use session::Session;
pub use theme::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, ThemeController,
};

/// Wires a dispatcher over the native runtime and the configured module source.
pub fn dispatcher_from_settings(settings: &Settings, needs_runtime: bool) -> Result<Dispatcher> {
    let source = module::source_from_settings(settings)?;
    info!(
        module = %source.location(),
        policy = ?settings.failure_policy(),
        needs_runtime,
        "configured transform dispatcher"
    );
    let bootstrapper = Bootstrapper::new(
        needs_runtime,
        Arc::new(NativeHost),
        source,
        settings.failure_policy(),
    );
    Ok(Dispatcher::new(Arc::new(bootstrapper)))
}
