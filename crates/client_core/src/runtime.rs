//! The transform runtime: a host that can be installed and instantiated, a
//! runtime instance that evaluates a transform module, and function handles
//! that must be released after every call.

use std::{
    collections::HashMap,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, PoisonError, RwLock,
    },
};

use async_trait::async_trait;
use serde::Deserialize;
use shared::{domain::Mode, protocol::TransformFn};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeValue {
    Nil,
    Text(String),
    Integer(i64),
}

impl RuntimeValue {
    /// Nil renders as the empty string, everything else via its own form.
    pub fn into_display_string(self) -> String {
        match self {
            RuntimeValue::Nil => String::new(),
            RuntimeValue::Text(text) => text,
            RuntimeValue::Integer(value) => value.to_string(),
        }
    }
}

impl From<&str> for RuntimeValue {
    fn from(value: &str) -> Self {
        RuntimeValue::Text(value.to_string())
    }
}

impl From<String> for RuntimeValue {
    fn from(value: String) -> Self {
        RuntimeValue::Text(value)
    }
}

impl From<i64> for RuntimeValue {
    fn from(value: i64) -> Self {
        RuntimeValue::Integer(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("transform runtime unavailable: {0}")]
    HostUnavailable(String),
    #[error("transform module is malformed: {0}")]
    InvalidModule(String),
    #[error("transform module exports unknown transform `{0}`")]
    UnknownExport(String),
    #[error("transform `{0}` is not exported by the loaded module")]
    NotExported(String),
    #[error("transform `{name}` expects {expected}")]
    BadArguments {
        name: &'static str,
        expected: &'static str,
    },
}

pub type NativeFn = Arc<dyn Fn(&[RuntimeValue]) -> Result<RuntimeValue, RuntimeError> + Send + Sync>;

/// A callable obtained from a runtime. Counts as a live runtime resource
/// until released or dropped.
pub struct FunctionHandle {
    name: String,
    func: NativeFn,
    live: Arc<AtomicUsize>,
}

impl FunctionHandle {
    pub fn new(name: impl Into<String>, func: NativeFn, live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self {
            name: name.into(),
            func,
            live,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[RuntimeValue]) -> Result<RuntimeValue, RuntimeError> {
        (self.func)(args)
    }

    pub fn release(self) {
        drop(self);
    }
}

impl Drop for FunctionHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl fmt::Debug for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionHandle")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait TransformRuntime: Send + Sync {
    /// Evaluates module source, making its exports callable.
    async fn evaluate(&self, source: &str) -> Result<(), RuntimeError>;
    fn get(&self, name: &str) -> Result<FunctionHandle, RuntimeError>;
    fn live_handles(&self) -> usize;
}

#[async_trait]
pub trait RuntimeHost: Send + Sync {
    fn is_installed(&self) -> bool;
    async fn install(&self) -> Result<(), RuntimeError>;
    async fn instantiate(&self) -> Result<Arc<dyn TransformRuntime>, RuntimeError>;
}

/// Host for the runtime compiled into this binary; always installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHost;

#[async_trait]
impl RuntimeHost for NativeHost {
    fn is_installed(&self) -> bool {
        true
    }

    async fn install(&self) -> Result<(), RuntimeError> {
        Ok(())
    }

    async fn instantiate(&self) -> Result<Arc<dyn TransformRuntime>, RuntimeError> {
        Ok(Arc::new(NativeRuntime::new()))
    }
}

#[derive(Debug, Deserialize)]
struct ModuleManifest {
    name: String,
    #[serde(default)]
    version: Option<String>,
    exports: Vec<String>,
}

/// Runtime whose exports bind to the `transforms` crate.
#[derive(Default)]
pub struct NativeRuntime {
    exports: RwLock<HashMap<String, NativeFn>>,
    live: Arc<AtomicUsize>,
}

impl NativeRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransformRuntime for NativeRuntime {
    async fn evaluate(&self, source: &str) -> Result<(), RuntimeError> {
        let manifest: ModuleManifest =
            toml::from_str(source).map_err(|err| RuntimeError::InvalidModule(err.to_string()))?;
        if manifest.exports.is_empty() {
            return Err(RuntimeError::InvalidModule(format!(
                "module `{}` exports nothing",
                manifest.name
            )));
        }

        let mut bound = HashMap::with_capacity(manifest.exports.len());
        for name in &manifest.exports {
            let function = TransformFn::from_export_name(name)
                .ok_or_else(|| RuntimeError::UnknownExport(name.clone()))?;
            bound.insert(name.clone(), native_binding(function));
        }

        info!(
            module = %manifest.name,
            version = manifest.version.as_deref().unwrap_or("unversioned"),
            exports = bound.len(),
            "evaluated transform module"
        );
        self.exports
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(bound);
        Ok(())
    }

    fn get(&self, name: &str) -> Result<FunctionHandle, RuntimeError> {
        let exports = self.exports.read().unwrap_or_else(PoisonError::into_inner);
        let func = exports
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::NotExported(name.to_string()))?;
        debug!(transform = name, "acquired function handle");
        Ok(FunctionHandle::new(name, func, Arc::clone(&self.live)))
    }

    fn live_handles(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

fn native_binding(function: TransformFn) -> NativeFn {
    match function {
        TransformFn::Caesar => Arc::new(|args: &[RuntimeValue]| {
            let [text, shift, direction] = args else {
                return Err(RuntimeError::BadArguments {
                    name: "caesar",
                    expected: "(text, shift, direction)",
                });
            };
            let text = text_arg(text);
            let shift = match shift {
                RuntimeValue::Integer(value) => *value,
                RuntimeValue::Text(raw) => raw.trim().parse().unwrap_or(0),
                RuntimeValue::Nil => 0,
            };
            let mode = if text_arg(direction).eq_ignore_ascii_case("decode") {
                Mode::Decode
            } else {
                Mode::Encode
            };
            Ok(RuntimeValue::Text(transforms::caesar(&text, shift, mode)))
        }),
        TransformFn::TextToBinary => unary("text_to_binary", transforms::text_to_binary),
        TransformFn::BinaryToText => unary("binary_to_text", transforms::binary_to_text),
        TransformFn::TextToMorse => unary("text_to_morse", transforms::text_to_morse),
        TransformFn::MorseToText => unary("morse_to_text", transforms::morse_to_text),
    }
}

fn unary(name: &'static str, transform: fn(&str) -> String) -> NativeFn {
    Arc::new(move |args: &[RuntimeValue]| match args {
        [RuntimeValue::Nil] => Ok(RuntimeValue::Text(String::new())),
        [value] => Ok(RuntimeValue::Text(transform(&text_arg(value)))),
        _ => Err(RuntimeError::BadArguments {
            name,
            expected: "(text)",
        }),
    })
}

fn text_arg(value: &RuntimeValue) -> String {
    match value {
        RuntimeValue::Nil => String::new(),
        RuntimeValue::Text(text) => text.clone(),
        RuntimeValue::Integer(value) => value.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
