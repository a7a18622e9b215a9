//! Per-window state the controllers read and write: page, mode, inputs,
//! output, error and the busy flag of the run control.

use shared::{
    domain::{Mode, PageVariant},
    error::RunError,
    protocol::{RunProgress, RunRequest},
};

use crate::mode::ModeAffordances;

pub const LOADING_STATUS: &str = "Loading transforms...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    variant: Option<PageVariant>,
    mode: Mode,
    affordances: ModeAffordances,
    pub input: String,
    /// Raw shift field; validated only when a cipher run starts.
    pub shift: String,
    output: String,
    error: Option<String>,
    status: Option<String>,
    busy: bool,
    run_enabled: bool,
}

impl Session {
    pub fn new(variant: Option<PageVariant>) -> Self {
        let mode = Mode::default();
        Self {
            variant,
            mode,
            affordances: ModeAffordances::compute(variant, mode),
            input: String::new(),
            shift: "3".to_string(),
            output: String::new(),
            error: None,
            status: None,
            busy: false,
            run_enabled: true,
        }
    }

    pub fn variant(&self) -> Option<PageVariant> {
        self.variant
    }

    pub fn needs_runtime(&self) -> bool {
        self.variant.is_some()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Safe to call with the current mode; affordances are always recomputed.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.affordances = ModeAffordances::compute(self.variant, mode);
    }

    pub fn affordances(&self) -> ModeAffordances {
        self.affordances
    }

    pub fn placeholder(&self) -> &'static str {
        self.affordances.placeholder
    }

    /// Moves to another page; inputs and results belong to the old page.
    pub fn switch_page(&mut self, variant: Option<PageVariant>) {
        if self.variant == variant {
            return;
        }
        let mode = self.mode;
        *self = Self::new(variant);
        self.set_mode(mode);
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn run_enabled(&self) -> bool {
        self.run_enabled
    }

    /// Clears the previous error, locks the run control and snapshots the inputs.
    pub fn begin_run(&mut self) -> RunRequest {
        self.error = None;
        self.run_enabled = false;
        self.busy = true;
        RunRequest {
            variant: self.variant,
            mode: self.mode,
            text: self.input.clone(),
            shift: self.shift.clone(),
        }
    }

    pub fn show_progress(&mut self, progress: RunProgress) {
        self.status = match progress {
            RunProgress::LoadingRuntime => Some(LOADING_STATUS.to_string()),
            RunProgress::RuntimeReady => None,
        };
    }

    /// Writes either the output or the error, never both. A failed run
    /// leaves the previous output in place.
    pub fn finish_run(&mut self, outcome: Result<Option<String>, RunError>) {
        match outcome {
            Ok(Some(output)) => self.output = output,
            Ok(None) => {}
            Err(err) => self.error = Some(err.to_string()),
        }
        self.release_run();
    }

    pub fn release_run(&mut self) {
        self.status = None;
        self.busy = false;
        self.run_enabled = true;
    }

    pub fn clear(&mut self) {
        self.input.clear();
        self.output.clear();
        self.error = None;
        self.status = None;
    }

    /// Text the copy action should place on the clipboard, if any.
    pub fn copy_text(&self) -> Option<&str> {
        (!self.output.is_empty()).then_some(self.output.as_str())
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
