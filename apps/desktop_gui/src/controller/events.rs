//! UI/backend events and error modeling for desktop GUI controller.

use shared::{
    error::{ErrorCode, RunError},
    protocol::RunProgress,
};

#[derive(Debug)]
pub enum UiEvent {
    Progress {
        run_id: u64,
        progress: RunProgress,
    },
    RunFinished {
        run_id: u64,
        outcome: Result<Option<String>, RunError>,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Runtime,
    Transform,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Run,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_run_error(err: &RunError) -> Self {
        let category = match err.code() {
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::RuntimeLoad | ErrorCode::Initialization => UiErrorCategory::Runtime,
            ErrorCode::Transform => UiErrorCategory::Transform,
            ErrorCode::Internal => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context: UiErrorContext::Run,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("backend")
            || lower.contains("disconnected")
            || lower.contains("queue")
        {
            UiErrorCategory::Backend
        } else if lower.contains("runtime") || lower.contains("module") {
            UiErrorCategory::Runtime
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Validation problems render inline next to the input, not as a banner.
    pub fn is_inline(&self) -> bool {
        self.category == UiErrorCategory::Validation
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Runtime => "Runtime",
        UiErrorCategory::Transform => "Transform",
        UiErrorCategory::Backend => "Backend",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
