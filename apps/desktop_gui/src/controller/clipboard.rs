//! Copy action: system clipboard first, egui's clipboard path as fallback.

use std::time::{Duration, Instant};

use arboard::Clipboard;
use eframe::egui;

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const COPIED_FEEDBACK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPath {
    System,
    Toolkit,
}

/// Never fails from the user's point of view; the fallback is egui's own
/// platform output.
pub fn copy_to_clipboard(ctx: &egui::Context, text: &str) -> CopyPath {
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_owned())) {
        Ok(()) => CopyPath::System,
        Err(err) => {
            tracing::debug!(error = %err, "system clipboard unavailable; using egui clipboard");
            ctx.copy_text(text.to_owned());
            CopyPath::Toolkit
        }
    }
}

/// Tracks the short-lived "Copied!" label on the copy button.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    /// Only a confirmed system clipboard write shows the confirmation.
    pub fn record(&mut self, path: CopyPath, now: Instant) {
        if path == CopyPath::System {
            self.mark(now);
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.remaining(now).is_some() {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Time until the label reverts, while the confirmation is showing.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let copied_at = self.copied_at?;
        COPIED_FEEDBACK
            .checked_sub(now.saturating_duration_since(copied_at))
            .filter(|left| !left.is_zero())
    }
}
