use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Mode, PageVariant};

/// Names the module exports for each transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformFn {
    Caesar,
    TextToBinary,
    BinaryToText,
    TextToMorse,
    MorseToText,
}

impl TransformFn {
    pub const ALL: [TransformFn; 5] = [
        TransformFn::Caesar,
        TransformFn::TextToBinary,
        TransformFn::BinaryToText,
        TransformFn::TextToMorse,
        TransformFn::MorseToText,
    ];

    pub fn export_name(self) -> &'static str {
        match self {
            TransformFn::Caesar => "caesar",
            TransformFn::TextToBinary => "text_to_binary",
            TransformFn::BinaryToText => "binary_to_text",
            TransformFn::TextToMorse => "text_to_morse",
            TransformFn::MorseToText => "morse_to_text",
        }
    }

    pub fn from_export_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.export_name() == name)
    }

    /// Direction-specific transform for the binary and Morse pages.
    pub fn for_page(variant: PageVariant, mode: Mode) -> Self {
        match (variant, mode) {
            (PageVariant::Cipher, _) => TransformFn::Caesar,
            (PageVariant::Binary, Mode::Encode) => TransformFn::TextToBinary,
            (PageVariant::Binary, Mode::Decode) => TransformFn::BinaryToText,
            (PageVariant::Morse, Mode::Encode) => TransformFn::TextToMorse,
            (PageVariant::Morse, Mode::Decode) => TransformFn::MorseToText,
        }
    }
}

impl fmt::Display for TransformFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.export_name())
    }
}

/// Snapshot of the inputs one run works on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub variant: Option<PageVariant>,
    pub mode: Mode,
    pub text: String,
    /// Raw shift field contents; only read on the cipher page.
    pub shift: String,
}

impl RunRequest {
    pub fn new(variant: PageVariant, mode: Mode, text: impl Into<String>) -> Self {
        Self {
            variant: Some(variant),
            mode,
            text: text.into(),
            shift: String::new(),
        }
    }

    pub fn with_shift(mut self, shift: impl Into<String>) -> Self {
        self.shift = shift.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunProgress {
    LoadingRuntime,
    RuntimeReady,
}
