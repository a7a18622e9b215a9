use shared::domain::{Mode, PageVariant};

/// What the mode buttons and input field show for a page and mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeAffordances {
    pub encode_active: bool,
    pub decode_active: bool,
    pub placeholder: &'static str,
}

impl ModeAffordances {
    pub fn compute(variant: Option<PageVariant>, mode: Mode) -> Self {
        Self {
            encode_active: mode == Mode::Encode,
            decode_active: mode == Mode::Decode,
            placeholder: variant.map_or("", |variant| placeholder(variant, mode)),
        }
    }
}

pub fn placeholder(variant: PageVariant, mode: Mode) -> &'static str {
    match (variant, mode) {
        (PageVariant::Cipher, Mode::Encode) => "Type text to encrypt",
        (PageVariant::Cipher, Mode::Decode) => "Type text to decrypt",
        (PageVariant::Binary, Mode::Encode) => "e.g. Type text to binary",
        (PageVariant::Binary, Mode::Decode) => "e.g. Type binary to text",
        (PageVariant::Morse, Mode::Encode) => "e.g. Type text to morse",
        (PageVariant::Morse, Mode::Decode) => "e.g. Type morse to text",
    }
}

/// Validation message for a blank input on the given page.
pub fn blank_input_message(variant: PageVariant, mode: Mode) -> &'static str {
    match (variant, mode) {
        (PageVariant::Cipher, _) => "Enter some text to process.",
        (PageVariant::Binary, Mode::Encode) => "Type text to convert to binary.",
        (PageVariant::Binary, Mode::Decode) => "Type binary (8-bit blocks) to decode.",
        (PageVariant::Morse, Mode::Encode) => "Type text to convert to Morse.",
        (PageVariant::Morse, Mode::Decode) => "Type Morse code to decode.",
    }
}
