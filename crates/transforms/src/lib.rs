//! Reversible text transforms: Caesar shift, text/binary, text/Morse.
//!
//! Every function here is total. Input that cannot be transformed is skipped
//! rather than reported, so callers only ever validate blankness and shift.

mod binary;
mod caesar;
mod morse;

pub use binary::{binary_to_text, text_to_binary};
pub use caesar::caesar;
pub use morse::{morse_to_text, text_to_morse, MORSE_TABLE};
