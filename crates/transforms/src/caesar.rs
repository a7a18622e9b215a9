use shared::domain::Mode;

const ALPHABET_LEN: i64 = 26;

/// Shifts ASCII letters by `shift` (taken mod 26), preserving case. Every
/// other character passes through unchanged. Decoding shifts the other way.
pub fn caesar(text: &str, shift: i64, mode: Mode) -> String {
    let mut offset = shift.rem_euclid(ALPHABET_LEN);
    if mode == Mode::Decode {
        offset = (ALPHABET_LEN - offset) % ALPHABET_LEN;
    }
    // offset < 26, fits in u8
    let offset = offset as u8;

    text.chars()
        .map(|ch| match ch {
            'A'..='Z' => rotate(ch, b'A', offset),
            'a'..='z' => rotate(ch, b'a', offset),
            _ => ch,
        })
        .collect()
}

fn rotate(ch: char, base: u8, offset: u8) -> char {
    let index = ch as u8 - base;
    char::from(base + (index + offset) % ALPHABET_LEN as u8)
}
