const BITS_PER_BYTE: usize = 8;

/// Encodes the UTF-8 bytes of `text` as space-separated 8-bit groups.
pub fn text_to_binary(text: &str) -> String {
    text.bytes()
        .map(|byte| format!("{byte:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes space-separated 8-bit groups, one char per group.
///
/// Characters other than `0`, `1` and the space are deleted before the input
/// is split, so a newline or tab joins its neighbours. Groups that are not
/// exactly eight bits long are dropped, including an unseparated bit string.
/// Each byte maps to the code point of the same value; multi-byte UTF-8 is
/// not reassembled.
pub fn binary_to_text(binary: &str) -> String {
    let filtered: String = binary
        .chars()
        .filter(|ch| matches!(ch, '0' | '1' | ' '))
        .collect();

    filtered
        .split(' ')
        .filter(|group| group.len() == BITS_PER_BYTE)
        .filter_map(|group| parse_byte(group.as_bytes()))
        .map(char::from)
        .collect()
}

fn parse_byte(bits: &[u8]) -> Option<u8> {
    bits.iter().try_fold(0u8, |acc, bit| match bit {
        b'0' => Some(acc << 1),
        b'1' => Some((acc << 1) | 1),
        _ => None,
    })
}
