/// International Morse code for letters, digits and common punctuation.
pub const MORSE_TABLE: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

const LETTER_SEPARATOR: &str = " ";
const WORD_SEPARATOR: &str = " / ";
const TRIPLE_SPACE: &str = "   ";

fn encode_char(ch: char) -> Option<&'static str> {
    MORSE_TABLE
        .iter()
        .find(|(plain, _)| *plain == ch)
        .map(|(_, code)| *code)
}

fn decode_code(code: &str) -> Option<char> {
    MORSE_TABLE
        .iter()
        .find(|(_, candidate)| *candidate == code)
        .map(|(plain, _)| *plain)
}

/// Encodes text as Morse: letters separated by a space, words by ` / `.
/// Characters without a code are skipped; a word with none left still
/// occupies its slot as an empty word.
pub fn text_to_morse(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            word.chars()
                .flat_map(char::to_uppercase)
                .filter_map(encode_char)
                .collect::<Vec<_>>()
                .join(LETTER_SEPARATOR)
        })
        .collect::<Vec<_>>()
        .join(WORD_SEPARATOR)
}

/// Decodes Morse into upper-case text.
///
/// Whitespace runs collapse to a single space first, so only `/` separates
/// words. Padding `/` with spaces can leave a triple space between adjacent
/// slashes; that run counts as one more separator, which is how `/ /` yields
/// an empty word. Unknown codes decode to nothing.
pub fn morse_to_text(morse: &str) -> String {
    let collapsed = morse.split_whitespace().collect::<Vec<_>>().join(LETTER_SEPARATOR);
    let normalized = collapsed
        .replace('/', WORD_SEPARATOR)
        .replace(TRIPLE_SPACE, WORD_SEPARATOR);

    normalized
        .split(WORD_SEPARATOR)
        .filter(|word| !word.is_empty())
        .map(|word| word.split_whitespace().filter_map(decode_code).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_words_with_slash_separator() {
        assert_eq!(
            text_to_morse("Hello world"),
            ".... . .-.. .-.. --- / .-- --- .-. .-.. -.."
        );
    }

    #[test]
    fn skips_characters_without_a_code() {
        assert_eq!(text_to_morse("a#b"), ".- -...");
        assert_eq!(text_to_morse("   "), "");
        assert_eq!(text_to_morse("###"), "");
    }

    #[test]
    fn words_without_codes_stay_as_empty_words() {
        assert_eq!(text_to_morse("a ### b"), ".- /  / -...");
        assert_eq!(text_to_morse("ñ x"), " / -..-");
    }

    #[test]
    fn decodes_slash_separated_words() {
        assert_eq!(morse_to_text(".... .. / - .... . .-. ."), "HI THERE");
        assert_eq!(morse_to_text(".... ..//.-"), "HI A");
        assert_eq!(morse_to_text(".-///-..."), "A B");
        assert_eq!(morse_to_text(" / .- / "), "A");
    }

    #[test]
    fn spaces_alone_never_separate_words() {
        assert_eq!(morse_to_text("....  ..   -....-"), "HI-");
        assert_eq!(morse_to_text(".-  /  -..."), "A B");
    }

    #[test]
    fn spaced_double_slash_keeps_an_empty_word() {
        assert_eq!(morse_to_text(".- / / -..."), "A  B");
        assert_eq!(morse_to_text(&text_to_morse("a ### b")), "A  B");
    }

    #[test]
    fn unknown_codes_decode_to_nothing() {
        assert_eq!(morse_to_text("... ........ ..."), "SS");
        assert_eq!(morse_to_text("  "), "");
    }

    #[test]
    fn table_codes_are_unique() {
        for (index, (_, code)) in MORSE_TABLE.iter().enumerate() {
            assert!(
                MORSE_TABLE[index + 1..].iter().all(|(_, other)| other != code),
                "duplicate code {code}"
            );
        }
    }

    #[test]
    fn round_trip_upper_cases_and_normalizes_spacing() {
        let text = "SOS  at 10:30, ok?";
        assert_eq!(morse_to_text(&text_to_morse(text)), "SOS AT 10:30, OK?");
    }
}
