//! Fixed-width wrapping of inbound messages into display lines.
//!
//! Messages are split into chunks of at most `width` characters so that each
//! resulting line fits the terminal column count captured at startup. The
//! split is by `char`, not by byte: slicing UTF-8 text at byte offsets would
//! tear multi-byte characters apart. Concatenating the chunks in order
//! reproduces the original text exactly.

/// Splits `text` into chunks of at most `width` characters.
///
/// An empty message produces no lines; a message of length `L` produces
/// `ceil(L / width)` lines. A `width` of zero disables wrapping and returns
/// the text as a single line.
pub fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![text.to_string()];
    }

    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_line() {
        assert_eq!(wrap_columns("hello", 80), vec!["hello"]);
    }

    #[test]
    fn exact_width_is_a_single_line() {
        assert_eq!(wrap_columns("hello", 5), vec!["hello"]);
    }

    #[test]
    fn long_text_splits_into_ceil_len_over_width_lines() {
        // 11 chars at width 5 -> ceil(11/5) = 3 lines
        let lines = wrap_columns("hello world", 5);
        assert_eq!(lines, vec!["hello", " worl", "d"]);
    }

    #[test]
    fn empty_text_produces_no_lines() {
        assert!(wrap_columns("", 80).is_empty());
    }

    #[test]
    fn zero_width_returns_text_unwrapped() {
        assert_eq!(wrap_columns("abc", 0), vec!["abc"]);
    }

    #[test]
    fn concatenation_round_trips_exactly() {
        let text = "the quick brown fox jumps over the lazy dog";
        for width in 1..=text.len() + 1 {
            let joined: String = wrap_columns(text, width).concat();
            assert_eq!(joined, text, "width {width}");
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        // 6 chars, each 'é' is 2 bytes — byte slicing would panic here
        let lines = wrap_columns("éééééé", 4);
        assert_eq!(lines, vec!["éééé", "éé"]);
        assert_eq!(lines.concat(), "éééééé");
    }
}
