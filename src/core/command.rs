//! # Command Classification
//!
//! Every submitted input line becomes a [`Command`]. The grammar is small:
//! an empty line is ignored, `exit` (any case) ends the session, and
//! `<receiver><separator><message>` sends a message, where the receiver is
//! 2–63 word characters optionally prefixed by the literal `pssst.`
//! namespace marker and the separator is one or more non-word characters.
//! Anything else is unknown and is surfaced to the user as an error line.
//!
//! Classification is an explicit tokenizer rather than a regex: split at the
//! first run of non-word characters, validate the receiver's length and
//! charset, and reject when no message remains after the separator.

/// Bounds on the receiver name length, in characters, excluding the
/// optional `pssst.` namespace prefix.
const RECEIVER_MIN: usize = 2;
const RECEIVER_MAX: usize = 63;

/// The literal namespace marker a receiver may carry.
const NAMESPACE: &str = "pssst.";

/// What a submitted input line means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input; ignored without touching the transcript.
    Empty,
    /// Terminate the session.
    Exit,
    /// Send `message` to `receiver`.
    Send { receiver: String, message: String },
    /// Anything that matches no other rule.
    Unknown,
}

/// Classifies one line of user input.
pub fn classify(line: &str) -> Command {
    let line = line.trim();

    if line.is_empty() {
        return Command::Empty;
    }
    if line.eq_ignore_ascii_case("exit") {
        return Command::Exit;
    }
    match split_send(line) {
        Some((receiver, message)) => Command::Send {
            receiver: receiver.to_string(),
            message: message.to_string(),
        },
        None => Command::Unknown,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits a line into `(receiver, message)` if it matches the send grammar.
///
/// The receiver keeps its `pssst.` prefix when present. Returns `None` when
/// the name fails validation, no separator follows it, or the separator run
/// consumes the entire remainder.
fn split_send(line: &str) -> Option<(&str, &str)> {
    let name_start = if line.starts_with(NAMESPACE) {
        NAMESPACE.len()
    } else {
        0
    };

    // Maximal run of word characters after the optional prefix.
    let rest = &line[name_start..];
    let mut name_chars = 0usize;
    let mut name_end = name_start;
    for (i, c) in rest.char_indices() {
        if !is_word_char(c) {
            break;
        }
        name_chars += 1;
        name_end = name_start + i + c.len_utf8();
    }
    if !(RECEIVER_MIN..=RECEIVER_MAX).contains(&name_chars) {
        return None;
    }

    // Separator: one or more non-word characters.
    let after = &line[name_end..];
    let mut sep_end = 0usize;
    for (i, c) in after.char_indices() {
        if is_word_char(c) {
            break;
        }
        sep_end = i + c.len_utf8();
    }
    if sep_end == 0 {
        return None;
    }

    let message = &after[sep_end..];
    if message.is_empty() {
        return None;
    }
    Some((&line[..name_end], message))
}
