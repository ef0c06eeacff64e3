//! Byte-level scanning helpers for rule text.
//!
//! Every keyword the grammar cares about is ASCII, so the scanners walk bytes
//! and only ever cut the input next to an ASCII byte. Slices handed back are
//! always on `char` boundaries.

use crate::types::is_numeric;

/// Scanner state while splitting a condition list on `and`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    /// Inside `(...)`, with the current nesting depth.
    InParen(usize),
    /// After `between`, waiting for the `and` that closes the range.
    InBetween,
}

/// Byte offset of the first comma outside parentheses.
pub(crate) fn find_separator(text: &str) -> Option<usize> {
    let mut depth: isize = 0;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b',' if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split the condition half of a rule on its top-level `and` conjunctions.
///
/// The `and` inside `between X and Y` and anything inside parentheses stay
/// part of the current clause. A `between` range ends once the token after
/// its `and` is numeric. Returned clauses are trimmed and non-empty.
pub(crate) fn split_conditions(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut state = ScanState::Default;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                state = match state {
                    ScanState::InParen(depth) => ScanState::InParen(depth + 1),
                    _ => ScanState::InParen(1),
                };
                i += 1;
                continue;
            }
            b')' => {
                state = match state {
                    ScanState::InParen(1) => ScanState::Default,
                    ScanState::InParen(depth) => ScanState::InParen(depth - 1),
                    other => other,
                };
                i += 1;
                continue;
            }
            _ => {}
        }

        if !matches!(state, ScanState::InParen(_)) {
            if is_word_at(bytes, i, b"between") {
                state = ScanState::InBetween;
                i += b"between".len();
                continue;
            }
            if is_conjunction_at(bytes, i) {
                let after = i + CONJUNCTION_LEN;
                if state == ScanState::InBetween {
                    if next_token(&text[after..]).is_some_and(is_numeric) {
                        state = ScanState::Default;
                    }
                } else {
                    push_trimmed(&mut parts, &text[start..i]);
                    start = after;
                }
                i = after;
                continue;
            }
        }

        i += 1;
    }

    push_trimmed(&mut parts, &text[start..]);
    parts
}

/// Split the action half of a rule on every whitespace-delimited `and`.
pub(crate) fn split_actions(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            let word = skip_whitespace(bytes, i);
            let word_end = word + 3;
            if word_end < bytes.len()
                && bytes[word..word_end].eq_ignore_ascii_case(b"and")
                && bytes[word_end].is_ascii_whitespace()
            {
                push_trimmed(&mut parts, &text[start..i]);
                start = skip_whitespace(bytes, word_end);
                i = start;
                continue;
            }
            i = word.max(i + 1);
            continue;
        }
        i += 1;
    }

    push_trimmed(&mut parts, &text[start..]);
    parts
}

/// Every way to split `text` around a whitespace-delimited `keyword`.
///
/// Yields `(left, right)` with surrounding whitespace trimmed, rightmost
/// occurrence first, so the longest candidate variable is tried first.
/// Matching ignores ASCII case.
pub(crate) fn keyword_splits<'a>(
    text: &'a str,
    keyword: &'static str,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    let bytes = text.as_bytes();
    let kw = keyword.as_bytes();
    (1..bytes.len()).rev().filter_map(move |i| {
        let end = i + kw.len();
        let matched = end < bytes.len()
            && bytes[i - 1].is_ascii_whitespace()
            && bytes[i..end].eq_ignore_ascii_case(kw)
            && bytes[end].is_ascii_whitespace();
        matched.then(|| (text[..i].trim_end(), text[end..].trim_start()))
    })
}

/// The first whitespace-delimited token of `text`.
pub(crate) fn next_token(text: &str) -> Option<&str> {
    text.split_ascii_whitespace().next()
}

/// `\s and \s`, exactly one whitespace byte either side.
const CONJUNCTION_LEN: usize = 5;

fn is_conjunction_at(bytes: &[u8], i: usize) -> bool {
    i + CONJUNCTION_LEN <= bytes.len()
        && bytes[i].is_ascii_whitespace()
        && bytes[i + 1..i + 4].eq_ignore_ascii_case(b"and")
        && bytes[i + 4].is_ascii_whitespace()
}

fn is_word_at(bytes: &[u8], i: usize, word: &[u8]) -> bool {
    let end = i + word.len();
    end <= bytes.len()
        && bytes[i..end].eq_ignore_ascii_case(word)
        && (i == 0 || !is_word_byte(bytes[i - 1]))
        && (end == bytes.len() || !is_word_byte(bytes[end]))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn push_trimmed<'a>(parts: &mut Vec<&'a str>, part: &'a str) {
    let part = part.trim();
    if !part.is_empty() {
        parts.push(part);
    }
}
