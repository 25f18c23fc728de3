//! Whole-buffer line splitting.

/// Split `text` on every `\n` and return each line without its terminator.
///
/// Splitting is purely physical: a `\n` inside a string literal or comment
/// still ends a line. A trailing terminator does not produce an empty last
/// line, and `\r` is kept as part of the line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for nl in memchr::memchr_iter(b'\n', text.as_bytes()) {
        lines.push(&text[start..nl]);
        start = nl + 1;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
