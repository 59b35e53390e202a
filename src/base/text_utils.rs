//! Text comparison helpers for characterization checks.

use std::borrow::Cow;

/// Rewrite `\r\n` and lone `\r` line endings as `\n`.
///
/// Borrows when the text already uses `\n` only.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Compare two texts, ignoring line-ending style only.
///
/// Whitespace, case and trailing newlines are all significant.
///
/// # Example
/// ```
/// use crossport::base::text_utils::eq_ignoring_line_endings;
///
/// assert!(eq_ignoring_line_endings("a\r\nb", "a\nb"));
/// assert!(!eq_ignoring_line_endings("a \nb", "a\nb"));
/// ```
pub fn eq_ignoring_line_endings(a: &str, b: &str) -> bool {
    normalize_line_endings(a) == normalize_line_endings(b)
}
