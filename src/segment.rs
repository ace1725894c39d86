//! Splitting text into atomic segments.

use crate::{Error, Result};

/// Split `text` on every occurrence of `delimiter`.
///
/// A pure split: nothing is trimmed or filtered, so empty segments survive
/// and joining the result with `delimiter` gives back `text` exactly. If the
/// delimiter never occurs, the whole text is a single segment.
///
/// ```rust
/// let segments = condense::segment("A. B. C.", ".").unwrap();
/// assert_eq!(segments, ["A", " B", " C", ""]);
/// assert_eq!(segments.join("."), "A. B. C.");
/// ```
///
/// # Errors
///
/// Returns [`Error::EmptyDelimiter`] if `delimiter` is empty.
pub fn segment<'a>(text: &'a str, delimiter: &str) -> Result<Vec<&'a str>> {
    if delimiter.is_empty() {
        return Err(Error::EmptyDelimiter);
    }
    Ok(text.split(delimiter).collect())
}
