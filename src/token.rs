//! Token counting.
//!
//! Every size in this crate is measured in the model's token unit, and the
//! engine never tokenizes text itself: it asks a [`TokenCounter`]. The only
//! requirement is determinism. The same text must always produce the same
//! count within one invocation, otherwise chunk boundaries and the size
//! guarantee in [`Combiner`](crate::Combiner) no longer hold.
//!
//! ## Counters
//!
//! | Counter | Unit | Notes |
//! |---------|------|-------|
//! | [`CharCounter`] | chars (or chars / N) | Exact, cheap, good for tests |
//! | [`WordCounter`] | UAX #29 words | Close to English BPE counts |
//! | `Fn(&str) -> usize` | anything | Wrap any tokenizer in a closure |
//! | `tokenizers::Tokenizer` | BPE / WordPiece | Requires the `tokenizers` feature |
//!
//! Real tokenizers are not additive: `count(a + b)` is generally not
//! `count(a) + count(b)`. The combiner therefore always counts the full
//! candidate text.
//!
//! A counter that cannot measure some text returns `usize::MAX` for it.
//! That count never fits a budget, so the text is dropped as oversized
//! instead of slipping into a chunk for free.

use unicode_segmentation::UnicodeSegmentation;

/// Maps text to its length in tokens.
///
/// Implemented for any `Fn(&str) -> usize + Send + Sync`, so a tokenizer can
/// be plugged in with a closure:
///
/// ```rust
/// use condense::TokenCounter;
///
/// let bytes = |text: &str| text.len();
/// assert_eq!(bytes.count("hello"), 5);
/// ```
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`, or `usize::MAX` if it cannot be counted.
    fn count(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count(&self, text: &str) -> usize {
        self(text)
    }
}

/// Counts characters, optionally grouped into fixed-size tokens.
///
/// ```rust
/// use condense::{CharCounter, TokenCounter};
///
/// assert_eq!(CharCounter::new().count("héllo"), 5);
///
/// // Rough English estimate: ~4 chars per token, rounded up
/// assert_eq!(CharCounter::approximate(4).count("hello"), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCounter {
    chars_per_token: usize,
}

impl CharCounter {
    /// One token per Unicode scalar value.
    #[must_use]
    pub const fn new() -> Self {
        Self { chars_per_token: 1 }
    }

    /// One token per `chars_per_token` chars, rounded up.
    ///
    /// # Panics
    ///
    /// Panics if `chars_per_token == 0`.
    #[must_use]
    pub fn approximate(chars_per_token: usize) -> Self {
        assert!(chars_per_token > 0, "chars_per_token must be > 0");
        Self { chars_per_token }
    }
}

impl Default for CharCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for CharCounter {
    fn count(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token)
    }
}

/// Counts words using Unicode word boundaries (UAX #29).
///
/// Punctuation and whitespace are not words, so `"A. B."` counts 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn count(&self, text: &str) -> usize {
        text.unicode_words().count()
    }
}

#[cfg(feature = "tokenizers")]
impl TokenCounter for tokenizers::Tokenizer {
    /// Encodes without special tokens. Text the tokenizer rejects counts as
    /// `usize::MAX`, so it is never packed into a chunk.
    fn count(&self, text: &str) -> usize {
        match self.encode(text, false) {
            Ok(encoding) => encoding.len(),
            Err(err) => {
                tracing::warn!(
                    %err,
                    len = text.len(),
                    "tokenizer rejected text, treating it as oversized"
                );
                usize::MAX
            }
        }
    }
}
