//! Mapping a detail level to a chunk size.
//!
//! ## The Problem
//!
//! Summarizing a whole document in one call yields a fixed-length summary no
//! matter how long the input is. Summarizing it in many smaller pieces and
//! joining the results yields a summary whose length grows with the number
//! of pieces. The number of pieces is therefore the knob for detail.
//!
//! ## The Mapping
//!
//! `detail` interpolates linearly between one chunk and the most chunks the
//! document can be cut into at `minimum_chunk_size`:
//!
//! ```text
//! max_chunks    = chunks produced at minimum_chunk_size
//! target_chunks = floor(1 + detail * (max_chunks - 1))
//! chunk_size    = max(minimum_chunk_size, document_tokens / target_chunks)
//! ```
//!
//! The document is then chunked again at `chunk_size`. Raising `detail`
//! never lowers `target_chunks` nor raises `chunk_size`, so the realized
//! chunk count is non-decreasing in `detail`. It is not strictly increasing:
//! flooring can map nearby detail values to the same count.

use tracing::{debug, warn};

use crate::{segment, Combiner, Error, OverflowPolicy, Result, TokenCounter};

/// A summary detail level in `[0, 1]`.
///
/// `0` asks for as few chunks as possible (one, for most documents), `1`
/// for as many as `minimum_chunk_size` allows.
///
/// ```rust
/// use condense::Detail;
///
/// let detail = Detail::new(0.5).unwrap();
/// assert_eq!(detail.target_chunks(11), 6);
///
/// assert!(Detail::new(1.5).is_err());
/// assert!(Detail::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Detail(f64);

impl Detail {
    /// Fewest chunks.
    pub const MIN: Self = Self(0.0);
    /// Most chunks.
    pub const MAX: Self = Self(1.0);

    /// Validate a detail level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDetail`] if `value` is outside `0.0..=1.0`
    /// or NaN.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidDetail(value))
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Number of chunks to aim for, given the most the document allows.
    ///
    /// Always at least 1, even if `max_chunks` is 0.
    #[must_use]
    pub fn target_chunks(self, max_chunks: usize) -> usize {
        let min_chunks = 1;
        let max_chunks = max_chunks.max(min_chunks);
        let span = (max_chunks - min_chunks) as f64;
        (min_chunks as f64 + self.0 * span).floor() as usize
    }
}

impl TryFrom<f64> for Detail {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Detail> for f64 {
    fn from(detail: Detail) -> Self {
        detail.0
    }
}

/// Chunking resolved for one document at one detail level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Token budget used for the final chunking.
    pub chunk_size: usize,
    /// Chunks the document yields at `minimum_chunk_size`.
    pub max_chunks: usize,
    /// Chunk count the detail level asked for.
    pub target_chunks: usize,
    /// Token count of the whole document.
    pub document_tokens: usize,
    /// Segments left out of the final chunks because they alone exceed
    /// `chunk_size`. Each gap is marked with an ellipsis where it fits.
    pub dropped: usize,
    /// Final chunk texts, each with the delimiter re-appended.
    pub chunks: Vec<String>,
}

/// Chunk `text` at the granularity requested by `detail`.
///
/// Segments the document once and combines it twice: at
/// `minimum_chunk_size` to learn how many chunks it can yield, then at the
/// derived chunk size. Both passes mark dropped segments with an ellipsis.
///
/// ```rust
/// use condense::{resolve_chunking, Detail, WordCounter};
///
/// let coarse = resolve_chunking("A. B. C.", Detail::MIN, 500, ".", &WordCounter).unwrap();
/// assert_eq!(coarse.chunks.len(), 1);
///
/// let fine = resolve_chunking("A. B. C.", Detail::MAX, 1, ".", &WordCounter).unwrap();
/// assert_eq!(fine.chunks.len(), 3);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidChunkSize`] if `minimum_chunk_size == 0` and
/// [`Error::EmptyDelimiter`] if `delimiter` is empty, before any chunking.
pub fn resolve_chunking<C>(
    text: &str,
    detail: Detail,
    minimum_chunk_size: usize,
    delimiter: &str,
    counter: &C,
) -> Result<Resolution>
where
    C: TokenCounter + ?Sized,
{
    // Validates both arguments before the counter is consulted.
    let fine =
        Combiner::new(minimum_chunk_size, delimiter)?.with_overflow(OverflowPolicy::Ellipsis);
    let segments = segment(text, delimiter)?;

    let max_chunks = fine.combine(&segments, counter).len();
    let target_chunks = detail.target_chunks(max_chunks);
    let document_tokens = counter.count(text);
    let chunk_size = minimum_chunk_size.max(document_tokens / target_chunks);

    debug!(
        detail = detail.get(),
        max_chunks,
        target_chunks,
        document_tokens,
        chunk_size,
        "resolved chunk size"
    );

    let set = Combiner::new(chunk_size, delimiter)?
        .with_overflow(OverflowPolicy::Ellipsis)
        .combine(&segments, counter);
    if set.dropped > 0 {
        warn!(
            dropped = set.dropped,
            chunk_size, "segments were dropped due to overflow"
        );
    }

    Ok(Resolution {
        chunk_size,
        max_chunks,
        target_chunks,
        document_tokens,
        dropped: set.dropped,
        chunks: set.texts_with_suffix(delimiter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CharCounter, WordCounter};

    #[test]
    fn test_target_chunks_interpolates() {
        assert_eq!(Detail::MIN.target_chunks(10), 1);
        assert_eq!(Detail::MAX.target_chunks(10), 10);
        assert_eq!(Detail::new(0.5).unwrap().target_chunks(10), 5);
        assert_eq!(Detail::new(0.99).unwrap().target_chunks(10), 9);
    }

    #[test]
    fn test_target_chunks_never_zero() {
        assert_eq!(Detail::MAX.target_chunks(0), 1);
        assert_eq!(Detail::MIN.target_chunks(0), 1);
    }

    #[test]
    fn test_detail_range() {
        assert!(Detail::new(0.0).is_ok());
        assert!(Detail::new(1.0).is_ok());
        assert!(matches!(Detail::new(-0.1), Err(Error::InvalidDetail(_))));
        assert!(matches!(Detail::try_from(1.01), Err(Error::InvalidDetail(_))));
    }

    #[test]
    fn test_short_document_single_chunk() {
        let res = resolve_chunking("A. B. C.", Detail::MIN, 500, ".", &WordCounter).unwrap();
        assert_eq!(res.max_chunks, 1);
        assert_eq!(res.target_chunks, 1);
        assert_eq!(res.chunk_size, 500);
        assert_eq!(res.chunks, ["A. B. C.."]);
    }

    #[test]
    fn test_full_detail_one_sentence_per_chunk() {
        let res = resolve_chunking("A. B. C.", Detail::MAX, 1, ".", &WordCounter).unwrap();
        assert_eq!(res.max_chunks, 3);
        assert_eq!(res.target_chunks, 3);
        assert_eq!(res.chunk_size, 1);
        assert_eq!(res.chunks, ["A.", " B.", " C.."]);
    }

    #[test]
    fn test_chunk_size_from_document_tokens() {
        let text = "aaaaaaaaa.bbbbbbbbb.ccccccccc.ddddddddd.";
        let counter = CharCounter::new();

        let coarse = resolve_chunking(text, Detail::MIN, 10, ".", &counter).unwrap();
        assert_eq!(coarse.max_chunks, 4);
        assert_eq!(coarse.document_tokens, 40);
        assert_eq!(coarse.chunk_size, 40);
        assert_eq!(coarse.chunks.len(), 1);

        let fine = resolve_chunking(text, Detail::MAX, 10, ".", &counter).unwrap();
        assert_eq!(fine.chunk_size, 10);
        assert_eq!(fine.chunks.len(), 4);
    }

    #[test]
    fn test_minimum_chunk_size_is_a_floor() {
        let text = "aaaaaaaaa.bbbbbbbbb.ccccccccc.ddddddddd.";
        // Two chunks at the minimum, and 40 / 2 = 20 would undercut it
        let res = resolve_chunking(text, Detail::MAX, 25, ".", &CharCounter::new()).unwrap();
        assert_eq!(res.chunk_size, 25);
    }

    #[test]
    fn test_dropped_segments_reported() {
        let text = "aaaaaaaaaaaaaaaaaaaa.b.c.";
        let res = resolve_chunking(text, Detail::MAX, 5, ".", &CharCounter::new()).unwrap();

        // At 5: "....b" and "c." after the long segment is dropped
        assert_eq!(res.max_chunks, 2);
        assert_eq!(res.document_tokens, 25);
        assert_eq!(res.chunk_size, 12);
        assert_eq!(res.chunks, ["....b.c.."]);
        assert_eq!(res.dropped, 1);

        let clean = resolve_chunking("A. B. C.", Detail::MAX, 1, ".", &WordCounter).unwrap();
        assert_eq!(clean.dropped, 0);
    }

    #[test]
    fn test_rejects_bad_config_before_chunking() {
        let calls = std::sync::atomic::AtomicUsize::new(0);
        let counter = |text: &str| {
            calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            text.len()
        };

        assert!(matches!(
            resolve_chunking("text", Detail::MIN, 0, ".", &counter),
            Err(Error::InvalidChunkSize(0))
        ));
        assert!(matches!(
            resolve_chunking("text", Detail::MIN, 10, "", &counter),
            Err(Error::EmptyDelimiter)
        ));
        assert_eq!(calls.load(std::sync::atomic::Ordering::Relaxed), 0);
    }
}
