//! Greedy token-bounded chunk combining.
//!
//! Regroups segments into the fewest chunks whose token count stays within a
//! budget, in one left-to-right pass that never reorders anything.
//!
//! ## The Algorithm
//!
//! ```text
//! max_tokens = 6 (chars), delimiter = "."
//! segments:  ["ab", "cd", "efghijkl", "e", "f"]
//!
//! "ab"        -> candidate "ab"          (2)
//! "cd"        -> candidate "ab.cd"       (5)
//! "efghijkl"  -> alone is 8 > 6: dropped, never starts a candidate
//! "e"         -> "ab.cd.e" is 7 > 6: emit "ab.cd", candidate "e"
//! "f"         -> candidate "e.f"         (3)
//! end         -> emit "e.f"
//! ```
//!
//! A segment that fits on its own but not in the running candidate closes
//! the candidate. Only a segment that cannot fit even in an empty candidate
//! is dropped. With [`OverflowPolicy::Ellipsis`] the candidate preceding a
//! dropped segment gains a `"..."` marker when the marker itself still fits.
//!
//! ## Headers
//!
//! A header is prepended to every candidate, counts toward the budget, and
//! is never recorded in a chunk's segment indices. A candidate holding only
//! the header is never emitted.
//!
//! ## Cost
//!
//! Tokenizers are not additive, so the full candidate text is re-counted for
//! every segment: O(n²) token-counter work per pass. The candidate text is
//! built in place and rolled back on rejection, so nothing is re-joined.

use tracing::{debug, warn};

use crate::{segment, Chunk, ChunkSet, Error, Result, TokenCounter};

/// Marker appended to a candidate when a following segment is dropped.
pub const ELLIPSIS: &str = "...";

/// What to do when a segment cannot fit in any chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Skip the segment silently (apart from the warning event).
    #[default]
    Drop,
    /// Skip the segment and mark the gap with [`ELLIPSIS`] when it fits.
    Ellipsis,
}

/// Greedy combiner of segments into token-bounded chunks.
///
/// ## Example
///
/// ```rust
/// use condense::{CharCounter, Combiner, OverflowPolicy};
///
/// let combiner = Combiner::new(10, "|")
///     .unwrap()
///     .with_overflow(OverflowPolicy::Ellipsis);
///
/// let set = combiner.combine(&["tiny", "far too long to ever fit", "ok"], &CharCounter::new());
///
/// let texts: Vec<_> = set.chunks.iter().map(|c| c.text.as_str()).collect();
/// assert_eq!(texts, ["tiny|...", "ok"]);
/// assert_eq!(set.dropped, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Combiner {
    max_tokens: usize,
    delimiter: String,
    header: Option<String>,
    overflow: OverflowPolicy,
}

impl Combiner {
    /// Create a combiner with a token budget and join delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] if `max_tokens == 0` and
    /// [`Error::EmptyDelimiter`] if `delimiter` is empty.
    pub fn new(max_tokens: usize, delimiter: impl Into<String>) -> Result<Self> {
        let delimiter = delimiter.into();
        if max_tokens == 0 {
            return Err(Error::InvalidChunkSize(max_tokens));
        }
        if delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        Ok(Self {
            max_tokens,
            delimiter,
            header: None,
            overflow: OverflowPolicy::default(),
        })
    }

    /// Prepend `header` to every chunk.
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Set the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// The token budget per chunk.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// The join delimiter.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Segment `text` on the delimiter and combine the segments.
    pub fn chunk<C>(&self, text: &str, counter: &C) -> ChunkSet
    where
        C: TokenCounter + ?Sized,
    {
        // The delimiter was validated in `new`.
        let segments: Vec<&str> = text.split(self.delimiter.as_str()).collect();
        self.combine(&segments, counter)
    }

    /// Combine `segments` into chunks of at most `max_tokens` tokens each.
    pub fn combine<C>(&self, segments: &[&str], counter: &C) -> ChunkSet
    where
        C: TokenCounter + ?Sized,
    {
        let header = self.header.as_deref();
        let mut candidate = Candidate::fresh(header, &self.delimiter);
        let mut chunks = Vec::new();
        let mut dropped = 0;
        let mut probe = String::new();

        for (i, &segment) in segments.iter().enumerate() {
            probe.clear();
            if let Some(header) = header {
                probe.push_str(header);
                probe.push_str(&self.delimiter);
            }
            probe.push_str(segment);
            let alone = counter.count(&probe);

            if !self.fits(alone) {
                warn!(
                    segment = i,
                    tokens = alone,
                    max_tokens = self.max_tokens,
                    "segment exceeds token budget, dropping it"
                );
                if self.overflow == OverflowPolicy::Ellipsis
                    && self.fits(candidate.count_with(ELLIPSIS, counter))
                {
                    candidate.push_marker(ELLIPSIS);
                }
                dropped += 1;
                continue;
            }

            // A fresh candidate plus this segment is exactly the probe.
            let extended = if candidate.is_fresh() {
                alone
            } else {
                candidate.count_with(segment, counter)
            };

            if !self.fits(extended) {
                let full = std::mem::replace(
                    &mut candidate,
                    Candidate::fresh(header, &self.delimiter),
                );
                chunks.push(full.into_chunk(chunks.len()));
            }
            candidate.push_segment(i, segment);
        }

        if candidate.has_content() {
            chunks.push(candidate.into_chunk(chunks.len()));
        }

        debug!(
            segments = segments.len(),
            chunks = chunks.len(),
            dropped,
            max_tokens = self.max_tokens,
            "combined segments"
        );

        ChunkSet { chunks, dropped }
    }

    /// `usize::MAX` marks text the counter could not measure and never fits,
    /// even under an unbounded budget.
    fn fits(&self, tokens: usize) -> bool {
        tokens != usize::MAX && tokens <= self.max_tokens
    }
}

/// An in-progress chunk. The joined text is kept up to date so probing an
/// extension only appends and truncates.
struct Candidate<'d> {
    text: String,
    parts: usize,
    base_parts: usize,
    indices: Vec<usize>,
    delimiter: &'d str,
}

impl<'d> Candidate<'d> {
    fn fresh(header: Option<&str>, delimiter: &'d str) -> Self {
        let base_parts = usize::from(header.is_some());
        Self {
            text: header.unwrap_or_default().to_owned(),
            parts: base_parts,
            base_parts,
            indices: Vec::new(),
            delimiter,
        }
    }

    fn is_fresh(&self) -> bool {
        self.parts == self.base_parts
    }

    fn has_content(&self) -> bool {
        self.parts > self.base_parts
    }

    fn append(&mut self, part: &str) {
        if self.parts > 0 {
            self.text.push_str(self.delimiter);
        }
        self.text.push_str(part);
        self.parts += 1;
    }

    fn push_segment(&mut self, index: usize, segment: &str) {
        self.append(segment);
        self.indices.push(index);
    }

    fn push_marker(&mut self, marker: &str) {
        self.append(marker);
    }

    /// Token count of the candidate with `part` appended, leaving it unchanged.
    fn count_with<C>(&mut self, part: &str, counter: &C) -> usize
    where
        C: TokenCounter + ?Sized,
    {
        let mark = self.text.len();
        let parts = self.parts;
        self.append(part);
        let tokens = counter.count(&self.text);
        self.text.truncate(mark);
        self.parts = parts;
        tokens
    }

    fn into_chunk(self, index: usize) -> Chunk {
        Chunk::new(self.text, self.indices, index)
    }
}

/// Split `text` on `delimiter` into chunks of at most `max_tokens` tokens.
///
/// Uses [`OverflowPolicy::Ellipsis`] and re-appends the delimiter to every
/// chunk, so the concatenated chunks approximate the document.
///
/// ```rust
/// use condense::{chunk_on_delimiter, WordCounter};
///
/// let chunks = chunk_on_delimiter("A. B. C.", 1, ".", &WordCounter).unwrap();
/// assert_eq!(chunks, ["A.", " B.", " C.."]);
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidChunkSize`] if `max_tokens == 0` and
/// [`Error::EmptyDelimiter`] if `delimiter` is empty.
pub fn chunk_on_delimiter<C>(
    text: &str,
    max_tokens: usize,
    delimiter: &str,
    counter: &C,
) -> Result<Vec<String>>
where
    C: TokenCounter + ?Sized,
{
    let combiner = Combiner::new(max_tokens, delimiter)?.with_overflow(OverflowPolicy::Ellipsis);
    let segments = segment(text, delimiter)?;
    let set = combiner.combine(&segments, counter);
    if set.dropped > 0 {
        warn!(
            dropped = set.dropped,
            max_tokens, "segments were dropped due to overflow"
        );
    }
    Ok(set.texts_with_suffix(delimiter))
}
