//! The Chunk type: a token-bounded group of segments with traceability.

/// A finished chunk: consecutive segments rejoined with the delimiter.
///
/// `segments` lists the indices (into the segmenter's output) of the
/// segments this chunk covers. The header and the `"..."` overflow marker
/// are part of `text` but never appear in `segments`.
///
/// ```rust
/// use condense::Chunk;
///
/// let chunk = Chunk::new("A. B", vec![0, 1], 0);
/// assert_eq!(chunk.segments, [0, 1]);
/// assert_eq!(chunk.to_string(), "Chunk { index: 0, segments: 0..=1, len: 4 }");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Delimiter-joined text, without a trailing delimiter.
    pub text: String,
    /// Indices of the original segments placed in this chunk, ascending.
    pub segments: Vec<usize>,
    /// Zero-based index of this chunk in the sequence.
    pub index: usize,
}

impl Chunk {
    /// Create a new chunk.
    #[must_use]
    pub fn new(text: impl Into<String>, segments: Vec<usize>, index: usize) -> Self {
        Self {
            text: text.into(),
            segments,
            index,
        }
    }

    /// The length of this chunk in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this chunk's text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.segments.first(), self.segments.last()) {
            (Some(first), Some(last)) => write!(
                f,
                "Chunk {{ index: {}, segments: {}..={}, len: {} }}",
                self.index,
                first,
                last,
                self.len()
            ),
            _ => write!(
                f,
                "Chunk {{ index: {}, segments: none, len: {} }}",
                self.index,
                self.len()
            ),
        }
    }
}

/// Output of one [`Combiner::combine`](crate::Combiner::combine) pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSet {
    /// Chunks in emission (document) order.
    pub chunks: Vec<Chunk>,
    /// Segments too large to fit any chunk, and therefore discarded.
    pub dropped: usize,
}

impl ChunkSet {
    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk texts with `delimiter` re-appended to each.
    ///
    /// Concatenating the result reproduces the document, minus dropped
    /// segments, plus one extra trailing delimiter.
    #[must_use]
    pub fn texts_with_suffix(&self, delimiter: &str) -> Vec<String> {
        self.chunks
            .iter()
            .map(|chunk| {
                let mut text = String::with_capacity(chunk.text.len() + delimiter.len());
                text.push_str(&chunk.text);
                text.push_str(delimiter);
                text
            })
            .collect()
    }

    /// Segment indices per chunk, for tracing a chunk back to its source.
    #[must_use]
    pub fn segment_indices(&self) -> Vec<&[usize]> {
        self.chunks.iter().map(|c| c.segments.as_slice()).collect()
    }
}

impl IntoIterator for ChunkSet {
    type Item = Chunk;
    type IntoIter = std::vec::IntoIter<Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_without_segments() {
        let chunk = Chunk::new("...", vec![], 3);
        assert_eq!(chunk.to_string(), "Chunk { index: 3, segments: none, len: 3 }");
    }

    #[test]
    fn test_texts_with_suffix() {
        let set = ChunkSet {
            chunks: vec![Chunk::new("A. B", vec![0, 1], 0), Chunk::new(" C", vec![2], 1)],
            dropped: 0,
        };
        assert_eq!(set.texts_with_suffix("."), ["A. B.", " C."]);
        assert_eq!(set.segment_indices(), [&[0, 1][..], &[2][..]]);
    }
}
