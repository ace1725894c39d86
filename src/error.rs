//! Error types for condense.

/// Boxed error returned by injected services.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during chunking or summarization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Detail outside the closed range `[0, 1]`.
    #[error("invalid detail: {0} (must be within 0.0..=1.0)")]
    InvalidDetail(f64),

    /// Invalid chunk size (must be > 0).
    #[error("invalid chunk size: {0} (must be > 0)")]
    InvalidChunkSize(usize),

    /// The segment delimiter was the empty string.
    #[error("delimiter must not be empty")]
    EmptyDelimiter,

    /// The completion service failed on one chunk.
    #[error("summarizing chunk {index} of {total} failed: {source}")]
    Completion {
        /// Zero-based index of the failing chunk.
        index: usize,
        /// Number of chunks in the run.
        total: usize,
        /// The service's error.
        #[source]
        source: BoxError,
    },

    /// The caller cancelled the run between two chunks.
    #[error("summarization cancelled after {} chunk(s)", .completed.len())]
    Cancelled {
        /// Partial summaries finished before cancellation as
        /// `(chunk index, summary)`, in ascending index order. Parallel runs
        /// may skip chunks in the middle, so indices can have gaps.
        completed: Vec<(usize, String)>,
    },
}

/// Result type for condense operations.
pub type Result<T> = std::result::Result<T, Error>;
