//! Summarization configuration.

use crate::{Detail, Error, Result};

/// Default smallest chunk, in tokens.
pub const DEFAULT_MINIMUM_CHUNK_SIZE: usize = 500;

/// Default segment delimiter: split on sentence-ending periods.
pub const DEFAULT_DELIMITER: &str = ".";

/// Parameters for one [`Summarizer::summarize`](crate::Summarizer::summarize) run.
///
/// ```rust
/// use condense::SummarizeConfig;
///
/// let config = SummarizeConfig::default()
///     .with_detail(0.25)
///     .unwrap()
///     .with_recursive(true)
///     .with_instructions("Use bullet points.");
///
/// assert_eq!(config.minimum_chunk_size, 500);
/// assert_eq!(config.delimiter, ".");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SummarizeConfig {
    /// Summary granularity; 0 gives one chunk, 1 the most chunks.
    pub detail: Detail,
    /// Smallest token budget a chunk may get.
    pub minimum_chunk_size: usize,
    /// Segment delimiter.
    pub delimiter: String,
    /// Feed all earlier partial summaries into each request.
    pub recursive: bool,
    /// Appended to the system prompt after a blank line.
    pub additional_instructions: Option<String>,
    /// Model selector passed through to the service.
    pub model: Option<String>,
    /// Dispatch chunks concurrently when not recursive. Only has an effect
    /// with the `parallel` feature.
    pub parallel: bool,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            detail: Detail::MIN,
            minimum_chunk_size: DEFAULT_MINIMUM_CHUNK_SIZE,
            delimiter: DEFAULT_DELIMITER.to_string(),
            recursive: false,
            additional_instructions: None,
            model: None,
            parallel: false,
        }
    }
}

impl SummarizeConfig {
    /// Set the detail level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDetail`] if `detail` is outside `0.0..=1.0`.
    pub fn with_detail(self, detail: f64) -> Result<Self> {
        Ok(Self {
            detail: Detail::new(detail)?,
            ..self
        })
    }

    /// Set the minimum chunk size in tokens.
    #[must_use]
    pub fn with_minimum_chunk_size(self, minimum_chunk_size: usize) -> Self {
        Self {
            minimum_chunk_size,
            ..self
        }
    }

    /// Set the segment delimiter.
    #[must_use]
    pub fn with_delimiter(self, delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            ..self
        }
    }

    /// Enable or disable recursive summarization.
    #[must_use]
    pub fn with_recursive(self, recursive: bool) -> Self {
        Self { recursive, ..self }
    }

    /// Extra instructions for the system prompt.
    #[must_use]
    pub fn with_instructions(self, instructions: impl Into<String>) -> Self {
        Self {
            additional_instructions: Some(instructions.into()),
            ..self
        }
    }

    /// Model selector passed to the service.
    #[must_use]
    pub fn with_model(self, model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..self
        }
    }

    /// Allow concurrent dispatch of independent chunks.
    #[must_use]
    pub fn with_parallel(self, parallel: bool) -> Self {
        Self { parallel, ..self }
    }

    /// Check the fields the type system does not. Fields set directly (or
    /// deserialized) bypass the builders, so the summarizer calls this before
    /// doing any work.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidChunkSize`] or [`Error::EmptyDelimiter`].
    pub fn validate(&self) -> Result<()> {
        if self.minimum_chunk_size == 0 {
            return Err(Error::InvalidChunkSize(self.minimum_chunk_size));
        }
        if self.delimiter.is_empty() {
            return Err(Error::EmptyDelimiter);
        }
        Ok(())
    }
}
