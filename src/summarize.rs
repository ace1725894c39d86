//! Detail-controlled summarization.
//!
//! ## How It Works
//!
//! ```text
//! document --resolve_chunking(detail)--> [c0, c1, c2]
//!
//! c0 --complete--> s0
//! c1 --complete--> s1        (recursive: prompt also carries s0)
//! c2 --complete--> s2        (recursive: prompt also carries s0, s1)
//!
//! summary = s0 + "\n\n" + s1 + "\n\n" + s2
//! ```
//!
//! Each chunk gets one request with a fixed system prompt and the chunk as
//! the user message. In recursive mode every request after the first also
//! carries all earlier partial summaries, so a run is strictly sequential.
//! Non-recursive chunks are independent; with the `parallel` feature they
//! can be dispatched concurrently and are reassembled in chunk order.
//!
//! ## Failure
//!
//! The first service error aborts the run and names the failing chunk. There
//! is no retry here: wrap the service if you want one. A cancellation flag
//! is checked before each chunk; partial summaries finished by then are
//! returned in [`Error::Cancelled`], each paired with its chunk index.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::{
    resolve_chunking, CompletionRequest, CompletionService, Error, Message, Resolution, Result,
    SummarizeConfig, TokenCounter,
};

/// Base system prompt for every chunk request.
pub const SYSTEM_PROMPT: &str = "Rewrite this text in summarized form.";

/// Separator between partial summaries, and between prompt sections.
pub const SUMMARY_SEPARATOR: &str = "\n\n";

/// The system prompt, with `additional_instructions` after a blank line.
///
/// ```rust
/// assert_eq!(
///     condense::system_prompt(Some("Be brief.")),
///     "Rewrite this text in summarized form.\n\nBe brief."
/// );
/// ```
#[must_use]
pub fn system_prompt(additional_instructions: Option<&str>) -> String {
    match additional_instructions {
        Some(extra) => format!("{SYSTEM_PROMPT}{SUMMARY_SEPARATOR}{extra}"),
        None => SYSTEM_PROMPT.to_string(),
    }
}

/// The user message for `chunk`.
///
/// In recursive mode with at least one earlier summary, the earlier
/// summaries are prepended as context. Otherwise the chunk stands alone.
#[must_use]
pub fn user_content(chunk: &str, previous: &[String], recursive: bool) -> String {
    if recursive && !previous.is_empty() {
        format!(
            "Previous summaries:{sep}{}{sep}Text to summarize next:{sep}{chunk}",
            previous.join(SUMMARY_SEPARATOR),
            sep = SUMMARY_SEPARATOR,
        )
    } else {
        chunk.to_string()
    }
}

/// Result of a summarization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Partial summaries joined with [`SUMMARY_SEPARATOR`].
    pub text: String,
    /// One summary per chunk, in chunk order.
    pub partials: Vec<String>,
    /// How the document was chunked.
    pub resolution: Resolution,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Summarizes documents through an injected completion service.
///
/// ## Example
///
/// ```rust
/// use condense::{BoxError, CompletionRequest, SummarizeConfig, Summarizer, WordCounter};
///
/// // A stand-in model that keeps the first word of each chunk
/// let service = |req: &CompletionRequest| -> Result<String, BoxError> {
///     let chunk = &req.messages[1].content;
///     Ok(chunk.split_whitespace().next().unwrap_or_default().to_string())
/// };
///
/// let summarizer = Summarizer::new(service, WordCounter);
/// let config = SummarizeConfig::default()
///     .with_detail(1.0)
///     .unwrap()
///     .with_minimum_chunk_size(2);
///
/// let summary = summarizer
///     .summarize("One two. Three four. Five six.", &config)
///     .unwrap();
/// assert_eq!(summary, "One\n\nThree\n\nFive");
/// ```
#[derive(Debug, Clone)]
pub struct Summarizer<S, C> {
    service: S,
    counter: C,
}

impl<S, C> Summarizer<S, C>
where
    S: CompletionService,
    C: TokenCounter,
{
    /// Create a summarizer from a completion service and a token counter.
    pub fn new(service: S, counter: C) -> Self {
        Self { service, counter }
    }

    /// The completion service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The token counter.
    pub fn counter(&self) -> &C {
        &self.counter
    }

    /// Summarize `text` and return the joined summary.
    ///
    /// # Errors
    ///
    /// Configuration errors before any work, and [`Error::Completion`] if
    /// the service fails on any chunk.
    pub fn summarize(&self, text: &str, config: &SummarizeConfig) -> Result<String> {
        self.summarize_report(text, config).map(|summary| summary.text)
    }

    /// Summarize `text`, keeping the partial summaries and chunking.
    ///
    /// # Errors
    ///
    /// Same as [`summarize`](Self::summarize).
    pub fn summarize_report(&self, text: &str, config: &SummarizeConfig) -> Result<Summary> {
        self.run(text, config, None)
    }

    /// Summarize `text`, stopping before the next chunk once `cancel` is set.
    ///
    /// # Errors
    ///
    /// Same as [`summarize`](Self::summarize), plus [`Error::Cancelled`]
    /// holding the partial summaries completed before cancellation, keyed by
    /// chunk index.
    pub fn summarize_cancellable(
        &self,
        text: &str,
        config: &SummarizeConfig,
        cancel: &AtomicBool,
    ) -> Result<Summary> {
        self.run(text, config, Some(cancel))
    }

    fn run(
        &self,
        text: &str,
        config: &SummarizeConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Summary> {
        config.validate()?;

        let resolution = resolve_chunking(
            text,
            config.detail,
            config.minimum_chunk_size,
            &config.delimiter,
            &self.counter,
        )?;
        let system = system_prompt(config.additional_instructions.as_deref());

        let partials = if config.parallel && !config.recursive {
            self.complete_parallel(&resolution.chunks, &system, config, cancel)?
        } else {
            self.complete_sequential(&resolution.chunks, &system, config, cancel)?
        };

        let text = partials.join(SUMMARY_SEPARATOR);
        info!(
            chunks = partials.len(),
            chunk_size = resolution.chunk_size,
            dropped = resolution.dropped,
            summary_len = text.len(),
            "summary complete"
        );

        Ok(Summary {
            text,
            partials,
            resolution,
        })
    }

    fn complete_one(
        &self,
        index: usize,
        total: usize,
        request: &CompletionRequest,
    ) -> Result<String> {
        debug!(index, total, "requesting chunk summary");
        self.service
            .complete(request)
            .map_err(|source| Error::Completion {
                index,
                total,
                source,
            })
    }

    fn complete_sequential(
        &self,
        chunks: &[String],
        system: &str,
        config: &SummarizeConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<String>> {
        let total = chunks.len();
        let mut partials: Vec<String> = Vec::with_capacity(total);

        for (index, chunk) in chunks.iter().enumerate() {
            if is_cancelled(cancel) {
                info!(completed = partials.len(), total, "summarization cancelled");
                return Err(Error::Cancelled {
                    completed: partials.into_iter().enumerate().collect(),
                });
            }
            let user = user_content(chunk, &partials, config.recursive);
            let request = build_request(system, user, config);
            partials.push(self.complete_one(index, total, &request)?);
        }

        Ok(partials)
    }

    #[cfg(feature = "parallel")]
    fn complete_parallel(
        &self,
        chunks: &[String],
        system: &str,
        config: &SummarizeConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<String>> {
        use rayon::prelude::*;

        let total = chunks.len();
        let outcomes: Vec<Option<Result<String>>> = chunks
            .par_iter()
            .enumerate()
            .map(|(index, chunk)| {
                if is_cancelled(cancel) {
                    return None;
                }
                let request = build_request(system, chunk.clone(), config);
                Some(self.complete_one(index, total, &request))
            })
            .collect();

        let mut completed = Vec::with_capacity(total);
        let mut skipped = 0;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Some(Ok(partial)) => completed.push((index, partial)),
                Some(Err(err)) => return Err(err),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            info!(
                completed = completed.len(),
                skipped,
                total,
                "summarization cancelled"
            );
            return Err(Error::Cancelled { completed });
        }
        Ok(completed.into_iter().map(|(_, partial)| partial).collect())
    }

    #[cfg(not(feature = "parallel"))]
    fn complete_parallel(
        &self,
        chunks: &[String],
        system: &str,
        config: &SummarizeConfig,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<String>> {
        debug!("parallel feature disabled, summarizing sequentially");
        self.complete_sequential(chunks, system, config, cancel)
    }
}

fn build_request(system: &str, user: String, config: &SummarizeConfig) -> CompletionRequest {
    CompletionRequest {
        model: config.model.clone(),
        messages: vec![Message::system(system), Message::user(user)],
    }
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}
