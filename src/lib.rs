//! # condense
//!
//! Detail-controlled chunking and summarization of long documents.
//!
//! ## The Problem
//!
//! Ask a language model to summarize a 50-page document and you get roughly
//! the same few paragraphs you would get for a 5-page one. Output length
//! does not scale with input length, and the document may not even fit the
//! context window.
//!
//! The fix is to cut the document into pieces, summarize each piece, and
//! join the results. The number of pieces then controls how detailed the
//! summary is: one piece gives the shortest summary, many pieces give a
//! long one. This crate turns that into a single knob, `detail`, in `[0, 1]`.
//!
//! ## The Pipeline
//!
//! ```text
//! text ──segment(".")──▶ ["A", " B", " C", ""]
//!                              │
//!            Combiner (greedy, token-bounded, order-preserving)
//!                              │
//!                              ▼
//!                  ["A. B.", " C.."]  ◀── chunk size from Detail
//!                              │
//!          Summarizer: one completion per chunk, in order
//!                              │
//!                              ▼
//!                    "s0\n\ns1"  (final summary)
//! ```
//!
//! - **Segmenting** splits on a delimiter. Nothing is trimmed, so the
//!   segments always rejoin into the original text.
//! - **Combining** packs consecutive segments into chunks that never exceed
//!   the token budget. A segment too large to fit any chunk is dropped (and
//!   optionally marked with `"..."`) rather than split further.
//! - **Detail** maps `[0, 1]` to a chunk count between one and the number of
//!   chunks the document yields at `minimum_chunk_size`.
//! - **Summarizing** sends one request per chunk. In recursive mode each
//!   request also carries every earlier partial summary.
//!
//! Token counting and the model call are injected: implement
//! [`TokenCounter`] and [`CompletionService`], or pass closures.
//!
//! ## Quick Start
//!
//! ```rust
//! use condense::{chunk_on_delimiter, BoxError, CompletionRequest, SummarizeConfig, Summarizer, WordCounter};
//!
//! let text = "Rust is fast. Rust is safe. Rust has great tooling.";
//!
//! // Raw chunking: at most 6 words per chunk
//! let chunks = chunk_on_delimiter(text, 6, ".", &WordCounter).unwrap();
//! assert_eq!(chunks.len(), 2);
//!
//! // Summarization with a stand-in model
//! let model = |req: &CompletionRequest| -> Result<String, BoxError> {
//!     Ok(format!("[{} words]", req.messages[1].content.split_whitespace().count()))
//! };
//! let summarizer = Summarizer::new(model, WordCounter);
//! let summary = summarizer.summarize(text, &SummarizeConfig::default()).unwrap();
//! assert_eq!(summary, "[10 words]");
//! ```
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `serde` | `Serialize`/`Deserialize` for config and requests |
//! | `tokenizers` | [`TokenCounter`] for `tokenizers::Tokenizer` |
//! | `parallel` | Concurrent dispatch of non-recursive chunks via rayon |
//!
//! ## Logging
//!
//! Events are emitted through `tracing`: a `warn` for every dropped segment,
//! `debug` for resolved chunk sizes and each request, `info` per finished
//! summary. Install a subscriber to see them.

mod chunk;
mod combine;
mod config;
mod detail;
mod error;
mod segment;
mod service;
mod summarize;
mod token;

pub use chunk::{Chunk, ChunkSet};
pub use combine::{chunk_on_delimiter, Combiner, OverflowPolicy, ELLIPSIS};
pub use config::{SummarizeConfig, DEFAULT_DELIMITER, DEFAULT_MINIMUM_CHUNK_SIZE};
pub use detail::{resolve_chunking, Detail, Resolution};
pub use error::{BoxError, Error, Result};
pub use segment::segment;
pub use service::{CompletionRequest, CompletionService, Message, Role};
pub use summarize::{
    system_prompt, user_content, Summarizer, Summary, SUMMARY_SEPARATOR, SYSTEM_PROMPT,
};
pub use token::{CharCounter, TokenCounter, WordCounter};
