//! Detail-Controlled Summarization
//!
//! Summarizes a document at several detail levels with a stand-in model
//! that keeps the first sentence of every chunk.
//!
//! ```bash
//! RUST_LOG=condense=debug cargo run --example summarize_document -- path/to/file.txt
//! ```

use condense::{BoxError, CompletionRequest, SummarizeConfig, Summarizer, WordCounter};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "Machine learning models learn patterns from data. \
    They generalize these patterns to make predictions. \
    This is fundamentally different from traditional programming. \
    Deep learning extends this with multiple hidden layers. \
    Each layer learns increasingly abstract representations. \
    Training requires large datasets and significant compute. \
    Inference, by contrast, can run on modest hardware. \
    Evaluation on held-out data guards against overfitting.";

/// Replace each chunk with its first sentence.
fn extractive_model(request: &CompletionRequest) -> Result<String, BoxError> {
    let chunk = request
        .messages
        .last()
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    let first = chunk.split('.').map(str::trim).find(|s| !s.is_empty());
    Ok(first.map(|s| format!("{s}.")).unwrap_or_default())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let document = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };

    let summarizer = Summarizer::new(extractive_model, WordCounter);

    println!("Document: {} words\n", document.split_whitespace().count());

    for detail in [0.0, 0.5, 1.0] {
        let config = SummarizeConfig::default()
            .with_detail(detail)?
            .with_minimum_chunk_size(20);
        let summary = summarizer.summarize_report(&document, &config)?;

        println!(
            "detail {detail:.1}: {} chunks of <= {} words",
            summary.resolution.chunks.len(),
            summary.resolution.chunk_size
        );
        println!("{summary}\n");
    }

    Ok(())
}
