//! Property-based tests for chunking.
//!
//! These tests verify that chunking maintains key invariants:
//! - Reconstruction: segments rejoin into the input
//! - Budget: no chunk exceeds the token budget
//! - Accounting: every segment is either placed once or dropped
//! - Monotonicity: more detail never yields fewer chunks

use condense::{
    chunk_on_delimiter, resolve_chunking, segment, CharCounter, ChunkSet, Combiner, Detail,
    OverflowPolicy, TokenCounter, WordCounter,
};
use proptest::prelude::*;

// =============================================================================
// Test Generators
// =============================================================================

/// Generate arbitrary text for segmenting
fn arbitrary_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(".{0,300}").unwrap()
}

/// Generate text with sentence-like structure
fn sentence_like_text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::collection::vec(prop::string::string_regex("[A-Za-z]{1,10}").unwrap(), 1..8),
        1..20,
    )
    .prop_map(|sentences| {
        sentences
            .iter()
            .map(|words| words.join(" "))
            .collect::<Vec<_>>()
            .join(". ")
            + "."
    })
}

// =============================================================================
// Invariant Helpers
// =============================================================================

/// Check that every segment index appears at most once, in ascending order
fn indices_ascending(set: &ChunkSet) -> bool {
    let all: Vec<usize> = set.chunks.iter().flat_map(|c| c.segments.iter().copied()).collect();
    all.windows(2).all(|w| w[0] < w[1])
}

/// Check that placed plus dropped segments account for the input
fn segments_accounted(set: &ChunkSet, segment_count: usize) -> bool {
    let placed: usize = set.chunks.iter().map(|c| c.segments.len()).sum();
    placed + set.dropped == segment_count
}

// =============================================================================
// Segmenter Tests
// =============================================================================

proptest! {
    #[test]
    fn segments_rejoin_to_input(text in arbitrary_text(), delimiter in "[.!,|]|\n\n|, ") {
        let segments = segment(&text, &delimiter).unwrap();
        prop_assert_eq!(segments.join(delimiter.as_str()), text);
    }
}

// =============================================================================
// Combiner Tests
// =============================================================================

proptest! {
    #[test]
    fn chunks_within_budget(text in sentence_like_text(), max_tokens in 1usize..120) {
        let counter = CharCounter::new();
        let set = Combiner::new(max_tokens, ".")
            .unwrap()
            .with_overflow(OverflowPolicy::Ellipsis)
            .chunk(&text, &counter);

        for chunk in &set.chunks {
            prop_assert!(
                counter.count(&chunk.text) <= max_tokens,
                "Chunk {} exceeds budget {}",
                chunk,
                max_tokens
            );
        }
    }

    #[test]
    fn word_chunks_within_budget(text in sentence_like_text(), max_tokens in 1usize..20) {
        let set = Combiner::new(max_tokens, ".").unwrap().chunk(&text, &WordCounter);
        for chunk in &set.chunks {
            prop_assert!(WordCounter.count(&chunk.text) <= max_tokens);
        }
    }

    #[test]
    fn dropped_counts_oversized_segments(text in sentence_like_text(), max_tokens in 1usize..60) {
        let counter = CharCounter::new();
        let segments = segment(&text, ".").unwrap();
        let oversized = segments.iter().filter(|s| counter.count(s) > max_tokens).count();

        let set = Combiner::new(max_tokens, ".").unwrap().combine(&segments, &counter);

        prop_assert_eq!(set.dropped, oversized);
        prop_assert!(indices_ascending(&set));
        prop_assert!(segments_accounted(&set, segments.len()));
    }

    #[test]
    fn no_overflow_reconstructs_text(text in sentence_like_text()) {
        let counter = CharCounter::new();
        let segments = segment(&text, ".").unwrap();
        // Budget fits the longest segment, so nothing is dropped
        let max_tokens = segments.iter().map(|s| counter.count(s)).max().unwrap_or(0).max(1);
        let set = Combiner::new(max_tokens, ".").unwrap().combine(&segments, &counter);

        prop_assert_eq!(set.dropped, 0);
        let texts: Vec<&str> = set.chunks.iter().map(|c| c.text.as_str()).collect();
        prop_assert_eq!(texts.join("."), text);
    }

    #[test]
    fn header_on_every_chunk(text in sentence_like_text(), max_tokens in 20usize..100) {
        let set = Combiner::new(max_tokens, ".")
            .unwrap()
            .with_header("HDR")
            .chunk(&text, &CharCounter::new());

        for chunk in &set.chunks {
            prop_assert!(chunk.text.starts_with("HDR."));
            prop_assert!(!chunk.segments.is_empty());
        }
    }
}

// =============================================================================
// Detail Tests
// =============================================================================

proptest! {
    #[test]
    fn chunk_count_monotone_in_detail(
        text in sentence_like_text(),
        d1 in 0.0f64..=1.0,
        d2 in 0.0f64..=1.0,
    ) {
        let (low, high) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
        let counter = CharCounter::new();
        // Sentences are at most 77 chars, so nothing overflows
        let minimum = 90;

        let coarse = resolve_chunking(&text, Detail::new(low).unwrap(), minimum, ".", &counter).unwrap();
        let fine = resolve_chunking(&text, Detail::new(high).unwrap(), minimum, ".", &counter).unwrap();

        prop_assert!(coarse.target_chunks <= fine.target_chunks);
        prop_assert!(coarse.chunk_size >= fine.chunk_size);
        prop_assert!(coarse.chunks.len() <= fine.chunks.len());
    }

    #[test]
    fn resolve_is_idempotent(text in sentence_like_text(), detail in 0.0f64..=1.0) {
        let detail = Detail::new(detail).unwrap();
        let first = resolve_chunking(&text, detail, 8, ".", &WordCounter).unwrap();
        let second = resolve_chunking(&text, detail, 8, ".", &WordCounter).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn zero_detail_short_document_is_one_chunk(text in sentence_like_text()) {
        let counter = CharCounter::new();
        let minimum = text.chars().count() + 1;
        let res = resolve_chunking(&text, Detail::MIN, minimum, ".", &counter).unwrap();
        prop_assert_eq!(res.chunks.len(), 1);
        prop_assert_eq!(res.chunks[0].clone(), format!("{text}."));
    }
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn three_sentences_one_chunk() {
    let chunks = chunk_on_delimiter("A. B. C.", 500, ".", &WordCounter).unwrap();
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].starts_with("A. B. C."));
}

#[test]
fn three_sentences_one_per_chunk() {
    let res = resolve_chunking("A. B. C.", Detail::MAX, 1, ".", &WordCounter).unwrap();
    assert_eq!(res.chunks.len(), 3);
    assert!(res.chunks[0].contains('A'));
    assert!(res.chunks[1].contains('B'));
    assert!(res.chunks[2].contains('C'));
}

#[test]
fn oversized_segment_replaced_by_ellipsis() {
    let text = "Short one. This sentence is far too long for the budget. End";
    let counter = CharCounter::new();
    let set = Combiner::new(15, ".")
        .unwrap()
        .with_overflow(OverflowPolicy::Ellipsis)
        .chunk(text, &counter);

    assert_eq!(set.dropped, 1);
    assert_eq!(set.chunks[0].text, "Short one....");
    assert!(set.chunks.iter().all(|c| !c.text.contains("far too long")));
}

#[test]
fn unicode_handling() {
    let text = "Hello 世界. Привет мир. مرحبا بالعالم.";
    let chunks = chunk_on_delimiter(text, 16, ".", &CharCounter::new()).unwrap();
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks.concat(), format!("{text}."));
}
