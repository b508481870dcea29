//! Rule-based text tools backing the summarization nodes.
//!
//! Deliberately naive: word-count chunking and head-truncation summaries.
//! The engine treats the nodes built on these as opaque; smarter rules slot
//! in without touching the driver.

/// Words per chunk when splitting input text.
pub const DEFAULT_CHUNK_SIZE: usize = 200;

/// Words kept per chunk summary.
pub const DEFAULT_SUMMARY_WORDS: usize = 50;

/// Floor for the derived length target.
pub const MIN_TARGET_WORDS: usize = 20;

/// Split `text` into chunks of up to `chunk_size` words.
pub fn split_text(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(chunk_size.max(1))
        .map(|chunk| chunk.join(" "))
        .collect()
}

/// Naive summary: the first `max_words` words of `chunk`.
pub fn summarize_chunk(chunk: &str, max_words: usize) -> String {
    chunk
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join chunk summaries into one running summary.
pub fn merge_summaries(summaries: &[String]) -> String {
    summaries.join(" ")
}

/// Trim `summary` to at most `max_words` words; shorter input passes
/// through untouched.
pub fn refine_summary(summary: &str, max_words: usize) -> String {
    let words: Vec<&str> = summary.split_whitespace().collect();
    if words.len() <= max_words {
        summary.to_string()
    } else {
        words[..max_words].join(" ")
    }
}

/// Word count as the tools see it (whitespace-delimited).
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
