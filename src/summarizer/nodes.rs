//! Step functions for the summarization workflow.
//!
//! Each node appends its own progress line to the state's log; the driver's
//! per-step markers are recorded separately in the run store.

use async_trait::async_trait;

use super::text;
use crate::node::{Node, NodeError};
use crate::state::WorkflowState;

/// Chunk the input and derive the length target: a third of the input's
/// word count, never below [`text::MIN_TARGET_WORDS`].
pub struct SplitText;

#[async_trait]
impl Node for SplitText {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.push_log("Splitting text into chunks...");
        let total_words = text::word_count(&state.input_text);
        state.max_length = (total_words / 3).max(text::MIN_TARGET_WORDS);
        state.chunks = text::split_text(&state.input_text, text::DEFAULT_CHUNK_SIZE);
        Ok(state)
    }
}

/// Summarize every chunk independently.
pub struct GenerateSummaries;

#[async_trait]
impl Node for GenerateSummaries {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.push_log("Generating summaries for each chunk...");
        state.chunk_summaries = state
            .chunks
            .iter()
            .map(|chunk| text::summarize_chunk(chunk, text::DEFAULT_SUMMARY_WORDS))
            .collect();
        Ok(state)
    }
}

/// Join the chunk summaries; the merged text seeds the refinement loop.
pub struct MergeSummaries;

#[async_trait]
impl Node for MergeSummaries {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.push_log("Merging chunk summaries...");
        state.merged_summary = text::merge_summaries(&state.chunk_summaries);
        state.refined_summary = state.merged_summary.clone();
        Ok(state)
    }
}

/// Trim the running summary toward the length target.
pub struct RefineSummary;

#[async_trait]
impl Node for RefineSummary {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.push_log("Refining summary...");
        state.refined_summary = text::refine_summary(&state.refined_summary, state.max_length);
        Ok(state)
    }
}

/// Loop controller: finishes the workflow once the refined summary fits the
/// target, otherwise sends the walk back around the refine edge.
pub struct CheckLength;

#[async_trait]
impl Node for CheckLength {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        let word_count = text::word_count(&state.refined_summary);
        if word_count <= state.max_length {
            state.push_log(format!(
                "Summary within limit ({word_count} words). Finishing workflow."
            ));
            state.done = true;
        } else {
            state.push_log(format!(
                "Summary too long ({word_count} words). Will refine again."
            ));
        }
        Ok(state)
    }
}
