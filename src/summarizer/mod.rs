//! Rule-based summarization workflow exercising the engine's loop support.
//!
//! The graph is a linear chain ending in a refine/check cycle: `check_length`
//! routes back to `refine_summary` and the walk only exits when the check
//! marks the state done. Termination is a property of the nodes, not the
//! edge map.

pub mod nodes;
pub mod text;

pub use nodes::{CheckLength, GenerateSummaries, MergeSummaries, RefineSummary, SplitText};

use crate::graph::{Graph, GraphBuilder};

/// Build the summarization graph:
/// split_text → generate_summaries → merge_summaries → refine_summary →
/// check_length → (loop) refine_summary.
pub fn summarization_graph() -> Graph {
    GraphBuilder::new()
        .add_node("split_text", SplitText)
        .add_node("generate_summaries", GenerateSummaries)
        .add_node("merge_summaries", MergeSummaries)
        .add_node("refine_summary", RefineSummary)
        .add_node("check_length", CheckLength)
        .add_edge("split_text", "generate_summaries")
        .add_edge("generate_summaries", "merge_summaries")
        .add_edge("merge_summaries", "refine_summary")
        .add_edge("refine_summary", "check_length")
        .add_edge("check_length", "refine_summary")
        .set_start("split_text")
        .build()
}
