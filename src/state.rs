//! Workflow state threaded through a graph walk.
//!
//! A run owns exactly one [`WorkflowState`] at a time. Nodes consume it by
//! value and hand back the next current value (replacement semantics); the
//! driver never aliases it. Two control fields steer the walk: `done` stops
//! the driver regardless of remaining edges, and `log` accumulates
//! human-readable trace lines, append-only for the life of the run.

use serde::{Deserialize, Serialize};

/// The mutable value object a graph run operates on.
///
/// Domain fields hold the input text plus the artifacts the summarization
/// nodes produce; transports are free to serialize the whole thing (it
/// derives `Serialize`/`Deserialize`) as long as they keep the field set.
///
/// # Examples
///
/// ```
/// use skeingraph::state::WorkflowState;
///
/// let state = WorkflowState::new("some long input").with_max_length(80);
/// assert_eq!(state.max_length, 80);
/// assert!(!state.done);
/// assert!(state.log.is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Raw input text supplied by the run initiator.
    pub input_text: String,
    /// Target word budget for the final artifact.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
    /// Chunks produced by splitting the input.
    #[serde(default)]
    pub chunks: Vec<String>,
    /// Per-chunk summaries.
    #[serde(default)]
    pub chunk_summaries: Vec<String>,
    /// All chunk summaries joined into one running summary.
    #[serde(default)]
    pub merged_summary: String,
    /// The summary after refinement passes.
    #[serde(default)]
    pub refined_summary: String,
    /// Completion flag; once true the driver invokes no further nodes.
    #[serde(default)]
    pub done: bool,
    /// Ordered trace lines, grown monotonically across the run.
    #[serde(default)]
    pub log: Vec<String>,
}

fn default_max_length() -> usize {
    WorkflowState::DEFAULT_MAX_LENGTH
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            max_length: Self::DEFAULT_MAX_LENGTH,
            chunks: Vec::new(),
            chunk_summaries: Vec::new(),
            merged_summary: String::new(),
            refined_summary: String::new(),
            done: false,
            log: Vec::new(),
        }
    }
}

impl WorkflowState {
    /// Default word budget when the caller supplies none.
    pub const DEFAULT_MAX_LENGTH: usize = 200;

    /// Fresh state for a new run, carrying only the input text.
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            input_text: input_text.into(),
            ..Default::default()
        }
    }

    /// Override the word budget.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Append a trace line to the state's own log.
    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_has_defaults() {
        let state = WorkflowState::new("hello world");
        assert_eq!(state.input_text, "hello world");
        assert_eq!(state.max_length, WorkflowState::DEFAULT_MAX_LENGTH);
        assert!(state.chunks.is_empty());
        assert!(!state.done);
        assert!(state.log.is_empty());
    }

    #[test]
    fn push_log_appends_in_order() {
        let mut state = WorkflowState::new("x");
        state.push_log("first");
        state.push_log("second");
        assert_eq!(state.log, vec!["first", "second"]);
    }

    #[test]
    fn serde_defaults_missing_fields() {
        let state: WorkflowState = serde_json::from_str(r#"{"input_text":"abc"}"#)
            .expect("minimal payload should deserialize");
        assert_eq!(state.input_text, "abc");
        assert_eq!(state.max_length, WorkflowState::DEFAULT_MAX_LENGTH);
        assert!(!state.done);
    }
}
