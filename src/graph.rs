//! Graph definition: named nodes, per-node successor edges, a start node.
//!
//! A [`Graph`] is constructed once through [`GraphBuilder`] and immutable
//! afterwards. Nothing is validated at build time; a start node or edge
//! target that was never registered surfaces lazily, as a
//! [`NodeNotFound`](crate::runner::RunnerError::NodeNotFound) error when
//! execution reaches it.

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::node::Node;

/// Immutable workflow graph.
///
/// `edges` maps each node name to an optional successor. A missing entry and
/// an explicit `None` behave identically: both terminate the walk. The
/// design does not distinguish an intentional terminal from a dangling edge.
/// Cycles are legal; a cyclic edge map only terminates through a node
/// setting the state's `done` flag.
pub struct Graph {
    nodes: FxHashMap<String, Arc<dyn Node>>,
    edges: FxHashMap<String, Option<String>>,
    start_node: String,
}

impl Graph {
    /// Registry of step functions, keyed by node name.
    pub fn nodes(&self) -> &FxHashMap<String, Arc<dyn Node>> {
        &self.nodes
    }

    /// Successor lookup table.
    pub fn edges(&self) -> &FxHashMap<String, Option<String>> {
        &self.edges
    }

    /// Name of the node execution begins at.
    pub fn start_node(&self) -> &str {
        &self.start_node
    }

    /// Look up the step function registered under `name`.
    pub fn node(&self, name: &str) -> Option<&Arc<dyn Node>> {
        self.nodes.get(name)
    }

    /// Successor of `name`, flattening "no entry" and "entry of `None`".
    pub fn successor(&self, name: &str) -> Option<&str> {
        self.edges.get(name).and_then(|next| next.as_deref())
    }
}

/// Fluent builder for [`Graph`].
///
/// # Examples
///
/// ```
/// use skeingraph::graph::GraphBuilder;
/// use skeingraph::node::FnNode;
///
/// let graph = GraphBuilder::new()
///     .add_node("first", FnNode::from_sync(Ok))
///     .add_node("second", FnNode::from_sync(Ok))
///     .add_edge("first", "second")
///     .set_start("first")
///     .build();
///
/// assert_eq!(graph.start_node(), "first");
/// assert_eq!(graph.successor("first"), Some("second"));
/// assert_eq!(graph.successor("second"), None);
/// ```
#[derive(Default)]
pub struct GraphBuilder {
    nodes: FxHashMap<String, Arc<dyn Node>>,
    edges: FxHashMap<String, Option<String>>,
    start_node: Option<String>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a step function under `name`. Re-registering a name replaces
    /// the earlier node.
    #[must_use]
    pub fn add_node(mut self, name: impl Into<String>, node: impl Node + 'static) -> Self {
        self.nodes.insert(name.into(), Arc::new(node));
        self
    }

    /// Route `from` to `to`. One successor per node; a later edge from the
    /// same node replaces the earlier one.
    #[must_use]
    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.insert(from.into(), Some(to.into()));
        self
    }

    /// Mark `from` as an explicit dead end. Equivalent to never routing it.
    #[must_use]
    pub fn add_terminal_edge(mut self, from: impl Into<String>) -> Self {
        self.edges.insert(from.into(), None);
        self
    }

    /// Name the node execution begins at.
    #[must_use]
    pub fn set_start(mut self, name: impl Into<String>) -> Self {
        self.start_node = Some(name.into());
        self
    }

    /// Finalize the graph. Performs no validation; if [`set_start`](Self::set_start)
    /// was never called the empty start name fails at run time like any other
    /// unregistered node.
    pub fn build(self) -> Graph {
        Graph {
            nodes: self.nodes,
            edges: self.edges,
            start_node: self.start_node.unwrap_or_default(),
        }
    }
}
