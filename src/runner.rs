//! Execution driver: walks a graph node by node until termination.
//!
//! The driver is a state machine over node names. Starting from the graph's
//! start node it resolves the step function, records a trace marker, notifies
//! the observer, awaits the node, snapshots the result, and follows the edge
//! map to the successor. It stops when the edge map yields no successor or a
//! node sets the state's `done` flag, whichever comes first.
//!
//! One run executes its nodes strictly sequentially; the loop suspends only
//! while awaiting a node or the observer, and resumes deterministically.
//! Multiple runs may be in flight concurrently as independent tasks sharing
//! only the injected registries.

use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::graph::Graph;
use crate::node::NodeError;
use crate::observer::{END_NODE, ObserverError, StepObserver};
use crate::registry::{GraphId, GraphRegistry};
use crate::state::WorkflowState;
use crate::store::{RunId, RunStore};

/// Errors surfaced by a driver invocation.
///
/// The driver performs no local recovery: every kind aborts the current run
/// and propagates with its variant intact, so callers can tell a bad graph
/// from a bad node from a bad observer. The run store keeps whatever partial
/// snapshot and log were written before the failure.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// Run initiation referenced an unregistered graph id.
    #[error("graph not found: {graph_id}")]
    #[diagnostic(
        code(skeingraph::runner::graph_not_found),
        help("Register the graph first; registration returns the id to run under.")
    )]
    GraphNotFound { graph_id: GraphId },

    /// An edge or the start node names a node that was never registered.
    #[error("node not found: {node}")]
    #[diagnostic(
        code(skeingraph::runner::node_not_found),
        help("Graphs are not validated at build time; check the edge map and start node.")
    )]
    NodeNotFound { node: String },

    /// A node's step function failed.
    #[error("node execution failed at {node}")]
    #[diagnostic(code(skeingraph::runner::node_execution))]
    NodeExecution {
        node: String,
        #[source]
        source: NodeError,
    },

    /// The step observer failed while being notified for `node`.
    #[error("observer failed at {node}")]
    #[diagnostic(code(skeingraph::runner::observer))]
    Observer {
        node: String,
        #[source]
        source: ObserverError,
    },
}

/// Drives graphs from the catalog against the run store.
///
/// The registries are injected at construction and shared by reference:
/// graph-building collaborators register through
/// [`graph_registry`](Self::graph_registry), and anyone may query
/// [`run_store`](Self::run_store) for a run's latest snapshot and log,
/// during or after the run.
///
/// # Examples
///
/// ```
/// use skeingraph::graph::GraphBuilder;
/// use skeingraph::node::FnNode;
/// use skeingraph::runner::GraphRunner;
/// use skeingraph::state::WorkflowState;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), skeingraph::runner::RunnerError> {
/// let runner = GraphRunner::default();
/// let graph = GraphBuilder::new()
///     .add_node("only", FnNode::from_sync(|mut state| {
///         state.done = true;
///         Ok(state)
///     }))
///     .set_start("only")
///     .build();
/// let graph_id = runner.graph_registry().register(graph);
///
/// let (final_state, run_id) = runner
///     .run(&graph_id, WorkflowState::new("hello"), None)
///     .await?;
/// assert!(final_state.done);
/// assert_eq!(runner.run_store().log(&run_id).unwrap().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct GraphRunner {
    graphs: Arc<GraphRegistry>,
    runs: Arc<RunStore>,
}

impl Default for GraphRunner {
    fn default() -> Self {
        Self::new(Arc::new(GraphRegistry::new()), Arc::new(RunStore::new()))
    }
}

impl GraphRunner {
    /// Build a driver around existing registries.
    pub fn new(graphs: Arc<GraphRegistry>, runs: Arc<RunStore>) -> Self {
        Self { graphs, runs }
    }

    /// Catalog handed to graph-building collaborators.
    pub fn graph_registry(&self) -> &Arc<GraphRegistry> {
        &self.graphs
    }

    /// Store queried for snapshots and logs.
    pub fn run_store(&self) -> &Arc<RunStore> {
        &self.runs
    }

    /// Run the catalog entry `graph_id` from its start node to termination.
    ///
    /// Returns the final state and the run's generated id once the walk
    /// terminates. Fails with [`RunnerError::GraphNotFound`] if the id was
    /// never registered.
    #[instrument(skip(self, initial_state, observer), fields(graph_id = %graph_id))]
    pub async fn run(
        &self,
        graph_id: &GraphId,
        initial_state: WorkflowState,
        observer: Option<&dyn StepObserver>,
    ) -> Result<(WorkflowState, RunId), RunnerError> {
        let graph = self
            .graphs
            .get(graph_id)
            .ok_or_else(|| RunnerError::GraphNotFound {
                graph_id: graph_id.clone(),
            })?;
        self.run_graph(&graph, initial_state, observer).await
    }

    /// Walk `graph` directly, without a catalog lookup.
    ///
    /// Termination: the edge map yields no successor for the current node,
    /// or a node sets `state.done`. A cyclic edge map where no node ever
    /// sets `done` runs forever; the driver enforces no iteration cap.
    ///
    /// Any error from a node, a graph lookup, or the observer aborts the run
    /// immediately: no retry, no rollback of the run store's last-written
    /// snapshot.
    #[instrument(skip_all)]
    pub async fn run_graph(
        &self,
        graph: &Graph,
        mut state: WorkflowState,
        observer: Option<&dyn StepObserver>,
    ) -> Result<(WorkflowState, RunId), RunnerError> {
        let run_id = RunId::generate();
        self.runs.create(&run_id, state.clone());
        debug!(run_id = %run_id, start = graph.start_node(), "run started");

        let mut current = Some(graph.start_node().to_string());
        while !state.done {
            let Some(name) = current else { break };
            let node = graph
                .node(&name)
                .ok_or_else(|| RunnerError::NodeNotFound { node: name.clone() })?;

            // The marker lands in both logs before the node runs, so the
            // observer sees the about-to-run step even though the node's own
            // effects have not landed yet.
            let marker = format!("Running node: {name}");
            state.push_log(marker.clone());
            self.runs.append_log(&run_id, marker);

            if let Some(obs) = observer {
                obs.on_step(&name, &state)
                    .await
                    .map_err(|source| RunnerError::Observer {
                        node: name.clone(),
                        source,
                    })?;
            }

            debug!(run_id = %run_id, node = %name, "executing node");
            state = node
                .run(state)
                .await
                .map_err(|source| RunnerError::NodeExecution {
                    node: name.clone(),
                    source,
                })?;
            self.runs.record_snapshot(&run_id, state.clone());

            current = graph.successor(&name).map(str::to_string);
        }

        // Terminal notification fires on both exit paths: done flag or
        // edge-map dead end.
        if let Some(obs) = observer {
            obs.on_step(END_NODE, &state)
                .await
                .map_err(|source| RunnerError::Observer {
                    node: END_NODE.to_string(),
                    source,
                })?;
        }

        debug!(run_id = %run_id, done = state.done, "run finished");
        Ok((state, run_id))
    }
}
