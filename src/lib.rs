//! # Skeingraph: stepwise graph execution engine
//!
//! Skeingraph executes a named, directed graph of processing steps against a
//! mutable workflow state, one node at a time, until a termination condition
//! is reached, optionally streaming per-step progress to an observer. Edge
//! maps may contain cycles ("loops"); a cyclic walk terminates when a node
//! sets the state's `done` flag.
//!
//! ## Core Concepts
//!
//! - **Nodes**: opaque async step functions over [`state::WorkflowState`]
//! - **Graph**: immutable nodes + successor edges + start node
//! - **Driver**: the sequential walk with snapshot/log bookkeeping
//! - **Registries**: process-wide graph catalog and run store
//! - **Observer**: per-step notification sink for live streaming
//!
//! ## Quick Start
//!
//! ```
//! use skeingraph::runner::GraphRunner;
//! use skeingraph::state::WorkflowState;
//! use skeingraph::summarizer::summarization_graph;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), skeingraph::runner::RunnerError> {
//! let runner = GraphRunner::default();
//! let graph_id = runner.graph_registry().register(summarization_graph());
//!
//! let input = "the quick brown fox jumps over the lazy dog ".repeat(40);
//! let (final_state, run_id) = runner
//!     .run(&graph_id, WorkflowState::new(input), None)
//!     .await?;
//!
//! assert!(final_state.done);
//! // The run store keeps the driver's own step log, queryable by run id.
//! let log = runner.run_store().log(&run_id).unwrap();
//! assert_eq!(log[0], "Running node: split_text");
//! # Ok(())
//! # }
//! ```
//!
//! ## Live step streaming
//!
//! Supply a [`observer::StepObserver`] to receive one call per node
//! execution plus a terminal call with the sentinel name `"END"`. The
//! bundled [`observer::ChannelObserver`] forwards steps to a `flume`
//! channel for a WebSocket/SSE transport to drain; the driver awaits each
//! delivery, so a disconnected consumer aborts the run with its error kind
//! intact.
//!
//! ## Module Guide
//!
//! - [`graph`] - Graph definition and fluent builder
//! - [`node`] - Node contract and closure adapters
//! - [`state`] - The workflow state value object
//! - [`registry`] - Process-wide graph catalog
//! - [`store`] - Run store: snapshots and per-run logs
//! - [`runner`] - The execution driver
//! - [`observer`] - Step observer contract and channel observer
//! - [`summarizer`] - Rule-based summarization workflow (reference graph)
//! - [`telemetry`] - Tracing bootstrap

pub mod graph;
pub mod node;
pub mod observer;
pub mod registry;
pub mod runner;
pub mod state;
pub mod store;
pub mod summarizer;
pub mod telemetry;
