//! Node contract for executable workflow steps.
//!
//! A node is an opaque function over [`WorkflowState`]: it receives the
//! current state by value and returns the next one. Nodes may finish
//! synchronously or suspend on I/O; the [`Node`] trait presents a single
//! async call surface so the driver, graph, and run store never branch on
//! which kind a node is.

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use miette::Diagnostic;
use std::sync::Arc;
use thiserror::Error;

use crate::state::WorkflowState;

/// A single named step in a workflow graph.
///
/// Implementations should be stateless; everything a step needs travels in
/// the state. Errors are not caught at this layer; a failing node aborts
/// the run, and the driver records which node raised it.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use skeingraph::node::{Node, NodeError};
/// use skeingraph::state::WorkflowState;
///
/// struct Uppercase;
///
/// #[async_trait]
/// impl Node for Uppercase {
///     async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
///         state.refined_summary = state.input_text.to_uppercase();
///         Ok(state)
///     }
/// }
/// ```
#[async_trait]
pub trait Node: Send + Sync {
    /// Execute this step, consuming the current state and producing the next.
    async fn run(&self, state: WorkflowState) -> Result<WorkflowState, NodeError>;
}

/// Closure-backed [`Node`], for registering bare functions without writing a
/// struct.
///
/// Tagged by invocation style: [`FnNode::Sync`] wraps a plain function,
/// [`FnNode::Suspending`] wraps one that returns a future. Both variants
/// share the trait's single call surface, so graphs can mix them freely.
///
/// # Examples
///
/// ```
/// use skeingraph::node::FnNode;
///
/// let passthrough = FnNode::from_sync(Ok);
/// let stamp = FnNode::from_sync(|mut state| {
///     state.push_log("stamped");
///     Ok(state)
/// });
/// # let _ = (passthrough, stamp);
/// ```
#[derive(Clone)]
pub enum FnNode {
    /// A plain function that returns directly.
    Sync(Arc<dyn Fn(WorkflowState) -> Result<WorkflowState, NodeError> + Send + Sync>),
    /// A function that suspends and resolves later.
    Suspending(
        Arc<
            dyn Fn(WorkflowState) -> BoxFuture<'static, Result<WorkflowState, NodeError>>
                + Send
                + Sync,
        >,
    ),
}

impl FnNode {
    /// Wrap a synchronous function.
    pub fn from_sync<F>(f: F) -> Self
    where
        F: Fn(WorkflowState) -> Result<WorkflowState, NodeError> + Send + Sync + 'static,
    {
        Self::Sync(Arc::new(f))
    }

    /// Wrap a future-returning function (e.g. one doing I/O-bound work).
    pub fn from_future<F, Fut>(f: F) -> Self
    where
        F: Fn(WorkflowState) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<WorkflowState, NodeError>> + Send + 'static,
    {
        Self::Suspending(Arc::new(move |state| Box::pin(f(state))))
    }
}

#[async_trait]
impl Node for FnNode {
    async fn run(&self, state: WorkflowState) -> Result<WorkflowState, NodeError> {
        match self {
            FnNode::Sync(f) => f(state),
            FnNode::Suspending(f) => f(state).await,
        }
    }
}

/// Fatal failures raised inside node bodies.
#[derive(Debug, Error, Diagnostic)]
pub enum NodeError {
    /// Expected input data is missing from the state.
    #[error("missing expected input: {what}")]
    #[diagnostic(
        code(skeingraph::node::missing_input),
        help("Check that an earlier node produced the required field.")
    )]
    MissingInput { what: &'static str },

    /// Input data is present but unusable.
    #[error("invalid input: {0}")]
    #[diagnostic(code(skeingraph::node::invalid_input))]
    InvalidInput(String),

    /// JSON serialization/deserialization error.
    #[error(transparent)]
    #[diagnostic(code(skeingraph::node::serde_json))]
    Serde(#[from] serde_json::Error),
}
