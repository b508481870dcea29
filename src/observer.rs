//! Per-step notification contract for live progress streaming.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::WorkflowState;

/// Sentinel node name used for the terminal observer call.
pub const END_NODE: &str = "END";

/// Sink the driver notifies once per node execution, in execution order,
/// plus exactly one terminal call with [`END_NODE`] and the final state,
/// on every termination path, whether the state flagged `done` or the edge
/// map ran dry.
///
/// Each step call carries the about-to-run node's name and the state *before*
/// that node's effects land. The driver awaits every call before advancing;
/// that back-pressure keeps step ordering deterministic for streaming
/// consumers. A failed call aborts the run the same way a node failure
/// would.
#[async_trait]
pub trait StepObserver: Send + Sync {
    async fn on_step(&self, node: &str, state: &WorkflowState) -> Result<(), ObserverError>;
}

/// One step notification in serializable form, for transports that forward
/// steps over a wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub node: String,
    pub state: WorkflowState,
}

/// Observer that forwards [`StepEvent`]s to a `flume` channel.
///
/// The receiving half is what a streaming transport (WebSocket, SSE) drains.
/// A dropped receiver surfaces as [`ObserverError::ChannelClosed`]; the
/// driver propagates it and the run is abandoned, its last snapshot left in
/// the run store.
pub struct ChannelObserver {
    tx: flume::Sender<StepEvent>,
}

impl ChannelObserver {
    pub fn new(tx: flume::Sender<StepEvent>) -> Self {
        Self { tx }
    }

    /// An unbounded channel plus the observer wrapping its sender.
    ///
    /// # Examples
    ///
    /// ```
    /// use skeingraph::observer::ChannelObserver;
    ///
    /// let (observer, events) = ChannelObserver::unbounded();
    /// # let _ = (observer, events);
    /// ```
    pub fn unbounded() -> (Self, flume::Receiver<StepEvent>) {
        let (tx, rx) = flume::unbounded();
        (Self::new(tx), rx)
    }
}

#[async_trait]
impl StepObserver for ChannelObserver {
    async fn on_step(&self, node: &str, state: &WorkflowState) -> Result<(), ObserverError> {
        self.tx
            .send_async(StepEvent {
                node: node.to_string(),
                state: state.clone(),
            })
            .await
            .map_err(|_| ObserverError::ChannelClosed)
    }
}

/// Failures raised by a step observer.
#[derive(Debug, Error, Diagnostic)]
pub enum ObserverError {
    /// The streaming consumer disconnected.
    #[error("step channel closed: receiver dropped")]
    #[diagnostic(
        code(skeingraph::observer::channel_closed),
        help("The live-update consumer went away; the run is abandoned, not cancelled.")
    )]
    ChannelClosed,

    /// Any other transport-level failure while delivering a step.
    #[error("observer transport failure: {message}")]
    #[diagnostic(code(skeingraph::observer::transport))]
    Transport { message: String },
}
