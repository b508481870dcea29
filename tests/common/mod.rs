#![allow(dead_code)]

//! Shared test nodes and observers for the integration suites.

use async_trait::async_trait;
use std::sync::Mutex;

use skeingraph::node::{Node, NodeError};
use skeingraph::observer::{ObserverError, StepObserver};
use skeingraph::state::WorkflowState;

/// Passes the state through after appending `ran:<tag>` to its log.
pub struct TagNode {
    pub tag: &'static str,
}

#[async_trait]
impl Node for TagNode {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.push_log(format!("ran:{}", self.tag));
        Ok(state)
    }
}

/// Counts visits by pushing a marker chunk; flips `done` at `limit` visits.
/// Used to bound cyclic graphs.
pub struct CounterNode {
    pub limit: usize,
}

#[async_trait]
impl Node for CounterNode {
    async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, NodeError> {
        state.chunks.push("tick".to_string());
        if state.chunks.len() >= self.limit {
            state.done = true;
        }
        Ok(state)
    }
}

/// Fails on every invocation.
pub struct FailingNode;

#[async_trait]
impl Node for FailingNode {
    async fn run(&self, _state: WorkflowState) -> Result<WorkflowState, NodeError> {
        Err(NodeError::InvalidInput("forced failure".to_string()))
    }
}

/// Records every `(node, state)` notification in memory.
#[derive(Default)]
pub struct RecordingObserver {
    calls: Mutex<Vec<(String, WorkflowState)>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, WorkflowState)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn nodes(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(node, _)| node.clone())
            .collect()
    }
}

#[async_trait]
impl StepObserver for RecordingObserver {
    async fn on_step(&self, node: &str, state: &WorkflowState) -> Result<(), ObserverError> {
        self.calls
            .lock()
            .unwrap()
            .push((node.to_string(), state.clone()));
        Ok(())
    }
}

/// Fails every notification, simulating a dead streaming consumer.
pub struct FailingObserver;

#[async_trait]
impl StepObserver for FailingObserver {
    async fn on_step(&self, _node: &str, _state: &WorkflowState) -> Result<(), ObserverError> {
        Err(ObserverError::Transport {
            message: "consumer gone".to_string(),
        })
    }
}
