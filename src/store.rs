//! Run store: process-wide snapshot and log registries keyed by run id.
//!
//! Any collaborator may query the store during or after a run. The log kept
//! here is the driver's own copy (one "Running node: X" marker per step)
//! and is independent of the state's `log` field, which nodes also append
//! to. The two lists are parallel but not identical.

use chrono::{DateTime, Utc};
use miette::Diagnostic;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::RwLock;
use thiserror::Error;
use uuid::Uuid;

use crate::state::WorkflowState;

/// Identifier for one execution of a graph, generated at run start.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RunId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Store lookup failures.
#[derive(Debug, Error, Diagnostic)]
pub enum RunStoreError {
    /// No run was ever recorded under this id.
    #[error("run not found: {run_id}")]
    #[diagnostic(
        code(skeingraph::store::run_not_found),
        help("Run ids are generated at run start and returned by the driver.")
    )]
    RunNotFound { run_id: RunId },
}

/// Latest-snapshot and run-log registries.
///
/// Writes are keyed per run id and never conflict across distinct ids; a
/// run id is produced and written by exactly one driver invocation, so the
/// per-entry last-writer-wins replacement behind the lock is the only
/// synchronization. Entries are never deleted; unbounded growth is an
/// accepted property of this design, and eviction belongs to an outer layer.
#[derive(Default)]
pub struct RunStore {
    snapshots: RwLock<FxHashMap<RunId, WorkflowState>>,
    logs: RwLock<FxHashMap<RunId, Vec<String>>>,
    started: RwLock<FxHashMap<RunId, DateTime<Utc>>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the registries for a new run: the initial snapshot, an empty
    /// log, and the start timestamp.
    pub fn create(&self, run_id: &RunId, initial: WorkflowState) {
        self.snapshots
            .write()
            .unwrap()
            .insert(run_id.clone(), initial);
        self.logs.write().unwrap().insert(run_id.clone(), Vec::new());
        self.started.write().unwrap().insert(run_id.clone(), Utc::now());
    }

    /// Overwrite the latest snapshot for `run_id`.
    pub fn record_snapshot(&self, run_id: &RunId, state: WorkflowState) {
        self.snapshots.write().unwrap().insert(run_id.clone(), state);
    }

    /// Append one line to the run's independent log.
    pub fn append_log(&self, run_id: &RunId, line: impl Into<String>) {
        self.logs
            .write()
            .unwrap()
            .entry(run_id.clone())
            .or_default()
            .push(line.into());
    }

    /// Latest state snapshot for `run_id`.
    pub fn snapshot(&self, run_id: &RunId) -> Result<WorkflowState, RunStoreError> {
        self.snapshots
            .read()
            .unwrap()
            .get(run_id)
            .cloned()
            .ok_or_else(|| RunStoreError::RunNotFound {
                run_id: run_id.clone(),
            })
    }

    /// The driver's log for `run_id`, one line per node invocation.
    pub fn log(&self, run_id: &RunId) -> Result<Vec<String>, RunStoreError> {
        self.logs
            .read()
            .unwrap()
            .get(run_id)
            .cloned()
            .ok_or_else(|| RunStoreError::RunNotFound {
                run_id: run_id.clone(),
            })
    }

    /// When the run was registered.
    pub fn started_at(&self, run_id: &RunId) -> Result<DateTime<Utc>, RunStoreError> {
        self.started
            .read()
            .unwrap()
            .get(run_id)
            .copied()
            .ok_or_else(|| RunStoreError::RunNotFound {
                run_id: run_id.clone(),
            })
    }

    pub fn contains(&self, run_id: &RunId) -> bool {
        self.snapshots.read().unwrap().contains_key(run_id)
    }

    /// Ids of every run recorded so far, in no particular order.
    pub fn run_ids(&self) -> Vec<RunId> {
        self.snapshots.read().unwrap().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
