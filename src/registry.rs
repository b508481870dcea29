//! Process-wide graph catalog.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::graph::Graph;

/// Identifier a graph is registered under, generated at registration time.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(String);

impl GraphId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Transports carry ids as plain strings; let them convert without ceremony.
impl From<String> for GraphId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GraphId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Catalog mapping [`GraphId`]s to immutable graphs.
///
/// Created at process start, shared by reference with the driver and with
/// graph-building collaborators. Entries are never evicted for the life of
/// the process.
#[derive(Default)]
pub struct GraphRegistry {
    graphs: RwLock<FxHashMap<GraphId, Arc<Graph>>>,
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `graph` and hand back the generated id to run it under.
    pub fn register(&self, graph: Graph) -> GraphId {
        let id = GraphId::generate();
        self.graphs
            .write()
            .unwrap()
            .insert(id.clone(), Arc::new(graph));
        id
    }

    /// Fetch the graph registered under `id`.
    pub fn get(&self, id: &GraphId) -> Option<Arc<Graph>> {
        self.graphs.read().unwrap().get(id).cloned()
    }

    pub fn contains(&self, id: &GraphId) -> bool {
        self.graphs.read().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.graphs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
