//! Node primitive: identity, feature bag, edge buckets and degree counters.

use std::collections::HashMap;

use indexmap::IndexSet;
use serde_json::Value;

use crate::edge::Edge;
use crate::{Error, Result};

/// A node owned by a [`Graph`](crate::Graph).
///
/// Incident edges are tracked by id in three insertion-ordered buckets
/// (incoming, outgoing, undirected); a directed self-loop sits in both the
/// incoming and outgoing bucket. Degree accessors read the bucket sizes
/// directly, so the counter/bucket invariant holds by construction.
#[derive(Debug, Clone)]
pub struct Node {
    id: String,
    label: String,
    features: HashMap<String, Value>,
    in_edges: IndexSet<String>,
    out_edges: IndexSet<String>,
    und_edges: IndexSet<String>,
    self_degree: usize,
    und_self_loops: usize,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            features: HashMap::new(),
            in_edges: IndexSet::new(),
            out_edges: IndexSet::new(),
            und_edges: IndexSet::new(),
            self_degree: 0,
            und_self_loops: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    // --- feature bag ---

    pub fn features(&self) -> &HashMap<String, Value> {
        &self.features
    }

    pub fn get_feature(&self, key: &str) -> Option<&Value> {
        self.features.get(key)
    }

    pub fn set_feature(&mut self, key: impl Into<String>, value: Value) {
        self.features.insert(key.into(), value);
    }

    pub fn delete_feature(&mut self, key: &str) -> Option<Value> {
        self.features.remove(key)
    }

    pub fn clear_features(&mut self) {
        self.features.clear();
    }

    pub fn set_features(&mut self, features: HashMap<String, Value>) {
        self.features = features;
    }

    // --- degrees ---

    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    pub fn und_degree(&self) -> usize {
        self.und_edges.len()
    }

    /// Number of incident self-loop edges (directed or undirected).
    pub fn self_degree(&self) -> usize {
        self.self_degree
    }

    // --- edge buckets ---

    pub fn has_edge(&self, edge_id: &str) -> bool {
        self.in_edges.contains(edge_id)
            || self.out_edges.contains(edge_id)
            || self.und_edges.contains(edge_id)
    }

    pub fn in_edge_ids(&self) -> impl Iterator<Item = &str> {
        self.in_edges.iter().map(String::as_str)
    }

    pub fn out_edge_ids(&self) -> impl Iterator<Item = &str> {
        self.out_edges.iter().map(String::as_str)
    }

    pub fn und_edge_ids(&self) -> impl Iterator<Item = &str> {
        self.und_edges.iter().map(String::as_str)
    }

    /// Directed edges incident to this node, in then out, deduplicated
    /// (a directed self-loop appears once).
    pub fn dir_edge_ids(&self) -> Vec<&str> {
        let mut ids: IndexSet<&str> = self.in_edges.iter().map(String::as_str).collect();
        ids.extend(self.out_edges.iter().map(String::as_str));
        ids.into_iter().collect()
    }

    /// All incident edge ids, directed then undirected.
    pub fn all_edge_ids(&self) -> Vec<&str> {
        let mut ids = self.dir_edge_ids();
        ids.extend(self.und_edges.iter().map(String::as_str));
        ids
    }

    /// Register an incident edge.
    ///
    /// Bucket rules: a directed edge with tail here goes to the outgoing
    /// bucket (and also to incoming when it is a self-loop); a directed edge
    /// with only the head here goes to the incoming bucket. An undirected
    /// edge goes to the undirected bucket once; a second undirected self-loop
    /// on the same node is rejected.
    pub fn add_edge(&mut self, edge: &Edge) -> Result<()> {
        if !edge.touches(&self.id) {
            return Err(Error::InvalidInput(format!(
                "edge {} does not touch node {}",
                edge.id(),
                self.id
            )));
        }
        if edge.is_directed() {
            if edge.a() == self.id {
                if !self.out_edges.insert(edge.id().to_string()) {
                    return Err(Error::Duplicate(format!(
                        "edge {} already on node {}",
                        edge.id(),
                        self.id
                    )));
                }
                if edge.b() == self.id {
                    self.in_edges.insert(edge.id().to_string());
                    self.self_degree += 1;
                }
            } else if !self.in_edges.insert(edge.id().to_string()) {
                return Err(Error::Duplicate(format!(
                    "edge {} already on node {}",
                    edge.id(),
                    self.id
                )));
            }
        } else {
            if edge.is_self_loop() && self.und_self_loops > 0 {
                return Err(Error::InvalidInput(format!(
                    "undirected self-loop already present on node {}",
                    self.id
                )));
            }
            if !self.und_edges.insert(edge.id().to_string()) {
                return Err(Error::Duplicate(format!(
                    "edge {} already on node {}",
                    edge.id(),
                    self.id
                )));
            }
            if edge.is_self_loop() {
                self.self_degree += 1;
                self.und_self_loops += 1;
            }
        }
        Ok(())
    }

    /// Drop an incident edge from every bucket it occupies.
    pub fn remove_edge(&mut self, edge: &Edge) -> Result<()> {
        let id = edge.id();
        let mut removed = false;
        removed |= self.in_edges.shift_remove(id);
        removed |= self.out_edges.shift_remove(id);
        removed |= self.und_edges.shift_remove(id);
        if !removed {
            return Err(Error::NotFound(format!(
                "edge {id} not registered on node {}",
                self.id
            )));
        }
        if edge.is_self_loop() {
            self.self_degree -= 1;
            if !edge.is_directed() {
                self.und_self_loops -= 1;
            }
        }
        Ok(())
    }
}
