//! Typed overlay: nodes and edges grouped into label-derived type buckets.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::edge::{Edge, EdgeOpts};
use crate::graph::{Graph, GraphStats, NodeOpts};
use crate::node::Node;
use crate::Result;

/// Bucket for entities whose label equals their id.
pub const GENERIC_TYPE: &str = "GENERIC";

/// [`GraphStats`] plus per-type entity counts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedGraphStats {
    #[serde(flatten)]
    pub base: GraphStats,
    pub typed_nodes: IndexMap<String, usize>,
    pub typed_edges: IndexMap<String, usize>,
}

/// A [`Graph`] with a type overlay.
///
/// Every mutation delegates to the base graph first, then adjusts the
/// overlay. Each node/edge lives in exactly one type bucket (the uppercased
/// label, or [`GENERIC_TYPE`] when the label equals the id), and a bucket
/// entry is dropped as soon as it empties.
#[derive(Debug, Clone, Default)]
pub struct TypedGraph {
    base: Graph,
    typed_nodes: IndexMap<String, IndexSet<String>>,
    typed_edges: IndexMap<String, IndexSet<String>>,
}

fn type_bucket(label: &str, id: &str) -> String {
    if label == id {
        GENERIC_TYPE.to_string()
    } else {
        label.to_uppercase()
    }
}

impl TypedGraph {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            base: Graph::new(label),
            typed_nodes: IndexMap::new(),
            typed_edges: IndexMap::new(),
        }
    }

    /// Read access to the underlying graph. Mutations must go through this
    /// wrapper so the overlay stays consistent.
    pub fn graph(&self) -> &Graph {
        &self.base
    }

    pub fn add_node(&mut self, id: impl Into<String>) -> Result<()> {
        self.add_node_with(id, NodeOpts::default())
    }

    pub fn add_node_with(&mut self, id: impl Into<String>, opts: NodeOpts) -> Result<()> {
        let id = id.into();
        self.base.add_node_with(id.clone(), opts)?;
        let bucket = match self.base.get_node(&id) {
            Some(node) => type_bucket(node.label(), node.id()),
            None => GENERIC_TYPE.to_string(),
        };
        self.typed_nodes.entry(bucket).or_default().insert(id);
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let id = edge.id().to_string();
        let bucket = type_bucket(edge.label(), edge.id());
        self.base.add_edge(edge)?;
        self.typed_edges.entry(bucket).or_default().insert(id);
        Ok(())
    }

    pub fn add_edge_with(
        &mut self,
        id: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        opts: EdgeOpts,
    ) -> Result<()> {
        self.add_edge(Edge::new(id, a, b, opts)?)
    }

    pub fn delete_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self.base.delete_edge(id)?;
        self.remove_edge_entry(&type_bucket(edge.label(), edge.id()), id);
        Ok(edge)
    }

    pub fn delete_node(&mut self, id: &str) -> Result<Node> {
        // Capture the incident edges' buckets before the cascade removes them.
        let incident: Vec<(String, String)> = match self.base.get_node(id) {
            Some(node) => node
                .all_edge_ids()
                .iter()
                .filter_map(|eid| {
                    self.base
                        .get_edge(eid)
                        .map(|e| (type_bucket(e.label(), e.id()), (*eid).to_string()))
                })
                .collect(),
            None => Vec::new(),
        };
        let node = self.base.delete_node(id)?;
        for (bucket, eid) in incident {
            self.remove_edge_entry(&bucket, &eid);
        }
        let node_bucket = type_bucket(node.label(), node.id());
        if let Some(ids) = self.typed_nodes.get_mut(&node_bucket) {
            ids.shift_remove(id);
            if ids.is_empty() {
                self.typed_nodes.shift_remove(&node_bucket);
            }
        }
        Ok(node)
    }

    fn remove_edge_entry(&mut self, bucket: &str, id: &str) {
        if let Some(ids) = self.typed_edges.get_mut(bucket) {
            ids.shift_remove(id);
            if ids.is_empty() {
                self.typed_edges.shift_remove(bucket);
            }
        }
    }

    /// Node type names, in first-use order.
    pub fn node_types(&self) -> impl Iterator<Item = &str> {
        self.typed_nodes.keys().map(String::as_str)
    }

    /// Edge type names, in first-use order.
    pub fn edge_types(&self) -> impl Iterator<Item = &str> {
        self.typed_edges.keys().map(String::as_str)
    }

    pub fn nr_typed_nodes(&self, node_type: &str) -> usize {
        self.typed_nodes
            .get(&node_type.to_uppercase())
            .map_or(0, IndexSet::len)
    }

    pub fn nr_typed_edges(&self, edge_type: &str) -> usize {
        self.typed_edges
            .get(&edge_type.to_uppercase())
            .map_or(0, IndexSet::len)
    }

    /// Ids in a node type bucket, insertion-ordered.
    pub fn nodes_of_type(&self, node_type: &str) -> impl Iterator<Item = &str> {
        self.typed_nodes
            .get(&node_type.to_uppercase())
            .into_iter()
            .flat_map(|ids| ids.iter().map(String::as_str))
    }

    pub fn stats(&self) -> TypedGraphStats {
        TypedGraphStats {
            base: self.base.stats(),
            typed_nodes: self
                .typed_nodes
                .iter()
                .map(|(ty, ids)| (ty.clone(), ids.len()))
                .collect(),
            typed_edges: self
                .typed_edges
                .iter()
                .map(|(ty, ids)| (ty.clone(), ids.len()))
                .collect(),
        }
    }
}
