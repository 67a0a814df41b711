//! Graph container: owns nodes and edges, enforces structural invariants.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::edge::{Edge, EdgeOpts};
use crate::node::Node;
use crate::{Error, Result};

/// Derived view of the edge population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraphMode {
    /// No edges yet.
    Init,
    /// Only directed edges.
    Directed,
    /// Only undirected edges.
    Undirected,
    /// Both kinds present.
    Mixed,
}

/// Aggregate counts plus density, the shape callers report on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub nr_nodes: usize,
    pub nr_dir_edges: usize,
    pub nr_und_edges: usize,
    pub mode: GraphMode,
    pub density: f64,
}

/// One `{neighbor, edge}` step out of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborEntry {
    pub node: String,
    pub edge: String,
}

/// Construction options for [`Graph::add_node_with`].
#[derive(Debug, Clone, Default)]
pub struct NodeOpts {
    pub label: Option<String>,
    pub features: Option<HashMap<String, Value>>,
}

/// Directed/undirected/mixed graph over string-identified nodes.
///
/// Both node and edge maps preserve insertion order; that order is the
/// canonical index order for every projection and algorithm in this crate.
/// Directed and undirected edges live in separate maps for fast per-kind
/// iteration.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    label: String,
    nodes: IndexMap<String, Node>,
    dir_edges: IndexMap<String, Edge>,
    und_edges: IndexMap<String, Edge>,
}

impl Graph {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            nodes: IndexMap::new(),
            dir_edges: IndexMap::new(),
            und_edges: IndexMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    // --- nodes ---

    pub fn add_node(&mut self, id: impl Into<String>) -> Result<()> {
        self.add_node_with(id, NodeOpts::default())
    }

    pub fn add_node_with(&mut self, id: impl Into<String>, opts: NodeOpts) -> Result<()> {
        let id = id.into();
        if self.nodes.contains_key(&id) {
            return Err(Error::Duplicate(format!("node {id}")));
        }
        let mut node = Node::new(id.clone());
        if let Some(label) = opts.label {
            node.set_label(label);
        }
        if let Some(features) = opts.features {
            node.set_features(features);
        }
        self.nodes.insert(id, node);
        Ok(())
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn nr_nodes(&self) -> usize {
        self.nodes.len()
    }

    // --- edges ---

    /// Insert a pre-built edge, wiring it into both endpoint nodes.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let id = edge.id().to_string();
        if self.dir_edges.contains_key(&id) || self.und_edges.contains_key(&id) {
            return Err(Error::Duplicate(format!("edge {id}")));
        }
        if !self.nodes.contains_key(edge.a()) || !self.nodes.contains_key(edge.b()) {
            return Err(Error::InvalidInput(format!(
                "edge {id}: endpoint missing ({} -> {})",
                edge.a(),
                edge.b()
            )));
        }

        // past the id and endpoint checks, wiring can only fail for a
        // repeated undirected self-loop, where a == b and one call runs
        let a = edge.a().to_string();
        let b = edge.b().to_string();
        self.node_mut_internal(&a)?.add_edge(&edge)?;
        if b != a {
            self.node_mut_internal(&b)?.add_edge(&edge)?;
        }

        if edge.is_directed() {
            self.dir_edges.insert(id, edge);
        } else {
            self.und_edges.insert(id, edge);
        }
        Ok(())
    }

    /// Build and insert an edge between two existing nodes.
    pub fn add_edge_with(
        &mut self,
        id: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        opts: EdgeOpts,
    ) -> Result<()> {
        self.add_edge(Edge::new(id, a, b, opts)?)
    }

    pub fn has_edge(&self, id: &str) -> bool {
        self.dir_edges.contains_key(id) || self.und_edges.contains_key(id)
    }

    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.dir_edges.get(id).or_else(|| self.und_edges.get(id))
    }

    /// Directed edges in insertion order.
    pub fn dir_edges(&self) -> impl Iterator<Item = &Edge> {
        self.dir_edges.values()
    }

    /// Undirected edges in insertion order.
    pub fn und_edges(&self) -> impl Iterator<Item = &Edge> {
        self.und_edges.values()
    }

    pub fn nr_dir_edges(&self) -> usize {
        self.dir_edges.len()
    }

    pub fn nr_und_edges(&self) -> usize {
        self.und_edges.len()
    }

    // --- deletion (cascading) ---

    /// Remove an edge from the graph and from both endpoint buckets.
    pub fn delete_edge(&mut self, id: &str) -> Result<Edge> {
        let edge = self
            .dir_edges
            .shift_remove(id)
            .or_else(|| self.und_edges.shift_remove(id))
            .ok_or_else(|| Error::NotFound(format!("edge {id}")))?;
        let a = edge.a().to_string();
        let b = edge.b().to_string();
        self.node_mut_internal(&a)?.remove_edge(&edge)?;
        if b != a {
            self.node_mut_internal(&b)?.remove_edge(&edge)?;
        }
        Ok(edge)
    }

    /// Remove a node after removing every incident edge.
    pub fn delete_node(&mut self, id: &str) -> Result<Node> {
        if !self.nodes.contains_key(id) {
            return Err(Error::NotFound(format!("node {id}")));
        }
        self.clear_in_edges(id)?;
        self.clear_out_edges(id)?;
        self.clear_und_edges(id)?;
        self.nodes
            .shift_remove(id)
            .ok_or_else(|| Error::InvariantViolation(format!("node {id} vanished mid-delete")))
    }

    /// Delete every edge currently in the node's incoming bucket.
    pub fn clear_in_edges(&mut self, id: &str) -> Result<()> {
        let ids: Vec<String> = self
            .node_internal(id)?
            .in_edge_ids()
            .map(str::to_string)
            .collect();
        for eid in ids {
            self.delete_edge(&eid)?;
        }
        Ok(())
    }

    /// Delete every edge currently in the node's outgoing bucket.
    pub fn clear_out_edges(&mut self, id: &str) -> Result<()> {
        let ids: Vec<String> = self
            .node_internal(id)?
            .out_edge_ids()
            .map(str::to_string)
            .collect();
        for eid in ids {
            self.delete_edge(&eid)?;
        }
        Ok(())
    }

    /// Delete every edge currently in the node's undirected bucket.
    pub fn clear_und_edges(&mut self, id: &str) -> Result<()> {
        let ids: Vec<String> = self
            .node_internal(id)?
            .und_edge_ids()
            .map(str::to_string)
            .collect();
        for eid in ids {
            self.delete_edge(&eid)?;
        }
        Ok(())
    }

    // --- derived views ---

    pub fn mode(&self) -> GraphMode {
        match (self.dir_edges.len(), self.und_edges.len()) {
            (0, 0) => GraphMode::Init,
            (_, 0) => GraphMode::Directed,
            (0, _) => GraphMode::Undirected,
            _ => GraphMode::Mixed,
        }
    }

    /// Edge density over ordered node pairs; an undirected edge covers both
    /// orientations.
    pub fn density(&self) -> f64 {
        let n = self.nodes.len();
        if n < 2 {
            return 0.0;
        }
        (self.dir_edges.len() + 2 * self.und_edges.len()) as f64 / (n * (n - 1)) as f64
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nr_nodes: self.nr_nodes(),
            nr_dir_edges: self.nr_dir_edges(),
            nr_und_edges: self.nr_und_edges(),
            mode: self.mode(),
            density: self.density(),
        }
    }

    // --- neighborhoods ---

    /// Sources of incoming directed edges.
    pub fn prev_nodes(&self, id: &str) -> Result<Vec<NeighborEntry>> {
        let node = self.node_internal(id)?;
        self.entries_for(id, node.in_edge_ids())
    }

    /// Targets of outgoing directed edges.
    pub fn next_nodes(&self, id: &str) -> Result<Vec<NeighborEntry>> {
        let node = self.node_internal(id)?;
        self.entries_for(id, node.out_edge_ids())
    }

    /// Opposite endpoints of undirected edges.
    pub fn conn_nodes(&self, id: &str) -> Result<Vec<NeighborEntry>> {
        let node = self.node_internal(id)?;
        self.entries_for(id, node.und_edge_ids())
    }

    /// Everything reachable in one step: `next_nodes ∪ conn_nodes`.
    pub fn reach_nodes(&self, id: &str) -> Result<Vec<NeighborEntry>> {
        let mut entries = self.next_nodes(id)?;
        entries.extend(self.conn_nodes(id)?);
        Ok(entries)
    }

    /// `prev_nodes ∪ next_nodes ∪ conn_nodes`. Multi-edges produce one entry
    /// per edge; deduplicate with [`crate::util::merge_by_identity`] if needed.
    pub fn all_neighbors(&self, id: &str) -> Result<Vec<NeighborEntry>> {
        let mut entries = self.prev_nodes(id)?;
        entries.extend(self.next_nodes(id)?);
        entries.extend(self.conn_nodes(id)?);
        Ok(entries)
    }

    fn entries_for<'a>(
        &self,
        id: &str,
        edge_ids: impl Iterator<Item = &'a str>,
    ) -> Result<Vec<NeighborEntry>> {
        let mut entries = Vec::new();
        for eid in edge_ids {
            let edge = self
                .get_edge(eid)
                .ok_or_else(|| Error::InvariantViolation(format!("dangling edge id {eid}")))?;
            let other = edge.other_end(id).ok_or_else(|| {
                Error::InvariantViolation(format!("edge {eid} registered on foreign node {id}"))
            })?;
            entries.push(NeighborEntry {
                node: other.to_string(),
                edge: eid.to_string(),
            });
        }
        Ok(entries)
    }

    fn node_internal(&self, id: &str) -> Result<&Node> {
        self.nodes
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("node {id}")))
    }

    fn node_mut_internal(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("node {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc_graph() -> Graph {
        let mut g = Graph::new("abc");
        g.add_node("A").unwrap();
        g.add_node("B").unwrap();
        g.add_node("C").unwrap();
        g
    }

    #[test]
    fn mode_transitions() {
        let mut g = abc_graph();
        assert_eq!(g.mode(), GraphMode::Init);
        g.add_edge_with("d1", "A", "B", EdgeOpts::directed()).unwrap();
        assert_eq!(g.mode(), GraphMode::Directed);
        g.add_edge_with("u1", "B", "C", EdgeOpts::default()).unwrap();
        assert_eq!(g.mode(), GraphMode::Mixed);
        g.delete_edge("d1").unwrap();
        assert_eq!(g.mode(), GraphMode::Undirected);
    }

    #[test]
    fn mixed_mode_stats() {
        let mut g = abc_graph();
        g.add_edge_with("d1", "A", "B", EdgeOpts::directed()).unwrap();
        g.add_edge_with("d2", "B", "C", EdgeOpts::directed()).unwrap();
        g.add_edge_with("u1", "A", "C", EdgeOpts::default()).unwrap();
        let stats = g.stats();
        assert_eq!(stats.mode, GraphMode::Mixed);
        assert_eq!(stats.nr_dir_edges, 2);
        assert_eq!(stats.nr_und_edges, 1);
        assert_eq!(stats.nr_nodes, 3);
        // 2 directed + 1 undirected (both ways) over 3*2 ordered pairs
        assert!((stats.density - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn add_then_delete_edge_restores_stats() {
        let mut g = abc_graph();
        g.add_edge_with("d1", "A", "B", EdgeOpts::directed()).unwrap();
        let before = g.stats();
        g.add_edge_with("u1", "B", "C", EdgeOpts::default()).unwrap();
        g.delete_edge("u1").unwrap();
        assert_eq!(g.stats(), before);
        assert_eq!(g.get_node("B").unwrap().und_degree(), 0);
    }

    #[test]
    fn edge_requires_existing_endpoints() {
        let mut g = abc_graph();
        let err = g
            .add_edge_with("e", "A", "Z", EdgeOpts::directed())
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidInput(_)));
        assert_eq!(g.nr_dir_edges(), 0);
    }

    #[test]
    fn duplicate_edge_id_rejected_across_kinds() {
        let mut g = abc_graph();
        g.add_edge_with("e", "A", "B", EdgeOpts::directed()).unwrap();
        let err = g.add_edge_with("e", "B", "C", EdgeOpts::default()).unwrap_err();
        assert!(matches!(err, crate::Error::Duplicate(_)));
    }

    #[test]
    fn delete_node_cascades_through_incident_edges() {
        let mut g = abc_graph();
        g.add_edge_with("d1", "A", "B", EdgeOpts::directed()).unwrap();
        g.add_edge_with("d2", "C", "B", EdgeOpts::directed()).unwrap();
        g.add_edge_with("u1", "B", "C", EdgeOpts::default()).unwrap();
        g.add_edge_with("loop", "B", "B", EdgeOpts::directed()).unwrap();

        g.delete_node("B").unwrap();
        assert_eq!(g.nr_nodes(), 2);
        assert_eq!(g.nr_dir_edges(), 0);
        assert_eq!(g.nr_und_edges(), 0);
        assert_eq!(g.get_node("A").unwrap().out_degree(), 0);
        assert_eq!(g.get_node("C").unwrap().in_degree(), 0);
        assert_eq!(g.get_node("C").unwrap().und_degree(), 0);
    }

    #[test]
    fn insertion_order_survives_deletion() {
        let mut g = Graph::new("ordered");
        for id in ["n3", "n1", "n4", "n2"] {
            g.add_node(id).unwrap();
        }
        g.delete_node("n1").unwrap();
        let ids: Vec<&str> = g.node_ids().collect();
        assert_eq!(ids, vec!["n3", "n4", "n2"]);
    }

    #[test]
    fn neighborhood_composition() {
        let mut g = abc_graph();
        g.add_node("D").unwrap();
        g.add_edge_with("in1", "B", "A", EdgeOpts::directed()).unwrap();
        g.add_edge_with("out1", "A", "C", EdgeOpts::directed()).unwrap();
        g.add_edge_with("u1", "A", "D", EdgeOpts::default()).unwrap();

        let prev = g.prev_nodes("A").unwrap();
        assert_eq!(prev, vec![NeighborEntry { node: "B".into(), edge: "in1".into() }]);

        let reach = g.reach_nodes("A").unwrap();
        let reach_nodes: Vec<&str> = reach.iter().map(|ne| ne.node.as_str()).collect();
        assert_eq!(reach_nodes, vec!["C", "D"]);

        let all = g.all_neighbors("A").unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn rejected_duplicate_leaves_buckets_untouched() {
        let mut g = Graph::new("dup");
        g.add_node("A").unwrap();
        g.add_node("B").unwrap();
        g.add_edge_with("u1", "A", "B", EdgeOpts::default()).unwrap();
        assert!(g.add_edge_with("u1", "A", "B", EdgeOpts::default()).is_err());
        assert_eq!(g.get_node("A").unwrap().und_degree(), 1);
        assert_eq!(g.get_node("B").unwrap().und_degree(), 1);
    }
}
