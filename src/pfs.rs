//! Priority-first search: the generalized best-first traversal from which
//! Dijkstra and the centralities derive.
//!
//! Lifecycle joinpoints are a visitor trait with default no-op methods, so
//! an uninstrumented run pays nothing for the seam. The graph is borrowed
//! shared for the whole run; visitors cannot mutate structure by
//! construction.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use indexmap::IndexMap;

use crate::graph::{Graph, NeighborEntry};
use crate::{Error, Result};

/// Which neighborhood PFS expands from each settled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirMode {
    /// Outgoing directed edges.
    #[default]
    Out,
    /// Incoming directed edges.
    In,
    /// Undirected edges.
    Und,
    /// Reach set: outgoing plus undirected.
    Mixed,
}

#[derive(Debug, Clone, Default)]
pub struct PfsConfig {
    pub dir_mode: DirMode,
    /// Early-termination target.
    pub goal: Option<String>,
    /// When unset every relaxation costs `1`.
    pub weighted: bool,
}

impl PfsConfig {
    pub fn weighted_out() -> Self {
        Self {
            dir_mode: DirMode::Out,
            goal: None,
            weighted: true,
        }
    }
}

/// Per-node search state in the result map.
#[derive(Debug, Clone, PartialEq)]
pub struct PfsEntry {
    pub distance: f64,
    pub parent: Option<String>,
    /// Discovery order; `-1` until first encountered, `0` for the source.
    pub counter: i64,
}

impl PfsEntry {
    fn unreached() -> Self {
        Self {
            distance: f64::INFINITY,
            parent: None,
            counter: -1,
        }
    }
}

/// Snapshot handed to visitor joinpoints during relaxation.
#[derive(Debug)]
pub struct PfsScope<'a> {
    pub root: &'a str,
    pub current: &'a str,
    pub next: &'a NeighborEntry,
    pub adj_dist: f64,
    pub proposed_dist: f64,
    pub best_dist: f64,
}

/// Joinpoints of one PFS run. All methods default to no-ops; implement the
/// ones you need.
pub trait PfsVisitor {
    /// Once, after the result map is initialized.
    fn on_init(&mut self, _root: &str) {}
    /// A candidate is seen for the first time.
    fn on_not_encountered(&mut self, _scope: &PfsScope) {}
    /// A candidate's distance strictly improved.
    fn on_node_open(&mut self, _scope: &PfsScope) {}
    /// The proposed path ties the known distance.
    fn on_node_closed(&mut self, _scope: &PfsScope) {}
    /// A known candidate improved (fired before `on_node_open`).
    fn on_better_path(&mut self, _scope: &PfsScope) {}
    /// The goal node was popped.
    fn on_goal_reached(&mut self, _goal: &str, _distance: f64) {}
}

/// Visitor that observes nothing.
pub struct NoopVisitor;

impl PfsVisitor for NoopVisitor {}

/// Min-heap entry; orders non-negative distances through their bit
/// representation, smallest priority first, node id as the deterministic
/// tie-break.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueueEntry {
    priority_bits: u64,
    node: String,
}

impl QueueEntry {
    fn new(node: String, priority: f64) -> Self {
        Self {
            priority_bits: priority.to_bits(),
            node,
        }
    }

    fn priority(&self) -> f64 {
        f64::from_bits(self.priority_bits)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority_bits
            .cmp(&self.priority_bits)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Priority-first search from `source`.
///
/// Returns the full result map in node insertion order; unreachable nodes
/// keep `{∞, None, -1}`. Ties keep the earliest-discovered parent. Negative
/// weights are rejected as a config error when encountered.
pub fn pfs<V: PfsVisitor>(
    g: &Graph,
    source: &str,
    config: &PfsConfig,
    visitor: &mut V,
) -> Result<IndexMap<String, PfsEntry>> {
    if !g.has_node(source) {
        return Err(Error::NotFound(format!("source node {source}")));
    }
    if let Some(goal) = &config.goal {
        if !g.has_node(goal) {
            return Err(Error::NotFound(format!("goal node {goal}")));
        }
    }

    let mut result: IndexMap<String, PfsEntry> = g
        .node_ids()
        .map(|id| (id.to_string(), PfsEntry::unreached()))
        .collect();
    result[source] = PfsEntry {
        distance: 0.0,
        parent: Some(source.to_string()),
        counter: 0,
    };
    let mut counter: i64 = 0;

    visitor.on_init(source);

    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry::new(source.to_string(), 0.0));

    while let Some(entry) = heap.pop() {
        let entry_priority = entry.priority();
        let current = entry.node;
        let current_dist = result[current.as_str()].distance;
        if entry_priority > current_dist {
            // superseded queue entry
            continue;
        }
        if config.goal.as_deref() == Some(current.as_str()) {
            visitor.on_goal_reached(&current, current_dist);
            return Ok(result);
        }

        let neighbors = match config.dir_mode {
            DirMode::Out => g.next_nodes(&current)?,
            DirMode::In => g.prev_nodes(&current)?,
            DirMode::Und => g.conn_nodes(&current)?,
            DirMode::Mixed => g.reach_nodes(&current)?,
        };

        for ne in &neighbors {
            let edge = g
                .get_edge(&ne.edge)
                .ok_or_else(|| Error::InvariantViolation(format!("dangling edge id {}", ne.edge)))?;
            let w = if config.weighted {
                edge.effective_weight()
            } else {
                1.0
            };
            if w < 0.0 {
                return Err(Error::Config(format!(
                    "negative weight {w} on edge {}",
                    ne.edge
                )));
            }
            let proposed = current_dist + w;
            if proposed == f64::INFINITY {
                // an infinite proposal (sentinel-weight edge) improves nothing
                continue;
            }
            let adj = result[ne.node.as_str()].distance;
            let scope = PfsScope {
                root: source,
                current: &current,
                next: ne,
                adj_dist: adj,
                proposed_dist: proposed,
                best_dist: adj.min(proposed),
            };

            if adj == f64::INFINITY {
                counter += 1;
                result[ne.node.as_str()] = PfsEntry {
                    distance: proposed,
                    parent: Some(current.clone()),
                    counter,
                };
                heap.push(QueueEntry::new(ne.node.clone(), proposed));
                visitor.on_not_encountered(&scope);
                visitor.on_node_open(&scope);
            } else if proposed < adj {
                let state = &mut result[ne.node.as_str()];
                state.distance = proposed;
                state.parent = Some(current.clone());
                heap.push(QueueEntry::new(ne.node.clone(), proposed));
                visitor.on_better_path(&scope);
                visitor.on_node_open(&scope);
            } else if proposed == adj {
                visitor.on_node_closed(&scope);
            }
        }
    }

    Ok(result)
}

/// Single-source shortest paths: PFS over outgoing edges with weights on,
/// optionally stopping at `goal`.
pub fn dijkstra(
    g: &Graph,
    source: &str,
    goal: Option<&str>,
) -> Result<IndexMap<String, PfsEntry>> {
    let config = PfsConfig {
        goal: goal.map(str::to_string),
        ..PfsConfig::weighted_out()
    };
    pfs(g, source, &config, &mut NoopVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeOpts;

    fn weighted(w: f64) -> EdgeOpts {
        EdgeOpts::weighted(w, true)
    }

    /// A -> B(1), A -> C(4), B -> C(2), B -> D(6), C -> D(3)
    fn classic() -> Graph {
        let mut g = Graph::new("classic");
        for id in ["A", "B", "C", "D"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("ab", "A", "B", weighted(1.0)).unwrap();
        g.add_edge_with("ac", "A", "C", weighted(4.0)).unwrap();
        g.add_edge_with("bc", "B", "C", weighted(2.0)).unwrap();
        g.add_edge_with("bd", "B", "D", weighted(6.0)).unwrap();
        g.add_edge_with("cd", "C", "D", weighted(3.0)).unwrap();
        g
    }

    #[test]
    fn dijkstra_classic_distances_and_parents() {
        let g = classic();
        let result = dijkstra(&g, "A", None).unwrap();
        assert_eq!(result["A"].distance, 0.0);
        assert_eq!(result["B"].distance, 1.0);
        assert_eq!(result["C"].distance, 3.0);
        assert_eq!(result["D"].distance, 6.0);
        assert_eq!(result["A"].parent.as_deref(), Some("A"));
        assert_eq!(result["B"].parent.as_deref(), Some("A"));
        assert_eq!(result["C"].parent.as_deref(), Some("B"));
        assert_eq!(result["D"].parent.as_deref(), Some("C"));
    }

    #[test]
    fn unreachable_nodes_keep_infinity() {
        let mut g = classic();
        g.add_node("Z").unwrap();
        let result = dijkstra(&g, "A", None).unwrap();
        assert_eq!(result["Z"].distance, f64::INFINITY);
        assert_eq!(result["Z"].parent, None);
        assert_eq!(result["Z"].counter, -1);
    }

    #[test]
    fn result_map_follows_insertion_order() {
        let g = classic();
        let result = dijkstra(&g, "A", None).unwrap();
        let ids: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn ties_keep_earliest_discovered_parent() {
        let mut g = Graph::new("tie");
        for id in ["A", "B", "C", "D"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("ab", "A", "B", weighted(1.0)).unwrap();
        g.add_edge_with("ac", "A", "C", weighted(1.0)).unwrap();
        g.add_edge_with("bd", "B", "D", weighted(1.0)).unwrap();
        g.add_edge_with("cd", "C", "D", weighted(1.0)).unwrap();
        let result = dijkstra(&g, "A", None).unwrap();
        assert_eq!(result["D"].distance, 2.0);
        assert_eq!(result["D"].parent.as_deref(), Some("B"));
    }

    #[test]
    fn goal_terminates_early() {
        struct GoalSpy {
            reached: Option<(String, f64)>,
        }
        impl PfsVisitor for GoalSpy {
            fn on_goal_reached(&mut self, goal: &str, distance: f64) {
                self.reached = Some((goal.to_string(), distance));
            }
        }

        let g = classic();
        let config = PfsConfig {
            goal: Some("C".to_string()),
            ..PfsConfig::weighted_out()
        };
        let mut spy = GoalSpy { reached: None };
        let result = pfs(&g, "A", &config, &mut spy).unwrap();
        assert_eq!(spy.reached, Some(("C".to_string(), 3.0)));
        // D was queued but never settled via C
        assert_eq!(result["D"].distance, 7.0);
    }

    #[test]
    fn unweighted_mode_counts_hops() {
        let g = classic();
        let config = PfsConfig {
            dir_mode: DirMode::Out,
            goal: None,
            weighted: false,
        };
        let result = pfs(&g, "A", &config, &mut NoopVisitor).unwrap();
        assert_eq!(result["D"].distance, 2.0);
    }

    #[test]
    fn mixed_mode_follows_undirected_edges() {
        let mut g = Graph::new("mixed");
        for id in ["A", "B", "C"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("ab", "A", "B", weighted(1.0)).unwrap();
        let und = EdgeOpts {
            weighted: true,
            weight: Some(2.0),
            ..EdgeOpts::default()
        };
        g.add_edge_with("bc", "B", "C", und).unwrap();

        let out = pfs(&g, "A", &PfsConfig::weighted_out(), &mut NoopVisitor).unwrap();
        assert_eq!(out["C"].distance, f64::INFINITY);

        let config = PfsConfig {
            dir_mode: DirMode::Mixed,
            ..PfsConfig::weighted_out()
        };
        let mixed = pfs(&g, "A", &config, &mut NoopVisitor).unwrap();
        assert_eq!(mixed["C"].distance, 3.0);
    }

    #[test]
    fn in_mode_walks_edges_backwards() {
        let g = classic();
        let config = PfsConfig {
            dir_mode: DirMode::In,
            ..PfsConfig::weighted_out()
        };
        let result = pfs(&g, "D", &config, &mut NoopVisitor).unwrap();
        assert_eq!(result["C"].distance, 3.0);
        assert_eq!(result["A"].distance, 6.0);
    }

    #[test]
    fn sentinel_infinity_edges_never_settle_targets() {
        let mut g = Graph::new("inf");
        for id in ["A", "B", "C"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("ab", "A", "B", weighted(f64::INFINITY)).unwrap();
        g.add_edge_with("ba", "B", "A", weighted(f64::INFINITY)).unwrap();
        g.add_edge_with("ac", "A", "C", weighted(2.0)).unwrap();
        let result = dijkstra(&g, "A", None).unwrap();
        assert_eq!(result["C"].distance, 2.0);
        assert_eq!(result["B"].distance, f64::INFINITY);
        assert_eq!(result["B"].counter, -1);
    }

    #[test]
    fn negative_weight_is_a_config_error() {
        let mut g = Graph::new("neg");
        g.add_node("A").unwrap();
        g.add_node("B").unwrap();
        g.add_edge_with("ab", "A", "B", weighted(-1.0)).unwrap();
        let err = dijkstra(&g, "A", None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_source_is_not_found() {
        let g = classic();
        let err = dijkstra(&g, "nope", None).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn visitor_sees_every_joinpoint() {
        #[derive(Default)]
        struct Counting {
            init: usize,
            not_encountered: usize,
            open: usize,
            closed: usize,
            better: usize,
        }
        impl PfsVisitor for Counting {
            fn on_init(&mut self, _root: &str) {
                self.init += 1;
            }
            fn on_not_encountered(&mut self, _scope: &PfsScope) {
                self.not_encountered += 1;
            }
            fn on_node_open(&mut self, _scope: &PfsScope) {
                self.open += 1;
            }
            fn on_node_closed(&mut self, _scope: &PfsScope) {
                self.closed += 1;
            }
            fn on_better_path(&mut self, _scope: &PfsScope) {
                self.better += 1;
            }
        }

        let g = classic();
        let mut counting = Counting::default();
        pfs(&g, "A", &PfsConfig::weighted_out(), &mut counting).unwrap();
        assert_eq!(counting.init, 1);
        assert_eq!(counting.not_encountered, 3);
        // C improves via B (4 -> 3), D improves via C (7 -> 6)
        assert_eq!(counting.better, 2);
        assert_eq!(counting.open, counting.not_encountered + counting.better);
        assert_eq!(counting.closed, 0);
    }

    #[test]
    fn discovery_counters_are_sequential() {
        let g = classic();
        let result = dijkstra(&g, "A", None).unwrap();
        let mut counters: Vec<i64> = result.values().map(|e| e.counter).collect();
        counters.sort_unstable();
        assert_eq!(counters, vec![0, 1, 2, 3]);
    }
}
