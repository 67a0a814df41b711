//! Projections of a graph into sparse and dense numeric forms.
//!
//! Every projection shares the canonical node ordering (insertion order),
//! so downstream numeric code can map matrix indices back to node ids
//! through [`node_index`] unambiguously.

use indexmap::IndexMap;

use crate::graph::Graph;
use crate::{Error, Result};

/// Side table from node id to its canonical index.
pub fn node_index(g: &Graph) -> IndexMap<String, usize> {
    g.node_ids()
        .enumerate()
        .map(|(i, id)| (id.to_string(), i))
        .collect()
}

/// Per-node neighbor-weight mapping (`u -> v -> w`).
///
/// The iteration domain per node is its reach set, extended with its
/// predecessors when `incoming` is set; in that case every entry is also
/// mirrored to `result[v][u]`, producing the symmetric view. Parallel edges
/// keep the minimum weight. Self-loop entries are not emitted; the diagonal
/// is exactly `self_dist` when `include_self` is set and absent otherwise.
pub fn adj_list_w(
    g: &Graph,
    incoming: bool,
    include_self: bool,
    self_dist: f64,
) -> Result<IndexMap<String, IndexMap<String, f64>>> {
    let mut adj: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
    for id in g.node_ids() {
        let mut row = IndexMap::new();
        if include_self {
            row.insert(id.to_string(), self_dist);
        }
        adj.insert(id.to_string(), row);
    }

    let ids: Vec<String> = g.node_ids().map(str::to_string).collect();
    for uid in &ids {
        let mut domain = g.reach_nodes(uid)?;
        if incoming {
            domain.extend(g.prev_nodes(uid)?);
        }
        for ne in &domain {
            if ne.node == *uid {
                // the diagonal belongs to the include_self seed alone
                continue;
            }
            let edge = g
                .get_edge(&ne.edge)
                .ok_or_else(|| Error::InvariantViolation(format!("dangling edge id {}", ne.edge)))?;
            let w = edge.effective_weight();
            min_insert(&mut adj, uid, &ne.node, w);
            if incoming {
                min_insert(&mut adj, &ne.node, uid, w);
            }
        }
    }
    Ok(adj)
}

fn min_insert(adj: &mut IndexMap<String, IndexMap<String, f64>>, u: &str, v: &str, w: f64) {
    let row = adj.entry(u.to_string()).or_default();
    match row.get_mut(v) {
        Some(existing) => {
            if w < *existing {
                *existing = w;
            }
        }
        None => {
            row.insert(v.to_string(), w);
        }
    }
}

/// Binary adjacency matrix in canonical node order. `(i, j)` is `1` iff a
/// finite-weight edge connects them; the diagonal is always `0`.
pub fn adj_matrix(g: &Graph) -> Result<Vec<Vec<u8>>> {
    let index = node_index(g);
    let n = index.len();
    let adj = adj_list_w(g, false, false, 0.0)?;
    let mut m = vec![vec![0u8; n]; n];
    for (u, row) in &adj {
        let i = index[u.as_str()];
        for (v, w) in row {
            let j = index[v.as_str()];
            if i != j && w.is_finite() {
                m[i][j] = 1;
            }
        }
    }
    Ok(m)
}

/// Weighted adjacency matrix in canonical node order; `f64::INFINITY` is the
/// no-edge sentinel.
pub fn adj_matrix_w(
    g: &Graph,
    incoming: bool,
    include_self: bool,
    self_dist: f64,
) -> Result<Vec<Vec<f64>>> {
    let index = node_index(g);
    let n = index.len();
    let adj = adj_list_w(g, incoming, include_self, self_dist)?;
    let mut m = vec![vec![f64::INFINITY; n]; n];
    for (u, row) in &adj {
        let i = index[u.as_str()];
        for (v, w) in row {
            m[i][index[v.as_str()]] = *w;
        }
    }
    Ok(m)
}

/// Successor seed matrix for all-pairs path reconstruction: cell `(i, j)`
/// holds `[j]` on the diagonal and where `j` is reachable in one hop, and is
/// empty otherwise.
pub fn next_array(g: &Graph, incoming: bool) -> Result<Vec<Vec<Vec<usize>>>> {
    let index = node_index(g);
    let n = index.len();
    let adj = adj_list_w(g, incoming, true, 0.0)?;
    let mut next = vec![vec![Vec::new(); n]; n];
    for (u, row) in &adj {
        let i = index[u.as_str()];
        for (v, w) in row {
            let j = index[v.as_str()];
            if i == j || w.is_finite() {
                next[i][j] = vec![j];
            }
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeOpts;

    fn weighted(w: f64) -> EdgeOpts {
        EdgeOpts::weighted(w, true)
    }

    fn diamond() -> Graph {
        let mut g = Graph::new("diamond");
        for id in ["A", "B", "C", "D"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("ab", "A", "B", weighted(1.0)).unwrap();
        g.add_edge_with("ac", "A", "C", weighted(4.0)).unwrap();
        g.add_edge_with("bc", "B", "C", weighted(2.0)).unwrap();
        g.add_edge_with("cd", "C", "D", weighted(3.0)).unwrap();
        g
    }

    #[test]
    fn rows_follow_insertion_order() {
        let g = diamond();
        let adj = adj_list_w(&g, false, false, 0.0).unwrap();
        let keys: Vec<&str> = adj.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn parallel_edges_keep_minimum_weight() {
        let mut g = Graph::new("parallel");
        g.add_node("A").unwrap();
        g.add_node("B").unwrap();
        g.add_edge_with("e1", "A", "B", weighted(5.0)).unwrap();
        g.add_edge_with("e2", "A", "B", weighted(2.0)).unwrap();
        let adj = adj_list_w(&g, false, false, 0.0).unwrap();
        assert_eq!(adj["A"]["B"], 2.0);
    }

    #[test]
    fn incoming_mirrors_entries() {
        let g = diamond();
        let adj = adj_list_w(&g, true, false, 0.0).unwrap();
        assert_eq!(adj["B"]["A"], 1.0);
        assert_eq!(adj["A"]["B"], 1.0);
    }

    #[test]
    fn include_self_seeds_diagonal() {
        let g = diamond();
        let adj = adj_list_w(&g, false, true, 0.5).unwrap();
        for id in ["A", "B", "C", "D"] {
            assert_eq!(adj[id][id], 0.5);
        }
    }

    #[test]
    fn self_loops_never_touch_the_diagonal() {
        let mut g = Graph::new("loops");
        g.add_node("A").unwrap();
        g.add_node("B").unwrap();
        g.add_edge_with("loop", "A", "A", weighted(-3.0)).unwrap();
        g.add_edge_with("ab", "A", "B", weighted(1.0)).unwrap();

        let seeded = adj_list_w(&g, false, true, 0.0).unwrap();
        assert_eq!(seeded["A"]["A"], 0.0);

        let bare = adj_list_w(&g, false, false, 0.0).unwrap();
        assert!(!bare["A"].contains_key("A"));

        let m = adj_matrix_w(&g, false, true, 0.0).unwrap();
        assert_eq!(m[0][0], 0.0);
    }

    #[test]
    fn adj_matrix_is_binary_with_zero_diagonal() {
        let mut g = diamond();
        g.add_edge_with("loop", "A", "A", EdgeOpts::directed()).unwrap();
        let m = adj_matrix(&g).unwrap();
        assert_eq!(m[0], vec![0, 1, 1, 0]);
        assert_eq!(m[1], vec![0, 0, 1, 0]);
        assert_eq!(m[2], vec![0, 0, 0, 1]);
        assert_eq!(m[3], vec![0, 0, 0, 0]);
    }

    #[test]
    fn adj_matrix_w_uses_infinity_sentinel() {
        let g = diamond();
        let m = adj_matrix_w(&g, false, true, 0.0).unwrap();
        assert_eq!(m[0][1], 1.0);
        assert_eq!(m[0][2], 4.0);
        assert!(m[1][0].is_infinite());
        assert_eq!(m[0][0], 0.0);
    }

    #[test]
    fn undirected_weighted_matrix_is_symmetric() {
        let mut g = Graph::new("und");
        for id in ["X", "Y", "Z"] {
            g.add_node(id).unwrap();
        }
        g.add_edge_with("xy", "X", "Y", EdgeOpts::weighted(2.0, false)).unwrap();
        g.add_edge_with("yz", "Y", "Z", EdgeOpts::weighted(3.0, false)).unwrap();
        let m = adj_matrix_w(&g, true, false, 0.0).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i], "asymmetry at ({i},{j})");
            }
        }
    }

    #[test]
    fn next_array_seeds_single_successors() {
        let g = diamond();
        let next = next_array(&g, false).unwrap();
        assert_eq!(next[0][0], vec![0]);
        assert_eq!(next[0][1], vec![1]);
        assert!(next[1][0].is_empty());
        assert_eq!(next[2][3], vec![3]);
    }
}
