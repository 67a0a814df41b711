//! Closeness centrality.
//!
//! `closeness(u) = (n − 1) / Σ_v d(u, v)` over the finite distances to other
//! nodes. Two implementations are provided, all-pairs over the weighted
//! matrix and per-source PFS, and they agree on connected graphs.

use indexmap::IndexMap;

use crate::graph::Graph;
use crate::paths::floyd_warshall;
use crate::pfs::{pfs, DirMode, NoopVisitor, PfsConfig};
use crate::Result;

/// Closeness from the Floyd–Warshall distance matrix.
pub fn closeness_all_pairs(g: &Graph) -> Result<IndexMap<String, f64>> {
    let dists = floyd_warshall(g)?;
    let n = g.nr_nodes();
    let mut scores = IndexMap::new();
    for (i, id) in g.node_ids().enumerate() {
        let sum: f64 = dists[i]
            .iter()
            .enumerate()
            .filter(|(j, d)| *j != i && d.is_finite())
            .map(|(_, d)| d)
            .sum();
        scores.insert(id.to_string(), closeness_score(n, sum));
    }
    Ok(scores)
}

/// Closeness from one PFS run per source, following the reach set.
pub fn closeness_pfs(g: &Graph) -> Result<IndexMap<String, f64>> {
    let n = g.nr_nodes();
    let config = PfsConfig {
        dir_mode: DirMode::Mixed,
        goal: None,
        weighted: true,
    };
    let mut scores = IndexMap::new();
    let ids: Vec<String> = g.node_ids().map(str::to_string).collect();
    for id in &ids {
        let result = pfs(g, id, &config, &mut NoopVisitor)?;
        let sum: f64 = result
            .iter()
            .filter(|(other, entry)| other.as_str() != id && entry.distance.is_finite())
            .map(|(_, entry)| entry.distance)
            .sum();
        scores.insert(id.clone(), closeness_score(n, sum));
    }
    Ok(scores)
}

fn closeness_score(n: usize, sum: f64) -> f64 {
    if sum > 0.0 {
        (n - 1) as f64 / sum
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge::EdgeOpts;

    /// A - B - C - D - E, undirected unit weights.
    fn path5() -> Graph {
        let mut g = Graph::new("path5");
        for id in ["A", "B", "C", "D", "E"] {
            g.add_node(id).unwrap();
        }
        for (eid, a, b) in [("ab", "A", "B"), ("bc", "B", "C"), ("cd", "C", "D"), ("de", "D", "E")]
        {
            g.add_edge_with(eid, a, b, EdgeOpts::default()).unwrap();
        }
        g
    }

    #[test]
    fn path_graph_scores_match_hand_computation() {
        let g = path5();
        let scores = closeness_all_pairs(&g).unwrap();
        assert!((scores["C"] - 4.0 / 6.0).abs() < 1e-12);
        assert!((scores["A"] - 0.4).abs() < 1e-12);
        assert!((scores["E"] - 0.4).abs() < 1e-12);
        assert!(scores["C"] > scores["B"]);
        assert!(scores["B"] > scores["A"]);
    }

    #[test]
    fn both_modes_agree_on_connected_graphs() {
        let g = path5();
        let fw = closeness_all_pairs(&g).unwrap();
        let via_pfs = closeness_pfs(&g).unwrap();
        for (id, score) in &fw {
            assert!(
                (score - via_pfs[id.as_str()]).abs() < 1e-12,
                "mismatch at {id}"
            );
        }
    }

    #[test]
    fn isolated_node_scores_zero() {
        let mut g = path5();
        g.add_node("Z").unwrap();
        let scores = closeness_pfs(&g).unwrap();
        assert_eq!(scores["Z"], 0.0);
    }
}
