//! All-pairs shortest paths via Floyd–Warshall, with successor-matrix path
//! reconstruction seeded by [`crate::projection::next_array`].

use crate::graph::Graph;
use crate::projection::{adj_matrix_w, next_array};
use crate::Result;

/// All-pairs shortest distances in canonical node order. Diagonal is `0`,
/// unreachable pairs stay `f64::INFINITY`. Negative weights are out of
/// contract, as in PFS.
pub fn floyd_warshall(g: &Graph) -> Result<Vec<Vec<f64>>> {
    let mut dists = adj_matrix_w(g, false, true, 0.0)?;
    let n = dists.len();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = dists[i][k] + dists[k][j];
                if via < dists[i][j] {
                    dists[i][j] = via;
                }
            }
        }
    }
    Ok(dists)
}

/// Floyd–Warshall that also maintains the successor matrix: `next[i][j]`
/// lists the first hops of all known minimum-weight paths (union on ties).
pub fn floyd_warshall_with_next(g: &Graph) -> Result<(Vec<Vec<f64>>, Vec<Vec<Vec<usize>>>)> {
    let mut dists = adj_matrix_w(g, false, true, 0.0)?;
    let mut next = next_array(g, false)?;
    let n = dists.len();
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let via = dists[i][k] + dists[k][j];
                if via < dists[i][j] {
                    dists[i][j] = via;
                    next[i][j] = next[i][k].clone();
                } else if k != i
                    && k != j
                    && via == dists[i][j]
                    && dists[i][j] != f64::INFINITY
                {
                    let hops = next[i][k].clone();
                    for hop in hops {
                        if !next[i][j].contains(&hop) {
                            next[i][j].push(hop);
                        }
                    }
                }
            }
        }
    }
    Ok((dists, next))
}

/// Walk the successor matrix from `i` to `j`, taking the first listed hop at
/// each step. `None` when no path exists.
pub fn reconstruct_path(next: &[Vec<Vec<usize>>], i: usize, j: usize) -> Option<Vec<usize>> {
    let n = next.len();
    if i >= n || j >= n || next[i][j].is_empty() {
        return None;
    }
    let mut path = vec![i];
    let mut current = i;
    while current != j {
        current = *next[current][j].first()?;
        path.push(current);
        if path.len() > n {
            // would only happen on a corrupted successor matrix
            return None;
        }
    }
    Some(path)
}
