//! Triangle, transitivity and clustering metrics over matrix powers.
//!
//! The matrix product is an injected capability so callers can route it to
//! whatever backend they have; the bundled [`NaiveMatMul`] is a plain
//! triple loop. The metrics only consume `A²`/`A³` of the binary adjacency
//! matrix; the core stays agnostic about how the product is computed.

use indexmap::IndexMap;

use crate::graph::Graph;
use crate::projection::adj_matrix;
use crate::{Error, Result};

pub type Matrix = Vec<Vec<f64>>;

/// Matrix-multiply capability. Implementations signal unavailability with
/// [`Error::External`].
pub trait MatMul {
    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix>;
}

/// CPU reference multiplier.
pub struct NaiveMatMul;

impl MatMul for NaiveMatMul {
    fn matmul(&self, a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let n = a.len();
        let inner = b.len();
        if a.iter().any(|row| row.len() != inner) {
            return Err(Error::InvalidInput(
                "matmul: inner dimensions do not match".to_string(),
            ));
        }
        let cols = b.first().map_or(0, Vec::len);
        let mut out = vec![vec![0.0; cols]; n];
        for i in 0..n {
            for k in 0..inner {
                let aik = a[i][k];
                if aik == 0.0 {
                    continue;
                }
                for j in 0..cols {
                    out[i][j] += aik * b[k][j];
                }
            }
        }
        Ok(out)
    }
}

fn binary_matrix(g: &Graph) -> Result<Matrix> {
    Ok(adj_matrix(g)?
        .into_iter()
        .map(|row| row.into_iter().map(f64::from).collect())
        .collect())
}

fn cube(g: &Graph, mm: &dyn MatMul) -> Result<Matrix> {
    let a = binary_matrix(g)?;
    let a2 = mm.matmul(&a, &a)?;
    mm.matmul(&a2, &a)
}

/// Number of potential triangles: per node `deg·(deg−1)/2` over undirected
/// degrees, or `in·out` over directed ones.
pub fn triad_count(g: &Graph, directed: bool) -> u64 {
    g.nodes()
        .map(|node| {
            if directed {
                (node.in_degree() * node.out_degree()) as u64
            } else {
                let d = node.und_degree() as u64;
                d * (d.saturating_sub(1)) / 2
            }
        })
        .sum()
}

/// Triangles from `trace(A³)`: each triangle is walked once per vertex and
/// rotation direction, so the trace overcounts by 6 (undirected) or 3
/// (directed).
pub fn triangle_count(g: &Graph, mm: &dyn MatMul, directed: bool) -> Result<u64> {
    let a3 = cube(g, mm)?;
    let trace: f64 = (0..a3.len()).map(|i| a3[i][i]).sum();
    let div = if directed { 3.0 } else { 6.0 };
    Ok((trace / div).round() as u64)
}

/// `3 · triangles / triads`; `0` when the graph has no triads.
pub fn transitivity(g: &Graph, mm: &dyn MatMul, directed: bool) -> Result<f64> {
    let triads = triad_count(g, directed);
    if triads == 0 {
        return Ok(0.0);
    }
    let triangles = triangle_count(g, mm, directed)?;
    Ok(3.0 * triangles as f64 / triads as f64)
}

/// Per-node clustering coefficient `A³[i][i] / (deg·(deg−1))`, doubled for
/// directed graphs (where `deg` is total degree). Nodes with fewer than two
/// neighbors score `0`.
pub fn clustering_coefficients(
    g: &Graph,
    mm: &dyn MatMul,
    directed: bool,
) -> Result<IndexMap<String, f64>> {
    let a3 = cube(g, mm)?;
    let mut scores = IndexMap::new();
    for (i, node) in g.nodes().enumerate() {
        let d = if directed {
            node.in_degree() + node.out_degree()
        } else {
            node.und_degree()
        } as f64;
        let denom = d * (d - 1.0);
        let cc = if denom > 0.0 {
            let closed = a3[i][i] / denom;
            if directed {
                2.0 * closed
            } else {
                closed
            }
        } else {
            0.0
        };
        scores.insert(node.id().to_string(), cc);
    }
    Ok(scores)
}
