//! `graphkit`: in-memory graph analytics.
//!
//! A canonical graph data model (typed nodes/edges, mixed directedness),
//! projections into dense/sparse numeric forms, and the classic analytics
//! built on top of them: priority-first search (of which Dijkstra and
//! closeness centrality are instances), array-based PageRank, and
//! triangle/transitivity/clustering metrics.
//!
//! Public invariants (must not drift):
//! - **Node order**: node insertion order is the iteration order everywhere:
//!   across [`Graph`](crate::Graph) accessors, every projection in
//!   [`projection`], and PageRank's index assignment. Downstream numeric code
//!   maps indices back to ids through this single ordering.
//! - **Determinism**: identical inputs + configs produce identical outputs.
//! - **No structural mutation during a run**: algorithms take `&Graph` and
//!   never mutate structural state.
//!
//! Swappable (allowed to change without breaking the contract):
//! - queue/heap internals in PFS (so long as relaxation order semantics hold)
//! - convergence details in PageRank (so long as tolerance semantics hold)
//! - the matrix-multiply capability behind the clustering metrics

pub mod analytics;
pub mod centrality;
pub mod edge;
pub mod graph;
pub mod io;
pub mod node;
pub mod pagerank;
pub mod paths;
pub mod pfs;
pub mod projection;
pub mod typed;
pub mod util;

pub use analytics::{
    clustering_coefficients, transitivity, triad_count, triangle_count, MatMul, Matrix,
    NaiveMatMul,
};
pub use centrality::{closeness_all_pairs, closeness_pfs};
pub use edge::{Edge, EdgeOpts, DEFAULT_WEIGHT};
pub use graph::{Graph, GraphMode, GraphStats, NeighborEntry, NodeOpts};
pub use node::Node;
pub use pagerank::{pagerank, pagerank_run, PageRankConfig, PageRankRun};
pub use paths::{floyd_warshall, floyd_warshall_with_next, reconstruct_path};
pub use pfs::{dijkstra, pfs, DirMode, NoopVisitor, PfsConfig, PfsEntry, PfsScope, PfsVisitor};
pub use projection::{adj_list_w, adj_matrix, adj_matrix_w, next_array, node_index};
pub use typed::{TypedGraph, TypedGraphStats, GENERIC_TYPE};
pub use util::{deep_clone, merge_by_identity, merge_objects};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("external capability: {0}")]
    External(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
