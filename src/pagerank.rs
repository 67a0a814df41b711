//! PageRank via array-based power iteration.
//!
//! The graph is projected onto flat arrays in canonical node order: per-node
//! out-degree (directed out plus undirected) and a pull list of source
//! indices derived from incoming and undirected edges. An undirected edge
//! therefore behaves as two directed edges with shared endpoints. Dangling
//! nodes receive no special redistribution; on graphs with sinks the rank
//! mass decays accordingly.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::projection::node_index;
use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Teleport probability.
    pub alpha: f64,
    pub max_iterations: usize,
    /// L1-delta threshold ending the iteration.
    pub convergence: f64,
    /// Initial rank per node; `None` means `1/n`.
    pub init_rank: Option<f64>,
    /// Denominator of the teleport term; `None` means `n`.
    pub alpha_damp: Option<f64>,
    /// Reserved: the iteration currently ignores edge weights.
    pub weighted: bool,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            alpha: 0.15,
            max_iterations: 1000,
            convergence: 1e-4,
            init_rank: None,
            alpha_damp: None,
            weighted: false,
        }
    }
}

impl PageRankConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::Config("alpha must be finite and in [0,1]".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be > 0".to_string()));
        }
        if !self.convergence.is_finite() || self.convergence <= 0.0 {
            return Err(Error::Config(
                "convergence must be finite and > 0".to_string(),
            ));
        }
        if let Some(init) = self.init_rank {
            if !init.is_finite() || init <= 0.0 {
                return Err(Error::Config("init_rank must be finite and > 0".to_string()));
            }
        }
        if let Some(damp) = self.alpha_damp {
            if !damp.is_finite() || damp <= 0.0 {
                return Err(Error::Config(
                    "alpha_damp must be finite and > 0".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// PageRank with convergence reporting.
///
/// `iterations` is the number of update steps performed; `diff_l1` the final
/// L1 residual.
#[derive(Debug, Clone, Serialize)]
pub struct PageRankRun {
    pub ranks: IndexMap<String, f64>,
    pub iterations: usize,
    pub diff_l1: f64,
    pub converged: bool,
}

pub fn pagerank(g: &Graph, config: &PageRankConfig) -> Result<IndexMap<String, f64>> {
    Ok(pagerank_run(g, config)?.ranks)
}

pub fn pagerank_run(g: &Graph, config: &PageRankConfig) -> Result<PageRankRun> {
    config.validate()?;
    let n = g.nr_nodes();
    if n == 0 {
        return Ok(PageRankRun {
            ranks: IndexMap::new(),
            iterations: 0,
            diff_l1: 0.0,
            converged: true,
        });
    }

    let index = node_index(g);
    let init = config.init_rank.unwrap_or(1.0 / n as f64);
    let teleport = config.alpha / config.alpha_damp.unwrap_or(n as f64);

    // out_deg counts directed-out plus undirected; pull[i] lists the indices
    // feeding rank into i, one entry per incoming or undirected edge.
    let mut out_deg = vec![0usize; n];
    let mut pull: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, node) in g.nodes().enumerate() {
        out_deg[i] = node.out_degree() + node.und_degree();
        for eid in node.in_edge_ids().chain(node.und_edge_ids()) {
            let edge = g
                .get_edge(eid)
                .ok_or_else(|| Error::InvariantViolation(format!("dangling edge id {eid}")))?;
            let other = edge.other_end(node.id()).ok_or_else(|| {
                Error::InvariantViolation(format!("edge {eid} registered on foreign node"))
            })?;
            pull[i].push(index[other]);
        }
    }
    // unreachable by construction: every pulled index carries an out- or
    // undirected edge of its own
    for (i, sources) in pull.iter().enumerate() {
        if let Some(&j) = sources.iter().find(|&&j| out_deg[j] == 0) {
            return Err(Error::InvariantViolation(format!(
                "zero out-degree at index {j} pulled into node index {i}"
            )));
        }
    }

    let mut ranks = vec![init; n];
    let mut new_ranks = vec![0.0; n];

    let mut iters = 0usize;
    let mut last_diff = f64::INFINITY;
    let mut converged = false;
    for _ in 0..config.max_iterations {
        iters += 1;
        let mut diff = 0.0;
        for i in 0..n {
            let mut pulled = 0.0;
            for &j in &pull[i] {
                pulled += ranks[j] / out_deg[j] as f64;
            }
            new_ranks[i] = (1.0 - config.alpha) * pulled + teleport;
            diff += (new_ranks[i] - ranks[i]).abs();
        }
        last_diff = diff;
        std::mem::swap(&mut ranks, &mut new_ranks);
        if diff <= config.convergence {
            converged = true;
            break;
        }
    }

    tracing::debug!(
        iterations = iters,
        diff_l1 = last_diff,
        converged,
        "pagerank finished"
    );

    Ok(PageRankRun {
        ranks: g
            .node_ids()
            .map(|id| (id.to_string(), ranks[index[id]]))
            .collect(),
        iterations: iters,
        diff_l1: last_diff,
        converged,
    })
}
