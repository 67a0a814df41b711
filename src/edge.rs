//! Edge primitive: endpoints, direction, weight.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Weight assumed by algorithms when an edge carries none.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// A single edge between two nodes, identified by id.
///
/// For undirected edges `(a, b)` and `(b, a)` denote the same edge. The
/// weight is only meaningful when `weighted` is set; algorithms that need a
/// number use [`Edge::effective_weight`].
#[derive(Debug, Clone)]
pub struct Edge {
    id: String,
    label: String,
    a: String,
    b: String,
    directed: bool,
    weighted: bool,
    weight: Option<f64>,
}

/// Construction options for [`Edge`]. All fields default to the unweighted,
/// undirected, unlabeled case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EdgeOpts {
    pub directed: bool,
    pub weighted: bool,
    pub weight: Option<f64>,
    pub label: Option<String>,
}

impl EdgeOpts {
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    pub fn weighted(weight: f64, directed: bool) -> Self {
        Self {
            directed,
            weighted: true,
            weight: Some(weight),
            label: None,
        }
    }
}

impl Edge {
    /// Build an edge. A `NaN` weight on a weighted edge is malformed;
    /// infinite weights are legal sentinels (the JSON reader produces them).
    pub fn new(
        id: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
        opts: EdgeOpts,
    ) -> Result<Self> {
        let id = id.into();
        let weight = if opts.weighted {
            let w = opts.weight.unwrap_or(DEFAULT_WEIGHT);
            if w.is_nan() {
                return Err(Error::InvalidInput(format!("edge {id}: NaN weight")));
            }
            Some(w)
        } else {
            None
        };
        let label = opts.label.unwrap_or_else(|| id.clone());
        Ok(Self {
            id,
            label,
            a: a.into(),
            b: b.into(),
            directed: opts.directed,
            weighted: opts.weighted,
            weight,
        })
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

    /// First endpoint (tail for directed edges).
    pub fn a(&self) -> &str {
        &self.a
    }

    /// Second endpoint (head for directed edges).
    pub fn b(&self) -> &str {
        &self.b
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// The weight algorithms should use: the stored weight when present and
    /// not `NaN`, else [`DEFAULT_WEIGHT`].
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if !w.is_nan() => w,
            _ => DEFAULT_WEIGHT,
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.a == node_id || self.b == node_id
    }

    /// The endpoint opposite to `node_id`, or `None` when the edge does not
    /// touch that node. A self-loop yields the node itself.
    pub fn other_end(&self, node_id: &str) -> Option<&str> {
        if self.a == node_id {
            Some(&self.b)
        } else if self.b == node_id {
            Some(&self.a)
        } else {
            None
        }
    }
}
