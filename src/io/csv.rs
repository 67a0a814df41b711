//! CSV adjacency-list and edge-list readers.
//!
//! Both formats are line-oriented with a configurable separator; nodes are
//! created on demand and edge ids follow the `"{src}_{tgt}_{d|u}"` scheme
//! with duplicate (and reverse-undirected) entries skipped.

use std::fs;
use std::path::Path;

use crate::edge::EdgeOpts;
use crate::graph::Graph;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct CsvConfig {
    pub separator: char,
    /// Edge-list rows carry their own `d`/`u` direction token.
    pub explicit_direction: bool,
    /// Directedness applied when rows carry no direction of their own.
    pub direction_mode: bool,
    pub weighted: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            separator: ',',
            explicit_direction: false,
            direction_mode: false,
            weighted: false,
        }
    }
}

pub fn read_adjacency_list_file(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Graph> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mut g = read_adjacency_list_str(&text, config)?;
    name_after(&mut g, path);
    Ok(g)
}

/// One line per source node: the source id followed by neighbor ids, or by
/// `id{sep}weight` pairs when `weighted` is set.
pub fn read_adjacency_list_str(input: &str, config: &CsvConfig) -> Result<Graph> {
    let mut g = Graph::new("CSV adjacency list");
    for (lineno, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let mut tokens = line.split(config.separator).map(str::trim);
        let src = tokens
            .next()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::InvalidInput(format!("line {}: missing source", lineno + 1)))?;
        ensure_node(&mut g, src)?;
        let rest: Vec<&str> = tokens.collect();

        if config.weighted {
            if rest.len() % 2 != 0 {
                return Err(Error::InvalidInput(format!(
                    "line {}: neighbor without weight",
                    lineno + 1
                )));
            }
            for pair in rest.chunks(2) {
                let weight = parse_weight(pair[1], lineno)?;
                add_edge(&mut g, src, pair[0], config.direction_mode, Some(weight))?;
            }
        } else {
            for tgt in rest {
                add_edge(&mut g, src, tgt, config.direction_mode, None)?;
            }
        }
    }
    log_loaded(&g, "adjacency list");
    Ok(g)
}

pub fn read_edge_list_file(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Graph> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let mut g = read_edge_list_str(&text, config)?;
    name_after(&mut g, path);
    Ok(g)
}

/// One line per edge: `source{sep}target`, then a `d`/`u` token when
/// `explicit_direction` is set, then a weight when `weighted` is set.
pub fn read_edge_list_str(input: &str, config: &CsvConfig) -> Result<Graph> {
    let mut g = Graph::new("CSV edge list");
    for (lineno, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let tokens: Vec<&str> = line.split(config.separator).map(str::trim).collect();
        if tokens.len() < 2 {
            return Err(Error::InvalidInput(format!(
                "line {}: expected at least source and target",
                lineno + 1
            )));
        }
        let (src, tgt) = (tokens[0], tokens[1]);
        ensure_node(&mut g, src)?;

        let mut cursor = 2;
        let directed = if config.explicit_direction {
            let token = tokens.get(cursor).copied().ok_or_else(|| {
                Error::InvalidInput(format!("line {}: missing direction token", lineno + 1))
            })?;
            cursor += 1;
            match token {
                "d" => true,
                "u" => false,
                other => {
                    return Err(Error::InvalidInput(format!(
                        "line {}: bad direction token {other:?}",
                        lineno + 1
                    )))
                }
            }
        } else {
            config.direction_mode
        };
        let weight = if config.weighted {
            match tokens.get(cursor) {
                Some(token) => Some(parse_weight(token, lineno)?),
                None => None,
            }
        } else {
            None
        };

        add_edge(&mut g, src, tgt, directed, weight)?;
    }
    log_loaded(&g, "edge list");
    Ok(g)
}

fn ensure_node(g: &mut Graph, id: &str) -> Result<()> {
    if !g.has_node(id) {
        g.add_node(id)?;
    }
    Ok(())
}

fn add_edge(g: &mut Graph, src: &str, tgt: &str, directed: bool, weight: Option<f64>) -> Result<()> {
    ensure_node(g, tgt)?;
    let suffix = if directed { 'd' } else { 'u' };
    let edge_id = format!("{src}_{tgt}_{suffix}");
    if g.has_edge(&edge_id) {
        return Ok(());
    }
    if !directed && g.has_edge(&format!("{tgt}_{src}_{suffix}")) {
        return Ok(());
    }
    let opts = EdgeOpts {
        directed,
        weighted: weight.is_some(),
        weight,
        label: None,
    };
    g.add_edge_with(edge_id, src, tgt, opts)
}

fn parse_weight(token: &str, lineno: usize) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("line {}: malformed weight {token:?}", lineno + 1)))
}

fn name_after(g: &mut Graph, path: &Path) {
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        g.set_label(stem);
    }
}

fn log_loaded(g: &Graph, format: &str) {
    tracing::info!(
        nodes = g.nr_nodes(),
        dir_edges = g.nr_dir_edges(),
        und_edges = g.nr_und_edges(),
        "loaded CSV {format}"
    );
}
