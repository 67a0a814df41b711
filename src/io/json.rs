//! JSON graph reader.
//!
//! Top-level shape: `{name, data: {<node_id>: {features?, coords?, edges:
//! [{to, directed?, weighted?, weight?, typeOfEdge?}]}}}`. Edge ids are
//! derived as `"{src}_{tgt}_{d|u}"`; a duplicate id, or the reverse id of
//! an undirected edge, is skipped. Weights accept numbers or the sentinel
//! strings `"Infinity" | "-Infinity" | "MAX" | "MIN" | "undefined"`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::edge::{EdgeOpts, DEFAULT_WEIGHT};
use crate::graph::{Graph, NodeOpts};
use crate::util::merge_objects;
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct JsonConfig {
    /// Honor each entry's own `directed` flag; otherwise force
    /// `direction_mode` onto every edge.
    pub explicit_direction: bool,
    /// Directedness applied when an entry carries no flag of its own.
    pub direction_mode: bool,
    /// Treat edges without a `weighted` flag as weighted.
    pub weighted: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self {
            explicit_direction: true,
            direction_mode: false,
            weighted: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonGraphFile {
    #[serde(default)]
    name: Option<String>,
    data: IndexMap<String, JsonNode>,
}

#[derive(Debug, Deserialize)]
struct JsonNode {
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    features: Option<Map<String, Value>>,
    #[serde(default)]
    coords: Option<Value>,
    #[serde(default)]
    edges: Vec<JsonEdge>,
}

#[derive(Debug, Deserialize)]
struct JsonEdge {
    to: String,
    #[serde(default)]
    directed: Option<bool>,
    #[serde(default)]
    weighted: Option<bool>,
    #[serde(default)]
    weight: Option<Value>,
    #[serde(default, rename = "typeOfEdge")]
    type_of_edge: Option<String>,
}

pub fn read_json_file(path: impl AsRef<Path>, config: &JsonConfig) -> Result<Graph> {
    let text = fs::read_to_string(path)?;
    read_json_str(&text, config)
}

pub fn read_json_str(input: &str, config: &JsonConfig) -> Result<Graph> {
    let file: JsonGraphFile = serde_json::from_str(input)?;
    build(file, config)
}

fn build(file: JsonGraphFile, config: &JsonConfig) -> Result<Graph> {
    let mut g = Graph::new(file.name.unwrap_or_else(|| "JSON graph".to_string()));

    for (id, node) in &file.data {
        let mut maps: Vec<&Map<String, Value>> = Vec::new();
        if let Some(features) = &node.features {
            maps.push(features);
        }
        let coords_map = node.coords.as_ref().map(|coords| {
            let mut m = Map::new();
            m.insert("coords".to_string(), coords.clone());
            m
        });
        if let Some(m) = &coords_map {
            maps.push(m);
        }
        let merged = merge_objects(&maps);
        let opts = NodeOpts {
            label: node.label.clone(),
            features: if merged.is_empty() {
                None
            } else {
                Some(merged.into_iter().collect())
            },
        };
        g.add_node_with(id.clone(), opts)?;
    }

    for (src, node) in &file.data {
        for entry in &node.edges {
            let tgt = &entry.to;
            if !g.has_node(tgt) {
                g.add_node(tgt.clone())?;
            }
            let directed = if config.explicit_direction {
                entry.directed.unwrap_or(config.direction_mode)
            } else {
                config.direction_mode
            };
            let suffix = if directed { 'd' } else { 'u' };
            let edge_id = format!("{src}_{tgt}_{suffix}");
            if g.has_edge(&edge_id) {
                continue;
            }
            if !directed && g.has_edge(&format!("{tgt}_{src}_{suffix}")) {
                continue;
            }
            let weight = entry.weight.as_ref().map(parse_weight).transpose()?;
            let weighted = entry.weighted.unwrap_or(config.weighted) || weight.is_some();
            let opts = EdgeOpts {
                directed,
                weighted,
                weight,
                label: entry.type_of_edge.clone(),
            };
            g.add_edge_with(edge_id, src.clone(), tgt.clone(), opts)?;
        }
    }

    tracing::info!(
        nodes = g.nr_nodes(),
        dir_edges = g.nr_dir_edges(),
        und_edges = g.nr_und_edges(),
        "loaded JSON graph"
    );
    Ok(g)
}

fn parse_weight(value: &Value) -> Result<f64> {
    match value {
        Value::Number(num) => num
            .as_f64()
            .ok_or_else(|| Error::InvalidInput(format!("malformed weight {num}"))),
        Value::String(s) => match s.as_str() {
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            "MAX" => Ok(f64::MAX),
            "MIN" => Ok(f64::MIN_POSITIVE),
            "undefined" => Ok(DEFAULT_WEIGHT),
            other => Err(Error::InvalidInput(format!("malformed weight {other:?}"))),
        },
        other => Err(Error::InvalidInput(format!("malformed weight {other}"))),
    }
}
