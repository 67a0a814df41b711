//! Graph readers: JSON graph files and CSV adjacency/edge lists.
//!
//! Readers build a [`Graph`](crate::Graph) and surface file-system and
//! format failures through the crate error type unchanged.

pub mod csv;
pub mod json;

pub use csv::{
    read_adjacency_list_file, read_adjacency_list_str, read_edge_list_file, read_edge_list_str,
    CsvConfig,
};
pub use json::{read_json_file, read_json_str, JsonConfig};
