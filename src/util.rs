//! Structural utilities over plain values and entry lists.

use std::collections::HashSet;
use std::hash::Hash;

use serde_json::{Map, Value};

/// Merge objects left to right; later entries overwrite earlier ones.
pub fn merge_objects(objects: &[&Map<String, Value>]) -> Map<String, Value> {
    let mut merged = Map::new();
    for obj in objects {
        for (k, v) in obj.iter() {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

/// Concatenate lists, keeping the first occurrence of each identity.
pub fn merge_by_identity<T, K, F>(lists: &[&[T]], identity: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for list in lists {
        for item in *list {
            if seen.insert(identity(item)) {
                merged.push(item.clone());
            }
        }
    }
    merged
}

/// Deep copy of a plain value: mappings, sequences and scalars, no cycles.
pub fn deep_clone(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), deep_clone(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(deep_clone).collect()),
        scalar => scalar.clone(),
    }
}
