//! Flattening and unflattening of locale trees.
//!
//! A locale tree is a nested JSON object whose leaves are strings. The flat
//! representation maps dotted key paths to values and is the working form
//! for every comparison in the checker. Output ordering is always
//! key-sorted at every nesting level so serialization is deterministic.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Flat dotted-key view of one locale tree.
pub type FlatMap = BTreeMap<String, String>;

/// Flatten a nested locale tree into dotted keys.
///
/// String leaves are kept as-is. Numbers and booleans are coerced to their
/// string form. Nulls and arrays carry no translatable value and are
/// dropped.
pub fn flatten(value: &Value) -> FlatMap {
    let mut out = FlatMap::new();
    flatten_into(value, String::new(), &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, out: &mut FlatMap) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let new_prefix = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(val, new_prefix, out);
            }
        }
        Value::String(s) if !prefix.is_empty() => {
            out.insert(prefix, s.clone());
        }
        Value::Number(n) if !prefix.is_empty() => {
            out.insert(prefix, n.to_string());
        }
        Value::Bool(b) if !prefix.is_empty() => {
            out.insert(prefix, b.to_string());
        }
        _ => {}
    }
}

/// Rebuild a nested tree from a flat dotted-key map.
///
/// When a shorter key conflicts with a longer one (`"a"` and `"a.b"`), the
/// deeper path wins and the string node is replaced by an object.
pub fn unflatten(flat: &FlatMap) -> Value {
    let mut root = Map::new();
    for (key, value) in flat {
        let parts: Vec<&str> = key.split('.').collect();
        insert_nested(&mut root, &parts, Value::String(value.clone()));
    }
    Value::Object(root)
}

/// Insert a value at a nested path, creating intermediate objects as needed.
fn insert_nested(root: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        root.insert((*first).to_string(), value);
        return;
    }

    let next_level = root
        .entry((*first).to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    // An existing string node at an intermediate position is replaced.
    if !next_level.is_object() {
        *next_level = Value::Object(Map::new());
    }

    if let Some(inner) = next_level.as_object_mut() {
        insert_nested(inner, rest, value);
    }
}

/// Sort object keys lexicographically at every nesting level.
pub fn sort_keys_recursively(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<&String, &Value> = map.iter().collect();
            let mut out = Map::new();
            for (key, val) in sorted {
                out.insert(key.clone(), sort_keys_recursively(val));
            }
            Value::Object(out)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_keys_recursively).collect()),
        other => other.clone(),
    }
}

/// Serialize a locale tree the way it is stored on disk.
///
/// Two-space pretty printing with a trailing newline, keys recursively
/// sorted so semantically identical data is byte-identical.
pub fn to_canonical_json(value: &Value) -> Result<String, serde_json::Error> {
    let sorted = sort_keys_recursively(value);
    let content = serde_json::to_string_pretty(&sorted)?;
    Ok(format!("{}\n", content))
}
