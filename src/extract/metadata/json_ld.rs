//! JSON-LD (schema.org) structured data
//!
//! Blocks are parsed leniently: a script whose body is not valid JSON is
//! skipped. `@graph` arrays and top-level arrays are flattened so resolvers
//! see every typed node.

use scraper::{Html, Selector};
use serde_json::Value;

/// Parses every `<script type="application/ld+json">` block
pub fn json_ld_blocks(document: &Html) -> Vec<Value> {
    let Ok(selector) = Selector::parse(r#"script[type="application/ld+json"]"#) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|script| {
            let text = script.text().collect::<String>();
            let text = text.trim();
            if text.is_empty() {
                return None;
            }
            serde_json::from_str::<Value>(text).ok()
        })
        .collect()
}

/// Flattens blocks into their JSON objects, outermost first
pub fn json_ld_nodes(blocks: &[Value]) -> Vec<&serde_json::Map<String, Value>> {
    let mut nodes = Vec::new();
    for block in blocks {
        flatten(block, &mut nodes);
    }
    nodes
}

fn flatten<'a>(value: &'a Value, out: &mut Vec<&'a serde_json::Map<String, Value>>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten(item, out);
            }
        }
        Value::Object(map) => {
            out.push(map);
            if let Some(graph) = map.get("@graph") {
                flatten(graph, out);
            }
        }
        _ => {}
    }
}

/// Distinct `@type` values across all nodes, in first-seen order
pub fn schema_types(blocks: &[Value]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for node in json_ld_nodes(blocks) {
        for schema_type in node_types(node) {
            if !types.iter().any(|t| t == schema_type) {
                types.push(schema_type.to_string());
            }
        }
    }
    types
}

/// The `@type` values of one node (string or array form)
pub fn node_types(node: &serde_json::Map<String, Value>) -> Vec<&str> {
    match node.get("@type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Reads a property as text
///
/// Accepts a plain string, an object carrying `name`/`url`/`@id`, or an array
/// whose first readable entry wins.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Object(map) => ["name", "url", "@id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(text_value)),
        Value::Array(items) => items.iter().find_map(text_value),
        _ => None,
    }
}
