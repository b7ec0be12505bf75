//! Classification of raw menu nodes
//!
//! The backend menu is loosely shaped JSON: a node may carry a `raw`
//! identifier (hierarchy level), a `to` route (navigation link), display
//! `text`/`label`, and nested `children`. Each node is classified once here so
//! tree construction only ever sees [`MenuEntry`] values.

use serde_json::Value;
use tracing::debug;

use super::codec::validate_segment;

/// A menu node that represents a level of the school hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode<'a> {
    /// Stringified `raw` identifier, already a valid scope segment
    pub raw: String,
    /// Display label (`text`, else `label`, else `raw`)
    pub label: String,
    /// Unclassified child nodes
    pub children: &'a [Value],
}

/// Classified menu node
#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry<'a> {
    Hierarchy(HierarchyNode<'a>),
    NavigationLink,
    Unrecognized,
}

impl<'a> MenuEntry<'a> {
    /// Classify a single raw menu node
    pub fn classify(node: &'a Value) -> Self {
        let Some(obj) = node.as_object() else {
            return Self::Unrecognized;
        };

        if obj.get("to").is_some_and(is_truthy) {
            return Self::NavigationLink;
        }

        let Some(raw) = obj.get("raw").and_then(stringify) else {
            return Self::Unrecognized;
        };
        if validate_segment(&raw).is_err() {
            debug!(%raw, "MenuEntry::classify: raw is not a valid segment, skipping");
            return Self::Unrecognized;
        }

        let label = ["text", "label"]
            .iter()
            .filter_map(|key| obj.get(*key))
            .filter(|v| is_truthy(v))
            .find_map(stringify)
            .unwrap_or_else(|| raw.clone());

        let children = obj
            .get("children")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        Self::Hierarchy(HierarchyNode { raw, label, children })
    }

    /// Hierarchy nodes among a list of raw nodes, in order
    pub fn hierarchy(nodes: &'a [Value]) -> impl Iterator<Item = HierarchyNode<'a>> {
        nodes.iter().filter_map(|node| match Self::classify(node) {
            Self::Hierarchy(h) => Some(h),
            _ => None,
        })
    }
}

/// Truthiness as the menu backend's JSON producers use it
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
