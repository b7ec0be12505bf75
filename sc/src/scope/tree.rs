//! Scope tree built from the backend menu

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::codec::{ScopeLevel, encode};
use super::menu::{HierarchyNode, MenuEntry};

/// Separator between ancestor labels in flattened options
pub const LABEL_SEPARATOR: &str = " / ";

/// A node of the school → grade → class tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeNode {
    pub label: String,
    /// Encoded scope string
    pub value: String,
    /// Identifier of this node's own segment
    pub raw: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScopeNode>,
}

/// Flat selectable entry derived from the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

impl ScopeOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            disabled: false,
        }
    }
}

fn node_at(level: ScopeLevel, path: &[&str], entry: &HierarchyNode<'_>) -> Option<ScopeNode> {
    let school = path.first().copied().unwrap_or(entry.raw.as_str());
    let grade = path.get(1).copied().or(Some(entry.raw.as_str()));
    let value = match encode(level, school, grade, Some(entry.raw.as_str())) {
        Ok(v) => v,
        Err(e) => {
            warn!(%level, raw = %entry.raw, error = %e, "node_at: failed to encode scope, skipping");
            return None;
        }
    };

    Some(ScopeNode {
        label: entry.label.clone(),
        value,
        raw: entry.raw.clone(),
        children: Vec::new(),
    })
}

/// Build the scope tree from raw menu nodes
///
/// Navigation links and nodes without a usable `raw` identifier are skipped at
/// every level. Menu nesting below the class level is ignored.
pub fn build_tree(menu: &[Value]) -> Vec<ScopeNode> {
    debug!(node_count = %menu.len(), "build_tree: called");
    let mut schools = Vec::new();

    for school_entry in MenuEntry::hierarchy(menu) {
        let Some(mut school) = node_at(ScopeLevel::School, &[], &school_entry) else {
            continue;
        };

        for grade_entry in MenuEntry::hierarchy(school_entry.children) {
            let Some(mut grade) = node_at(ScopeLevel::Grade, &[school.raw.as_str()], &grade_entry) else {
                continue;
            };

            for class_entry in MenuEntry::hierarchy(grade_entry.children) {
                if let Some(class) = node_at(ScopeLevel::Class, &[school.raw.as_str(), grade.raw.as_str()], &class_entry) {
                    grade.children.push(class);
                }
            }
            school.children.push(grade);
        }
        schools.push(school);
    }

    debug!(school_count = %schools.len(), "build_tree: done");
    schools
}

/// Flatten the tree depth-first into labelled options, one per node
pub fn flatten(tree: &[ScopeNode]) -> Vec<ScopeOption> {
    flatten_with_prefix(tree, "")
}

/// Flatten with an ancestor label prefix
pub fn flatten_with_prefix(tree: &[ScopeNode], prefix: &str) -> Vec<ScopeOption> {
    let mut out = Vec::new();
    for node in tree {
        let label = if prefix.is_empty() {
            node.label.clone()
        } else {
            format!("{}{}{}", prefix, LABEL_SEPARATOR, node.label)
        };
        out.push(ScopeOption::new(label.clone(), node.value.clone()));
        if !node.children.is_empty() {
            out.extend(flatten_with_prefix(&node.children, &label));
        }
    }
    out
}

/// Breadth-first search for the node with exactly this scope value
pub fn find_by_value<'a>(tree: &'a [ScopeNode], value: &str) -> Option<&'a ScopeNode> {
    let mut queue: VecDeque<&ScopeNode> = tree.iter().collect();
    while let Some(node) = queue.pop_front() {
        if node.value == value {
            return Some(node);
        }
        queue.extend(node.children.iter());
    }
    None
}

/// Map every scope value in the tree to its own (unprefixed) label
pub fn label_map(tree: &[ScopeNode]) -> HashMap<String, String> {
    fn walk(nodes: &[ScopeNode], map: &mut HashMap<String, String>) {
        for node in nodes {
            map.insert(node.value.clone(), node.label.clone());
            walk(&node.children, map);
        }
    }

    let mut map = HashMap::new();
    walk(tree, &mut map);
    map
}

/// Total number of nodes at all depths
pub fn node_count(tree: &[ScopeNode]) -> usize {
    tree.iter().map(|n| 1 + node_count(&n.children)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_menu() -> Vec<Value> {
        json!([
            {"text": "Dashboard", "to": "/"},
            {
                "raw": 39,
                "text": "No.39 Middle School",
                "children": [
                    {"raw": "2023", "label": "Class of 2023", "children": [
                        {"raw": 1, "text": "Class 1"},
                        {"raw": 2, "text": "Class 2"},
                        {"text": "Schedule", "to": "/39/2023/schedule"}
                    ]},
                    {"raw": "2024", "text": "Class of 2024"},
                    {"text": "Config", "to": "/39/config"}
                ]
            },
            {"raw": "40", "children": [{"raw": "2024", "children": [{"raw": "3"}]}]},
            {"text": "No raw here"}
        ])
        .as_array()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_build_tree_structure() {
        let tree = build_tree(&sample_menu());
        assert_eq!(tree.len(), 2);

        let school = &tree[0];
        assert_eq!(school.value, "39");
        assert_eq!(school.label, "No.39 Middle School");
        assert_eq!(school.children.len(), 2);

        let grade = &school.children[0];
        assert_eq!(grade.value, "39/2023");
        assert_eq!(grade.label, "Class of 2023");
        assert_eq!(grade.children.len(), 2);
        assert_eq!(grade.children[1].value, "39/2023/2");
        assert_eq!(grade.children[1].label, "Class 2");

        assert_eq!(tree[1].label, "40");
        assert_eq!(tree[1].children[0].children[0].value, "40/2024/3");
    }

    #[test]
    fn test_build_tree_empty_and_malformed() {
        assert!(build_tree(&[]).is_empty());
        assert!(build_tree(&[json!(null), json!("x"), json!({"to": "/a"})]).is_empty());
    }

    #[test]
    fn test_build_tree_ignores_deeper_levels() {
        let menu = vec![json!({"raw": "1", "children": [{"raw": "2", "children": [{"raw": "3", "children": [{"raw": "4"}]}]}]})];
        let tree = build_tree(&menu);
        let class = &tree[0].children[0].children[0];
        assert_eq!(class.value, "1/2/3");
        assert!(class.children.is_empty());
    }

    #[test]
    fn test_flatten_one_entry_per_node() {
        let tree = build_tree(&sample_menu());
        let flat = flatten(&tree);
        assert_eq!(flat.len(), node_count(&tree));
        assert_eq!(flat.len(), 8);

        let labels: Vec<&str> = flat.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels[0], "No.39 Middle School");
        assert_eq!(labels[1], "No.39 Middle School / Class of 2023");
        assert_eq!(labels[2], "No.39 Middle School / Class of 2023 / Class 1");
        assert_eq!(labels[4], "No.39 Middle School / Class of 2024");
        assert!(flat.iter().all(|o| !o.disabled));
    }

    #[test]
    fn test_flatten_with_prefix() {
        let tree = build_tree(&[json!({"raw": "39"})]);
        let flat = flatten_with_prefix(&tree, "All");
        assert_eq!(flat, vec![ScopeOption::new("All / 39", "39")]);
    }

    #[test]
    fn test_find_by_value_any_depth() {
        let tree = build_tree(&sample_menu());
        assert_eq!(find_by_value(&tree, "39").map(|n| n.label.as_str()), Some("No.39 Middle School"));
        assert_eq!(find_by_value(&tree, "39/2024").map(|n| n.raw.as_str()), Some("2024"));
        assert_eq!(find_by_value(&tree, "40/2024/3").map(|n| n.label.as_str()), Some("3"));
        assert!(find_by_value(&tree, "39/2025").is_none());
        assert!(find_by_value(&tree, "").is_none());
    }

    #[test]
    fn test_label_map() {
        let tree = build_tree(&sample_menu());
        let map = label_map(&tree);
        assert_eq!(map.len(), node_count(&tree));
        assert_eq!(map.get("39/2023/1").map(String::as_str), Some("Class 1"));
        assert_eq!(map.get("40").map(String::as_str), Some("40"));
    }
}
