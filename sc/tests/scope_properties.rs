//! Property tests for the scope codec, tree and selection rules

use proptest::prelude::*;
use serde_json::{Value, json};

use schoolscope::scope::{
    ParsedScope, ScopeLevel, apply_disabled, build_tree, decode, encode, find_by_value, flatten, node_count, normalize,
};
use schoolscope::ScopeOption;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,6}"
}

/// Scope strings over a small alphabet so selections overlap often
fn scope_value() -> impl Strategy<Value = String> {
    let id = || "[1-3]";
    prop_oneof![
        id().prop_map(|s| s),
        (id(), id()).prop_map(|(s, g)| format!("{}/{}", s, g)),
        (id(), id(), id()).prop_map(|(s, g, c)| format!("{}/{}/{}", s, g, c)),
    ]
}

fn selection() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(scope_value(), 0..12)
}

/// Menu of up to 3 schools x 3 grades x 3 classes with navigation links mixed in
fn menu() -> impl Strategy<Value = Vec<Value>> {
    let classes = prop::collection::vec(segment(), 0..3);
    let grades = prop::collection::vec((segment(), classes), 0..3);
    prop::collection::vec((segment(), grades), 0..3).prop_map(|schools| {
        schools
            .into_iter()
            .map(|(school, grades)| {
                let mut children: Vec<Value> = grades
                    .into_iter()
                    .map(|(grade, classes)| {
                        let mut class_nodes: Vec<Value> =
                            classes.into_iter().map(|c| json!({"raw": c, "text": c})).collect();
                        class_nodes.push(json!({"text": "Schedule", "to": "/schedule"}));
                        json!({"raw": grade, "children": class_nodes})
                    })
                    .collect();
                children.push(json!({"text": "Config", "to": "/config"}));
                json!({"raw": school, "label": format!("School {}", school), "children": children})
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn decode_recovers_encoded_class(s in segment(), g in segment(), c in segment()) {
        let value = encode(ScopeLevel::Class, &s, Some(g.as_str()), Some(c.as_str())).unwrap();
        prop_assert_eq!(
            decode(&value),
            ParsedScope {
                level: ScopeLevel::Class,
                school: Some(s),
                grade: Some(g),
                class: Some(c),
            }
        );
    }

    #[test]
    fn normalize_is_idempotent(selected in selection()) {
        let once = normalize(&selected);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_output_is_unique_subset(selected in selection()) {
        let out = normalize(&selected);
        for (i, value) in out.iter().enumerate() {
            prop_assert!(selected.contains(value));
            prop_assert!(!out[i + 1..].contains(value));
        }
    }

    #[test]
    fn selected_school_removes_descendants(selected in selection()) {
        let out = normalize(&selected);
        let schools: Vec<&String> = selected.iter().filter(|v| decode(v).level == ScopeLevel::School).collect();
        for school in schools {
            let prefix = format!("{}/", school);
            prop_assert!(out.iter().all(|v| !v.starts_with(&prefix)));
            prop_assert!(out.contains(school));
        }
    }

    #[test]
    fn school_options_never_disabled(selected in selection(), values in selection()) {
        let options: Vec<ScopeOption> = values.iter().map(|v| ScopeOption::new(v.clone(), v.clone())).collect();
        for option in apply_disabled(&options, &selected) {
            if decode(&option.value).level == ScopeLevel::School {
                prop_assert!(!option.disabled);
            }
        }
    }

    #[test]
    fn kept_selections_are_not_disabled(selected in selection()) {
        let kept = normalize(&selected);
        let options: Vec<ScopeOption> = kept.iter().map(|v| ScopeOption::new(v.clone(), v.clone())).collect();
        prop_assert!(apply_disabled(&options, &selected).iter().all(|o| !o.disabled));
    }

    #[test]
    fn flatten_has_one_entry_per_node(nodes in menu()) {
        let tree = build_tree(&nodes);
        let flat = flatten(&tree);
        prop_assert_eq!(flat.len(), node_count(&tree));
        for option in &flat {
            let node = find_by_value(&tree, &option.value);
            prop_assert!(node.is_some());
            prop_assert_eq!(&node.unwrap().value, &option.value);
        }
    }
}
