//! Selection normalization and option disabling
//!
//! A selected school covers all of its grades and classes, and a selected
//! grade covers all of its classes. Narrower selections under a broader one
//! are redundant: [`normalize`] drops them and [`apply_disabled`] marks the
//! corresponding options as unselectable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::codec::{ParsedScope, ScopeLevel, decode};
use super::tree::ScopeOption;

/// A (school, grade) pair referenced by a selection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GradePair {
    pub school: String,
    pub grade: String,
}

/// Broad selections present in a set of scope strings
///
/// Only school-level entries land in `schools` and only grade-level entries
/// land in `grades`; class-level entries never cover anything.
#[derive(Debug, Clone, Default)]
pub struct SelectionIndex {
    schools: HashSet<String>,
    grades: HashSet<String>,
}

impl SelectionIndex {
    pub fn new<S: AsRef<str>>(selected: &[S]) -> Self {
        let mut index = Self::default();
        for value in selected {
            let parsed = decode(value.as_ref());
            match parsed.level {
                ScopeLevel::School => {
                    index.schools.extend(parsed.school);
                }
                ScopeLevel::Grade => {
                    index.grades.extend(parsed.grade_key());
                }
                ScopeLevel::Class | ScopeLevel::Unknown => {}
            }
        }
        index
    }

    /// Whether a broader selected scope already covers this one
    pub fn covers(&self, scope: &ParsedScope) -> bool {
        let school_selected = scope.school.as_ref().is_some_and(|s| self.schools.contains(s));
        match scope.level {
            ScopeLevel::School | ScopeLevel::Unknown => false,
            ScopeLevel::Grade => school_selected,
            ScopeLevel::Class => {
                school_selected || scope.grade_key().is_some_and(|key| self.grades.contains(&key))
            }
        }
    }
}

/// Remove duplicates and selections already covered by a broader selection
///
/// First-seen order is preserved. Unknown-level entries are dropped.
pub fn normalize<S: AsRef<str>>(selected: &[S]) -> Vec<String> {
    debug!(count = %selected.len(), "normalize: called");
    let mut seen = HashSet::new();
    let unique: Vec<&str> = selected
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| seen.insert(*v))
        .collect();

    let index = SelectionIndex::new(unique.as_slice());
    unique
        .into_iter()
        .filter(|value| {
            let parsed = decode(value);
            parsed.level != ScopeLevel::Unknown && !index.covers(&parsed)
        })
        .map(str::to_string)
        .collect()
}

/// Mark each option disabled when a broader selected scope covers it
///
/// The selection itself is not modified. School options are never disabled.
pub fn apply_disabled<S: AsRef<str>>(options: &[ScopeOption], selected: &[S]) -> Vec<ScopeOption> {
    debug!(options = %options.len(), selected = %selected.len(), "apply_disabled: called");
    let index = SelectionIndex::new(selected);
    options
        .iter()
        .map(|opt| ScopeOption {
            disabled: index.covers(&decode(&opt.value)),
            ..opt.clone()
        })
        .collect()
}

/// Distinct (school, grade) pairs referenced by grade and class scopes
pub fn grade_pairs<S: AsRef<str>>(scopes: &[S]) -> Vec<GradePair> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for value in scopes {
        let parsed = decode(value.as_ref());
        if !matches!(parsed.level, ScopeLevel::Grade | ScopeLevel::Class) {
            continue;
        }
        let (Some(key), Some(school), Some(grade)) = (parsed.grade_key(), parsed.school, parsed.grade) else {
            continue;
        };
        if seen.insert(key) {
            pairs.push(GradePair { school, grade });
        }
    }
    pairs
}
