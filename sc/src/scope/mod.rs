//! School → grade → class scope model

mod codec;
mod menu;
mod selection;
mod tree;

pub use codec::{ParsedScope, SEPARATOR, ScopeLevel, decode, encode, validate_segment};
pub use menu::{HierarchyNode, MenuEntry};
pub use selection::{GradePair, SelectionIndex, apply_disabled, grade_pairs, normalize};
pub use tree::{
    LABEL_SEPARATOR, ScopeNode, ScopeOption, build_tree, find_by_value, flatten, flatten_with_prefix, label_map,
    node_count,
};
