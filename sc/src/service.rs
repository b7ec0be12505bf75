//! Scope service: a menu source plus the tree cache

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{ScopeTree, ScopeTreeCache};
use crate::error::ScopeError;
use crate::scope::{ScopeNode, ScopeOption, apply_disabled, build_tree, find_by_value, flatten};
use crate::source::MenuSource;

/// Builds the scope tree from a menu source, at most once per cache
pub struct ScopeService {
    source: Arc<dyn MenuSource>,
    cache: ScopeTreeCache,
}

impl ScopeService {
    pub fn new(source: Arc<dyn MenuSource>) -> Self {
        Self::with_cache(source, ScopeTreeCache::new())
    }

    pub fn with_cache(source: Arc<dyn MenuSource>, cache: ScopeTreeCache) -> Self {
        Self { source, cache }
    }

    /// Fetch the menu and build the tree, or return the cached tree
    ///
    /// Fetch errors propagate and leave the cache empty.
    pub async fn build_tree(&self) -> Result<ScopeTree, ScopeError> {
        debug!(cached = %self.cache.is_populated(), "ScopeService::build_tree: called");
        let source = Arc::clone(&self.source);
        self.cache
            .get_or_try_build(|| async move {
                let menu = source.fetch_menu().await?;
                let tree = build_tree(&menu);
                info!(schools = %tree.len(), "ScopeService::build_tree: scope tree built");
                Ok(tree)
            })
            .await
    }

    /// Flattened options with `disabled` set against the current selection
    pub async fn options<S: AsRef<str>>(&self, selected: &[S]) -> Result<Vec<ScopeOption>, ScopeError> {
        let tree = self.build_tree().await?;
        Ok(apply_disabled(&flatten(&tree), selected))
    }

    /// Look up a node of the tree by its scope value
    pub async fn find(&self, value: &str) -> Result<Option<ScopeNode>, ScopeError> {
        let tree = self.build_tree().await?;
        Ok(find_by_value(&tree, value).cloned())
    }

    pub fn cache(&self) -> &ScopeTreeCache {
        &self.cache
    }

    /// Forget the cached tree
    pub fn reset_cache(&mut self) {
        self.cache.reset();
    }
}
