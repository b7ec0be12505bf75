//! One-shot cache for the built scope tree

use std::future::Future;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::ScopeError;
use crate::scope::ScopeNode;

/// Shared, immutable scope tree
pub type ScopeTree = Arc<[ScopeNode]>;

/// Holds the scope tree once it has been built successfully
///
/// Concurrent callers of [`ScopeTreeCache::get_or_try_build`] share a single
/// build. A failed build leaves the cache empty so the next call retries.
#[derive(Debug, Default)]
pub struct ScopeTreeCache {
    cell: OnceCell<ScopeTree>,
}

impl ScopeTreeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tree, if one has been built
    pub fn get(&self) -> Option<ScopeTree> {
        self.cell.get().cloned()
    }

    pub fn is_populated(&self) -> bool {
        self.cell.initialized()
    }

    /// Return the cached tree or run `build` to populate it
    pub async fn get_or_try_build<F, Fut>(&self, build: F) -> Result<ScopeTree, ScopeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ScopeNode>, ScopeError>>,
    {
        let tree = self
            .cell
            .get_or_try_init(move || async move {
                debug!("ScopeTreeCache::get_or_try_build: cache empty, building");
                build().await.map(ScopeTree::from)
            })
            .await?;
        Ok(tree.clone())
    }

    /// Drop the cached tree so the next build fetches again
    pub fn reset(&mut self) {
        debug!("ScopeTreeCache::reset: called");
        self.cell.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: &str) -> ScopeNode {
        ScopeNode {
            label: value.to_string(),
            value: value.to_string(),
            raw: value.to_string(),
            children: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_builds_once() {
        let cache = ScopeTreeCache::new();
        assert!(cache.get().is_none());

        let first = cache.get_or_try_build(|| async { Ok(vec![node("39")]) }).await.unwrap();
        let second = cache.get_or_try_build(|| async { Ok(vec![node("40")]) }).await.unwrap();

        assert_eq!(first[0].value, "39");
        assert_eq!(second[0].value, "39");
        assert!(cache.is_populated());
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let cache = ScopeTreeCache::new();

        let result = cache
            .get_or_try_build(|| async { Err(ScopeError::InvalidResponse("boom".to_string())) })
            .await;
        assert!(result.is_err());
        assert!(!cache.is_populated());

        let tree = cache.get_or_try_build(|| async { Ok(vec![node("39")]) }).await.unwrap();
        assert_eq!(tree.len(), 1);
    }

    #[tokio::test]
    async fn test_reset() {
        let mut cache = ScopeTreeCache::new();
        cache.get_or_try_build(|| async { Ok(vec![node("39")]) }).await.unwrap();

        cache.reset();
        assert!(cache.get().is_none());

        let tree = cache.get_or_try_build(|| async { Ok(vec![node("40")]) }).await.unwrap();
        assert_eq!(tree[0].value, "40");
    }
}
