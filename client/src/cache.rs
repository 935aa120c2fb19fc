//! Remote-data cache
//!
//! Query results are keyed by resource, optional entity id and the canonical
//! JSON form of the filter parameters. An entry stays fresh until it is
//! invalidated; invalidation only marks it stale, so the last known value is
//! still available while the next query refetches.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use shared::models::LibraryKind;
use tokio::sync::RwLock;

use crate::error::ClientResult;

/// Cached resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    CurrentUser,
    Dashboard,
    Products,
    ProductStocks,
    Library(LibraryKind),
    Requisitions,
    RequisitionItems,
    WarehouseStocks,
    Dispenses,
    DispenseItems,
    PurchaseOrders,
    Inspections,
    DeliveryItems,
    Users,
    Roles,
    Permissions,
    SystemLogs,
}

/// Typed cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: Resource,
    pub id: Option<u64>,
    pub params: Option<String>,
}

impl QueryKey {
    /// Key for a listing without parameters
    pub fn list(resource: Resource) -> Self {
        Self {
            resource,
            id: None,
            params: None,
        }
    }

    /// Key for a single record
    pub fn entity(resource: Resource, id: u64) -> Self {
        Self {
            resource,
            id: Some(id),
            params: None,
        }
    }

    /// Attach filter parameters. Object keys are sorted, so two filter
    /// values that serialize to the same fields share an entry.
    pub fn with_params<P: Serialize + ?Sized>(mut self, params: &P) -> ClientResult<Self> {
        let value = serde_json::to_value(params)?;
        self.params = match value {
            serde_json::Value::Null => None,
            serde_json::Value::Object(ref map) if map.is_empty() => None,
            other => Some(other.to_string()),
        };
        Ok(self)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.resource)?;
        if let Some(id) = self.id {
            write!(f, "/{id}")?;
        }
        if let Some(params) = &self.params {
            write!(f, "?{params}")?;
        }
        Ok(())
    }
}

/// What to mark stale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalidate {
    /// Every key of a resource (lists and single records)
    Resource(Resource),
    /// Every key of one record, whatever its parameters
    Entity(Resource, u64),
    /// One exact key
    Key(QueryKey),
}

impl Invalidate {
    fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Invalidate::Resource(resource) => key.resource == *resource,
            Invalidate::Entity(resource, id) => key.resource == *resource && key.id == Some(*id),
            Invalidate::Key(exact) => key == exact,
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    stale: bool,
}

/// Query cache shared by the views
#[derive(Default)]
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the fresh entry for `key`, or run `fetch` and store its result.
    /// A failed fetch leaves any previous value in place.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, fetch: F) -> ClientResult<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if let Some(value) = self.fresh::<T>(&key).await {
            tracing::trace!(%key, "cache hit");
            return Ok(value);
        }
        tracing::debug!(%key, "fetching");
        let value = fetch().await?;
        self.store(key, value.clone()).await;
        Ok(value)
    }

    /// Fresh value only
    pub async fn fresh<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| !e.stale)
            .and_then(|e| e.value.downcast_ref::<T>())
            .cloned()
    }

    /// Last known value, fresh or stale
    pub async fn last_known<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .and_then(|e| e.value.downcast_ref::<T>())
            .cloned()
    }

    pub async fn store<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            Entry {
                value: Arc::new(value),
                fetched_at: Instant::now(),
                stale: false,
            },
        );
    }

    pub async fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.entries.read().await.get(key).map(|e| e.stale)
    }

    /// When `key` was last fetched
    pub async fn fetched_at(&self, key: &QueryKey) -> Option<Instant> {
        self.entries.read().await.get(key).map(|e| e.fetched_at)
    }

    /// Mark matching entries stale; returns how many were marked
    pub async fn invalidate(&self, target: Invalidate) -> usize {
        let mut entries = self.entries.write().await;
        let mut marked = 0;
        for (key, entry) in entries.iter_mut() {
            if target.matches(key) {
                entry.stale = true;
                marked += 1;
            }
        }
        tracing::debug!(?target, marked, "invalidated");
        marked
    }

    pub async fn invalidate_all(&self, targets: impl IntoIterator<Item = Invalidate>) {
        for target in targets {
            self.invalidate(target).await;
        }
    }

    /// Drop everything (logout)
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Serialize)]
    struct Filters {
        search: Option<String>,
        page: u32,
    }

    #[test]
    fn test_params_are_canonical() {
        let a = QueryKey::list(Resource::Requisitions)
            .with_params(&serde_json::json!({"page": 1, "search": "RIS"}))
            .unwrap();
        let b = QueryKey::list(Resource::Requisitions)
            .with_params(&Filters {
                search: Some("RIS".into()),
                page: 1,
            })
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            QueryKey::list(Resource::Users).with_params(&()).unwrap(),
            QueryKey::list(Resource::Users)
        );
    }

    #[test]
    fn test_same_params_different_resource_do_not_collide() {
        let params = serde_json::json!({"page": 1});
        let a = QueryKey::list(Resource::Library(LibraryKind::Units))
            .with_params(&params)
            .unwrap();
        let b = QueryKey::list(Resource::Library(LibraryKind::Brands))
            .with_params(&params)
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_fresh_entry_skips_fetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let key = QueryKey::entity(Resource::Requisitions, 4);
        for _ in 0..3 {
            let value: u32 = cache
                .query(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await
                .unwrap();
            assert_eq!(value, 7);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_entity_marks_all_its_keys() {
        let cache = QueryCache::new();
        let detail = QueryKey::entity(Resource::Dispenses, 9);
        let items = QueryKey::entity(Resource::Dispenses, 9)
            .with_params(&serde_json::json!({"page": 2}))
            .unwrap();
        let other = QueryKey::entity(Resource::Dispenses, 10);
        let list = QueryKey::list(Resource::Dispenses);
        for key in [&detail, &items, &other, &list] {
            cache.store(key.clone(), 1u8).await;
        }

        assert_eq!(cache.invalidate(Invalidate::Entity(Resource::Dispenses, 9)).await, 2);
        assert_eq!(cache.is_stale(&detail).await, Some(true));
        assert_eq!(cache.is_stale(&items).await, Some(true));
        assert_eq!(cache.is_stale(&other).await, Some(false));
        assert_eq!(cache.is_stale(&list).await, Some(false));

        cache.invalidate(Invalidate::Resource(Resource::Dispenses)).await;
        assert_eq!(cache.is_stale(&list).await, Some(true));
        // Stale values stay readable until refetched
        assert_eq!(cache.last_known::<u8>(&list).await, Some(1));
        assert_eq!(cache.fresh::<u8>(&list).await, None);
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_last_known_value() {
        let cache = QueryCache::new();
        let key = QueryKey::list(Resource::Products);
        cache.store(key.clone(), vec!["Paracetamol".to_string()]).await;
        cache.invalidate(Invalidate::Key(key.clone())).await;

        let result: ClientResult<Vec<String>> = cache
            .query(key.clone(), || async {
                Err(ClientError::Network("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(
            cache.last_known::<Vec<String>>(&key).await,
            Some(vec!["Paracetamol".to_string()])
        );
    }

    #[test]
    fn test_clear_on_logout() {
        tokio_test::block_on(async {
            let cache = QueryCache::new();
            cache.store(QueryKey::list(Resource::Users), 1u8).await;
            assert!(!cache.is_empty().await);
            cache.clear().await;
            assert_eq!(cache.len().await, 0);
        });
    }
}
