// In-memory catalog store with fault injection, used by tests, benches and
// fixture-driven callers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::{
    dataset::Dataset,
    error::StoreError,
    store::{CatalogStore, MetaRow, PostRow, PrincipalRow},
};

#[derive(Debug, Default, Clone)]
struct Tables {
    principals: Vec<PrincipalRow>,
    principal_metas: Vec<MetaRow>,
    posts: Vec<PostRow>,
    post_metas: Vec<MetaRow>,
}

pub struct MemoryStore {
    tables: RwLock<Tables>,
    query_count: AtomicUsize,
    fail_next_queries: AtomicUsize,
    // Number of queries still allowed before the next one fails, usize::MAX when off
    fail_after: AtomicUsize,
    delay_ms: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            query_count: AtomicUsize::new(0),
            fail_next_queries: AtomicUsize::new(0),
            fail_after: AtomicUsize::new(usize::MAX),
            delay_ms: AtomicUsize::new(0),
        }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.write();
            tables.principals = dataset.principals;
            tables.principal_metas = dataset.principal_metas;
            tables.posts = dataset.posts;
            tables.post_metas = dataset.post_metas;
        }
        store
    }

    pub fn add_principal(&self, id: u64, display_name: &str) -> &Self {
        self.tables.write().principals.push(PrincipalRow {
            id,
            display_name: display_name.to_string(),
        });
        self
    }

    pub fn add_principal_meta(&self, id: u64, key: &str, value: &str) -> &Self {
        self.tables.write().principal_metas.push(MetaRow {
            owner_id: id,
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn add_post(&self, id: u64, author_id: u64, post_type: &str, title: &str) -> &Self {
        self.tables.write().posts.push(PostRow {
            id,
            author_id,
            post_type: post_type.to_string(),
            title: title.to_string(),
        });
        self
    }

    pub fn add_post_meta(&self, post_id: u64, key: &str, value: &str) -> &Self {
        self.tables.write().post_metas.push(MetaRow {
            owner_id: post_id,
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn fail_next_queries(&self, count: usize) {
        self.fail_next_queries.store(count, Ordering::SeqCst);
    }

    // Let `queries` more queries succeed, then fail the one after.
    pub fn fail_after(&self, queries: usize) {
        self.fail_after.store(queries, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay_ms: usize) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    pub fn reset_query_count(&self) {
        self.query_count.store(0, Ordering::SeqCst);
    }

    // Simulates one round trip: counts it, applies the delay and injected failures
    async fn round_trip(&self) -> Result<(), StoreError> {
        self.query_count.fetch_add(1, Ordering::SeqCst);

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }

        let should_fail = self
            .fail_next_queries
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(StoreError::Connection("injected failure".to_string()));
        }

        let remaining = self.fail_after.load(Ordering::SeqCst);
        if remaining != usize::MAX {
            if remaining == 0 {
                self.fail_after.store(usize::MAX, Ordering::SeqCst);
                return Err(StoreError::Connection("injected failure".to_string()));
            }
            self.fail_after.store(remaining - 1, Ordering::SeqCst);
        }

        Ok(())
    }

    fn first_value(rows: &[MetaRow], owner_id: u64, key: &str) -> Option<String> {
        rows.iter()
            .find(|row| row.owner_id == owner_id && row.key == key)
            .map(|row| row.value.clone())
    }

    fn first_values(rows: &[MetaRow], owner_id: u64, keys: &[&str]) -> HashMap<String, String> {
        let mut values = HashMap::with_capacity(keys.len());
        for row in rows.iter().filter(|row| row.owner_id == owner_id) {
            if keys.contains(&row.key.as_str()) && !values.contains_key(&row.key) {
                values.insert(row.key.clone(), row.value.clone());
            }
        }
        values
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn principals(&self) -> Result<Vec<PrincipalRow>, StoreError> {
        self.round_trip().await?;
        Ok(self.tables.read().principals.clone())
    }

    async fn principal_meta(&self, id: u64, key: &str) -> Result<Option<String>, StoreError> {
        self.round_trip().await?;
        Ok(Self::first_value(&self.tables.read().principal_metas, id, key))
    }

    async fn posts_by_author(
        &self,
        author_id: u64,
        post_type: &str,
    ) -> Result<Vec<PostRow>, StoreError> {
        self.round_trip().await?;
        let mut posts: Vec<PostRow> = self
            .tables
            .read()
            .posts
            .iter()
            .filter(|post| post.author_id == author_id && post.post_type == post_type)
            .cloned()
            .collect();
        posts.sort_by_key(|post| post.id);
        Ok(posts)
    }

    async fn post_meta(&self, post_id: u64, key: &str) -> Result<Option<String>, StoreError> {
        self.round_trip().await?;
        Ok(Self::first_value(&self.tables.read().post_metas, post_id, key))
    }

    async fn principal_metas(
        &self,
        id: u64,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        self.round_trip().await?;
        Ok(Self::first_values(&self.tables.read().principal_metas, id, keys))
    }

    async fn post_metas(
        &self,
        post_id: u64,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        self.round_trip().await?;
        Ok(Self::first_values(&self.tables.read().post_metas, post_id, keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_match_wins() {
        let store = MemoryStore::new();
        store
            .add_principal_meta(1, "phone", "first")
            .add_principal_meta(1, "phone", "second")
            .add_principal_meta(2, "phone", "other");

        assert_eq!(
            store.principal_meta(1, "phone").await.unwrap().as_deref(),
            Some("first")
        );
        assert_eq!(store.principal_meta(1, "missing").await.unwrap(), None);

        let batch = store.principal_metas(1, &["phone", "missing"]).await.unwrap();
        assert_eq!(batch.get("phone").map(String::as_str), Some("first"));
        assert!(!batch.contains_key("missing"));
    }

    #[tokio::test]
    async fn test_posts_filtered_and_ordered() {
        let store = MemoryStore::new();
        store
            .add_post(30, 1, "room", "C")
            .add_post(10, 1, "room", "A")
            .add_post(20, 1, "review", "R")
            .add_post(15, 2, "room", "X");

        let rooms = store.posts_by_author(1, "room").await.unwrap();
        let ids: Vec<u64> = rooms.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }

    #[tokio::test]
    async fn test_fault_injection() {
        let store = MemoryStore::new();
        store.add_principal(1, "Hotel");

        store.fail_next_queries(2);
        assert!(store.principals().await.is_err());
        assert!(store.principals().await.is_err());
        assert!(store.principals().await.is_ok());

        store.fail_after(1);
        assert!(store.principals().await.is_ok());
        assert!(matches!(
            store.principals().await,
            Err(StoreError::Connection(_))
        ));
        assert!(store.principals().await.is_ok());

        assert_eq!(store.query_count(), 6);
    }
}
