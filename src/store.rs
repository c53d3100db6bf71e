// Query interface over the relational catalog store.
//
// Four logical collections back the catalog: principals (one per hotel
// candidate), principal attributes, posts (reviews and rooms, keyed to a
// principal by author id) and post attributes.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

pub const POST_TYPE_REVIEW: &str = "review";
pub const POST_TYPE_ROOM: &str = "room";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalRow {
    pub id: u64,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRow {
    pub owner_id: u64,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRow {
    pub id: u64,
    pub author_id: u64,
    pub post_type: String,
    pub title: String,
}

#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    // All principals, in storage order
    async fn principals(&self) -> Result<Vec<PrincipalRow>, StoreError>;

    // First stored value for (principal, key), if any
    async fn principal_meta(&self, id: u64, key: &str) -> Result<Option<String>, StoreError>;

    // Posts of the given type written by `author_id`, ordered by post id
    async fn posts_by_author(
        &self,
        author_id: u64,
        post_type: &str,
    ) -> Result<Vec<PostRow>, StoreError>;

    // First stored value for (post, key), if any
    async fn post_meta(&self, post_id: u64, key: &str) -> Result<Option<String>, StoreError>;

    // Batched lookup of several principal attributes. Backends that can answer
    // in one round trip should override this; the result must match calling
    // `principal_meta` once per key.
    async fn principal_metas(
        &self,
        id: u64,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.principal_meta(id, key).await? {
                values.insert(key.to_string(), value);
            }
        }
        Ok(values)
    }

    // Batched lookup of several post attributes, same contract as above
    async fn post_metas(
        &self,
        post_id: u64,
        keys: &[&str],
    ) -> Result<HashMap<String, String>, StoreError> {
        let mut values = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.post_meta(post_id, key).await? {
                values.insert(key.to_string(), value);
            }
        }
        Ok(values)
    }
}
