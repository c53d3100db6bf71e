// JSON fixture format for seeding a `MemoryStore`

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::store::{MetaRow, PostRow, PrincipalRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub principals: Vec<PrincipalRow>,
    pub principal_metas: Vec<MetaRow>,
    pub posts: Vec<PostRow>,
    pub post_metas: Vec<MetaRow>,
}

impl Dataset {
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("failed to parse catalog dataset")
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset {}", path.display()))?;
        Self::from_json_str(&content).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{memory_store::MemoryStore, store::CatalogStore};

    const SMALL_DATASET: &str = r#"{
        "principals": [{"id": 1, "display_name": "Hotel Lutetia"}],
        "principal_metas": [{"owner_id": 1, "key": "address_city", "value": "Paris"}],
        "posts": [{"id": 10, "author_id": 1, "post_type": "room", "title": "Suite"}],
        "post_metas": [{"owner_id": 10, "key": "price", "value": "120"}]
    }"#;

    #[test]
    fn test_parse_and_seed() {
        let dataset = Dataset::from_json_str(SMALL_DATASET).unwrap();
        assert_eq!(dataset.principals.len(), 1);
        assert_eq!(dataset.post_metas[0].value, "120");

        let store = MemoryStore::from_dataset(dataset);
        let principals = tokio_test::block_on(store.principals()).unwrap();
        assert_eq!(principals[0].display_name, "Hotel Lutetia");
        let city = tokio_test::block_on(store.principal_meta(1, "address_city")).unwrap();
        assert_eq!(city.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_missing_tables_default_to_empty() {
        let dataset = Dataset::from_json_str(r#"{"principals": []}"#).unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_errors_carry_context() {
        let err = Dataset::from_json_str("{ not json").unwrap_err();
        assert!(err.to_string().contains("failed to parse catalog dataset"));

        let err = Dataset::from_path("/nonexistent/catalog.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
