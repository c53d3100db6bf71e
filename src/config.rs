use serde::{Deserialize, Serialize};

// Catalog pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    // Rows assembled at once; 1 keeps the listing strictly sequential
    pub concurrency: usize,
    // Fetch all hotel attributes in one store call instead of one per field
    pub batch_attributes: bool,
    // Upper bound for assembling a single row
    pub row_timeout_ms: Option<u64>,
    // Upper bound for a whole listing
    pub deadline_ms: Option<u64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            batch_attributes: false,
            row_timeout_ms: None,
            deadline_ms: None,
        }
    }
}

impl CatalogConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
