use thiserror::Error;

// Errors raised by a catalog store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query timeout after {0}ms")]
    Timeout(u64),

    #[error("Other error: {0}")]
    Other(String),
}

// Hard failures of the catalog pipeline. Filter exclusions are never reported
// through this type, see `assembler::Assembly`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Malformed data for {owner} ({key} = {value:?})")]
    MalformedData {
        owner: String,
        key: String,
        value: String,
    },

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Numeric domain error: {0}")]
    NumericDomain(String),

    #[error("Listing cancelled")]
    Cancelled,

    #[error("Listing deadline exceeded")]
    DeadlineExceeded,

    #[error("Row assembly timed out after {0}ms")]
    RowTimeout(u64),
}

impl CatalogError {
    pub(crate) fn malformed(owner: impl Into<String>, key: &str, value: &str) -> Self {
        CatalogError::MalformedData {
            owner: owner.into(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
