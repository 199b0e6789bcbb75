//! Error types for the search engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid cache capacity: {0} (capacity must be a positive integer)")]
    InvalidCapacity(usize),

    #[error("Missing dataset: {0}")]
    MissingDataset(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        SearchError::Dataset(format!("{:#}", err))
    }
}

impl serde::Serialize for SearchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
