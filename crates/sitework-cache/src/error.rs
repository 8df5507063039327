use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cannot build cache key: {0}")]
    Key(#[from] serde_json::Error),
}
