use thiserror::Error;

/// Failures surfaced by the store adapters. All map to HTTP 500 at the
/// boundary; callers retry, the server does not.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("blob storage error: {0}")]
    Blob(String),
}
