use thiserror::Error;

/// Failures surfaced by the budget store and the remote store boundary.
///
/// Mutating operations never panic across the public boundary; they return
/// `Result<T>` and leave retry decisions to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("No authenticated user for this operation")]
    NotAuthenticated,

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Could not allocate a new record id under '{0}'")]
    IdAllocation(String),

    #[error("Remote store operation failed: {0}")]
    Remote(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
