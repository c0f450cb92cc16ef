use thiserror::Error;

use fragmenta_core::FragmentError;

/// Errors from fragment store and backend operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record exists for the requested `(owner, id)` pair.
    #[error("fragment not found: {0}")]
    NotFound(String),

    /// An entity-level failure (validation, unsupported type, identity).
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend could not be reached or configured.
    #[error("connection error: {0}")]
    Connection(String),

    /// The backend failed an I/O operation.
    #[error("backend error: {0}")]
    Backend(String),
}
