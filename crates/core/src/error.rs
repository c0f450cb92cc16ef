use thiserror::Error;

/// Typed failures raised by the fragment entity model.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The content type parses but is not in the supported whitelist.
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// No resolvable owner identity for the request.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
}
