//! Owner identity resolution.
//!
//! Only a hashed form of the user's identity is ever stored. The owner
//! key is the lowercase hex SHA-256 of the identity string, so the same
//! principal always maps to the same key while the key itself reveals
//! nothing about the identity it was derived from.

use sha2::{Digest, Sha256};

use crate::error::FragmentError;
use crate::types::OwnerId;

impl OwnerId {
    /// Derive the owner key for an identity string (lowercase hex SHA-256).
    pub fn derive(identity: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(identity.as_bytes());
        Self::new(hex::encode(hasher.finalize()))
    }
}

/// An authenticated identity as handed over by the auth collaborator.
///
/// One variant per shape the collaborator can yield; the resolver never
/// inspects an opaque value to guess what it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// A verified token claim carrying the user's email.
    EmailClaim { email: String },
    /// A bare identity string (basic-auth username, test stand-in).
    Subject(String),
    /// An already-derived owner key, passed through unchanged.
    Resolved(OwnerId),
}

/// Map an authenticated principal to its owner key.
///
/// Fails with [`FragmentError::Unauthenticated`] when the principal
/// carries no usable identity; a key is never silently assigned.
pub fn resolve_owner(principal: &Principal) -> Result<OwnerId, FragmentError> {
    match principal {
        Principal::EmailClaim { email } if !email.is_empty() => Ok(OwnerId::derive(email)),
        Principal::Subject(identity) if !identity.is_empty() => Ok(OwnerId::derive(identity)),
        Principal::Resolved(owner) if !owner.as_str().is_empty() => Ok(owner.clone()),
        _ => Err(FragmentError::Unauthenticated(
            "no resolvable owner identity".to_owned(),
        )),
    }
}
