use std::collections::HashMap;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

use fragmenta_core::{FragmentError, Principal};

use crate::config::BasicAuthConfig;

/// Verifies HTTP Basic credentials against a table keyed by email.
///
/// The table stores lowercase hex SHA-256 password digests, so the
/// config file never carries a plaintext password.
pub struct BasicVerifier {
    users: HashMap<String, String>,
}

impl BasicVerifier {
    /// Build the in-memory user table from configuration.
    pub fn new(config: &BasicAuthConfig) -> Self {
        let users = config
            .users
            .iter()
            .map(|u| (u.email.clone(), u.password_sha256.to_ascii_lowercase()))
            .collect();
        Self { users }
    }

    /// Verify the base64 credentials portion of a `Basic` header.
    pub fn verify(&self, encoded: &str) -> Result<Principal, FragmentError> {
        let decoded = BASE64
            .decode(encoded)
            .map_err(|_| invalid_credentials())?;
        let decoded = String::from_utf8(decoded).map_err(|_| invalid_credentials())?;
        let (email, password) = decoded.split_once(':').ok_or_else(invalid_credentials)?;

        let expected = self.users.get(email).ok_or_else(invalid_credentials)?;
        if hash_password(password) == *expected {
            Ok(Principal::Subject(email.to_owned()))
        } else {
            Err(invalid_credentials())
        }
    }
}

/// Hash a password to the table format (lowercase hex SHA-256).
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn invalid_credentials() -> FragmentError {
    FragmentError::Unauthenticated("invalid credentials".to_owned())
}
