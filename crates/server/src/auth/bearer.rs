use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use tracing::warn;

use fragmenta_core::{FragmentError, Principal};

use crate::config::BearerAuthConfig;
use crate::error::ServerError;

/// Claims read from an accepted identity token. Only the email is kept;
/// expiry and issuer checks run on the raw token during validation.
#[derive(Debug, Deserialize)]
struct Claims {
    email: Option<String>,
}

/// Verifies HS256-signed identity tokens.
///
/// The decoding key and validation rules are built once at startup and
/// reused for every request.
pub struct BearerVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl BearerVerifier {
    /// Build the verifier from configuration.
    pub fn new(config: &BearerAuthConfig) -> Result<Self, ServerError> {
        if config.secret.is_empty() {
            return Err(ServerError::Config(
                "auth.bearer.secret is required for bearer mode".to_owned(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        })
    }

    /// Verify a token and extract the email claim.
    pub fn verify(&self, token: &str) -> Result<Principal, FragmentError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            warn!(error = %e, "token verification failed");
            FragmentError::Unauthenticated("invalid bearer token".to_owned())
        })?;

        match data.claims.email {
            Some(email) if !email.is_empty() => Ok(Principal::EmailClaim { email }),
            _ => {
                warn!("token verified but email claim missing");
                Err(FragmentError::Unauthenticated(
                    "token carries no email claim".to_owned(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct TestClaims {
        email: Option<String>,
        exp: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        iss: Option<String>,
    }

    const SECRET: &str = "unit-test-secret";

    fn verifier(issuer: Option<&str>) -> BearerVerifier {
        BearerVerifier::new(&BearerAuthConfig {
            secret: SECRET.to_owned(),
            issuer: issuer.map(str::to_owned),
        })
        .unwrap()
    }

    fn issue(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn far_future() -> u64 {
        4_102_444_800 // 2100-01-01
    }

    #[test]
    fn valid_token_yields_email_claim() {
        let token = issue(
            &TestClaims {
                email: Some("user1@email.com".to_owned()),
                exp: far_future(),
                iss: None,
            },
            SECRET,
        );

        let principal = verifier(None).verify(&token).unwrap();
        assert_eq!(
            principal,
            Principal::EmailClaim {
                email: "user1@email.com".to_owned()
            }
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(
            &TestClaims {
                email: Some("user1@email.com".to_owned()),
                exp: far_future(),
                iss: None,
            },
            "some-other-secret",
        );
        assert!(verifier(None).verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue(
            &TestClaims {
                email: Some("user1@email.com".to_owned()),
                exp: 1, // 1970
                iss: None,
            },
            SECRET,
        );
        assert!(verifier(None).verify(&token).is_err());
    }

    #[test]
    fn missing_email_claim_is_rejected() {
        let token = issue(
            &TestClaims {
                email: None,
                exp: far_future(),
                iss: None,
            },
            SECRET,
        );
        let err = verifier(None).verify(&token).unwrap_err();
        assert!(matches!(err, FragmentError::Unauthenticated(_)));
    }

    #[test]
    fn issuer_is_enforced_when_configured() {
        let good = issue(
            &TestClaims {
                email: Some("user1@email.com".to_owned()),
                exp: far_future(),
                iss: Some("https://idp.example.com".to_owned()),
            },
            SECRET,
        );
        let bad = issue(
            &TestClaims {
                email: Some("user1@email.com".to_owned()),
                exp: far_future(),
                iss: Some("https://evil.example.com".to_owned()),
            },
            SECRET,
        );

        let verifier = verifier(Some("https://idp.example.com"));
        assert!(verifier.verify(&good).is_ok());
        assert!(verifier.verify(&bad).is_err());
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let result = BearerVerifier::new(&BearerAuthConfig::default());
        assert!(result.is_err());
    }
}
