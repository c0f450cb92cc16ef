pub mod basic;
pub mod bearer;
pub mod middleware;

use tracing::{info, warn};

use fragmenta_core::{FragmentError, Principal};

use crate::config::{AuthConfig, AuthMode};
use crate::error::ServerError;

use self::basic::BasicVerifier;
use self::bearer::BearerVerifier;

/// Central auth provider, built once at startup from configuration and
/// injected into the router state.
///
/// Each mode owns its verifier for the life of the process; request
/// handling never reaches into globals. Verifying credentials is the
/// only job here -- the owner key is derived afterwards by
/// [`fragmenta_core::resolve_owner`].
pub struct AuthProvider {
    mode: Mode,
}

enum Mode {
    Bearer(BearerVerifier),
    Basic(BasicVerifier),
    Static(Principal),
}

impl AuthProvider {
    /// Build the auth provider for the configured mode.
    pub fn new(config: &AuthConfig) -> Result<Self, ServerError> {
        let mode = match config.mode {
            AuthMode::Bearer => {
                info!("configured bearer token authorization");
                Mode::Bearer(BearerVerifier::new(&config.bearer)?)
            }
            AuthMode::Basic => {
                if config.basic.users.is_empty() {
                    warn!("basic auth enabled with no users; all requests will be rejected");
                }
                Mode::Basic(BasicVerifier::new(&config.basic))
            }
            AuthMode::Static => {
                let identity = config.static_identity.identity.clone();
                if identity.is_empty() {
                    return Err(ServerError::Config(
                        "auth.static.identity must not be empty".to_owned(),
                    ));
                }
                warn!(%identity, "static stand-in identity enabled; all requests share one owner");
                Mode::Static(Principal::Subject(identity))
            }
        };
        Ok(Self { mode })
    }

    /// Authenticate the `Authorization` header value of one request.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Principal, FragmentError> {
        match &self.mode {
            Mode::Static(principal) => Ok(principal.clone()),
            Mode::Bearer(verifier) => {
                let token = strip_scheme(authorization, "Bearer ").ok_or_else(missing_header)?;
                verifier.verify(token)
            }
            Mode::Basic(verifier) => {
                let encoded = strip_scheme(authorization, "Basic ").ok_or_else(missing_header)?;
                verifier.verify(encoded)
            }
        }
    }
}

/// Split the credentials off an `Authorization` header value. Scheme
/// comparison is case-insensitive per RFC 9110.
fn strip_scheme<'a>(header: Option<&'a str>, scheme: &str) -> Option<&'a str> {
    let header = header?;
    let (prefix, rest) = header.split_at_checked(scheme.len())?;
    prefix.eq_ignore_ascii_case(scheme).then(|| rest.trim())
}

fn missing_header() -> FragmentError {
    FragmentError::Unauthenticated("missing or malformed Authorization header".to_owned())
}

#[cfg(test)]
mod tests {
    use crate::config::{BasicUserConfig, StaticAuthConfig};

    use super::*;

    #[test]
    fn static_mode_always_authenticates() {
        let config = AuthConfig {
            mode: AuthMode::Static,
            ..AuthConfig::default()
        };
        let provider = AuthProvider::new(&config).unwrap();

        let principal = provider.authenticate(None).unwrap();
        assert_eq!(
            principal,
            Principal::Subject("test-user@fragmenta.dev".to_owned())
        );
    }

    #[test]
    fn basic_mode_requires_a_header() {
        let config = AuthConfig {
            mode: AuthMode::Basic,
            ..AuthConfig::default()
        };
        let provider = AuthProvider::new(&config).unwrap();
        assert!(provider.authenticate(None).is_err());
        assert!(provider.authenticate(Some("Bearer abc")).is_err());
    }

    #[test]
    fn basic_scheme_is_case_insensitive() {
        let mut config = AuthConfig {
            mode: AuthMode::Basic,
            ..AuthConfig::default()
        };
        config.basic.users.push(BasicUserConfig {
            email: "user1@email.com".to_owned(),
            password_sha256: basic::hash_password("pw"),
        });
        let provider = AuthProvider::new(&config).unwrap();

        use base64::Engine as _;
        let encoded = base64::engine::general_purpose::STANDARD.encode("user1@email.com:pw");
        let principal = provider
            .authenticate(Some(&format!("basic {encoded}")))
            .unwrap();
        assert_eq!(principal, Principal::Subject("user1@email.com".to_owned()));
    }

    #[test]
    fn bearer_mode_requires_a_secret() {
        let config = AuthConfig {
            mode: AuthMode::Bearer,
            ..AuthConfig::default()
        };
        assert!(AuthProvider::new(&config).is_err());
    }

    #[test]
    fn empty_static_identity_is_a_config_error() {
        let config = AuthConfig {
            mode: AuthMode::Static,
            static_identity: StaticAuthConfig {
                identity: String::new(),
            },
            ..AuthConfig::default()
        };
        assert!(AuthProvider::new(&config).is_err());
    }
}
