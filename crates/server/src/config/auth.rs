use serde::Deserialize;

/// Authentication configuration.
#[derive(Debug, Default, Deserialize)]
pub struct AuthConfig {
    /// Provider mode.
    #[serde(default)]
    pub mode: AuthMode,
    /// Settings for `bearer` mode.
    #[serde(default)]
    pub bearer: BearerAuthConfig,
    /// Settings for `basic` mode.
    #[serde(default)]
    pub basic: BasicAuthConfig,
    /// Settings for `static` mode.
    #[serde(default, rename = "static")]
    pub static_identity: StaticAuthConfig,
}

/// How request credentials are verified.
///
/// The default is `basic` with an empty user table, which rejects every
/// request until users are configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// HS256 identity tokens carrying an email claim.
    Bearer,
    /// HTTP Basic credentials checked against the configured user table.
    #[default]
    Basic,
    /// A fixed stand-in identity; every request is accepted. Test and
    /// local development only.
    Static,
}

/// Settings for `bearer` mode.
#[derive(Debug, Default, Deserialize)]
pub struct BearerAuthConfig {
    /// Shared HS256 signing secret. Required when bearer mode is active.
    #[serde(default)]
    pub secret: String,
    /// Expected `iss` claim, checked when set.
    pub issuer: Option<String>,
}

/// Settings for `basic` mode.
#[derive(Debug, Default, Deserialize)]
pub struct BasicAuthConfig {
    /// Accepted users.
    #[serde(default)]
    pub users: Vec<BasicUserConfig>,
}

/// One basic-auth user entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BasicUserConfig {
    /// The user's email, which doubles as the username.
    pub email: String,
    /// Lowercase hex SHA-256 of the user's password.
    pub password_sha256: String,
}

/// Settings for `static` mode.
#[derive(Debug, Deserialize)]
pub struct StaticAuthConfig {
    /// The stand-in identity every request authenticates as.
    #[serde(default = "default_static_identity")]
    pub identity: String,
}

impl Default for StaticAuthConfig {
    fn default() -> Self {
        Self {
            identity: default_static_identity(),
        }
    }
}

fn default_static_identity() -> String {
    "test-user@fragmenta.dev".to_owned()
}
