mod auth;
mod server;
mod storage;

#[cfg(test)]
mod tests;

pub use auth::*;
pub use server::*;
pub use storage::*;

use serde::Deserialize;

/// Top-level configuration for the Fragmenta server, loaded from a TOML
/// file. Every section has defaults, so a missing file parses as the
/// empty document.
#[derive(Debug, Default, Deserialize)]
pub struct FragmentaConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}
