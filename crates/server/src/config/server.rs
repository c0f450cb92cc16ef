use serde::Deserialize;

/// HTTP server bind configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// External URL for building `Location` headers
    /// (e.g. `https://fragments.example.com` behind a proxy).
    ///
    /// If not set, defaults to `http://{host}:{port}`.
    pub external_url: Option<String>,
    /// Maximum accepted fragment payload size in bytes.
    #[serde(default = "default_max_fragment_bytes")]
    pub max_fragment_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            external_url: None,
            max_fragment_bytes: default_max_fragment_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_max_fragment_bytes() -> usize {
    10 * 1024 * 1024
}
