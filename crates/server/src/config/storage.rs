use serde::Deserialize;

/// Storage backend configuration.
#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Backend name: `"memory"` (default) or `"aws"` (requires building
    /// with the `aws` feature).
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Settings for the DynamoDB + S3 backend. Parsed regardless of
    /// whether the feature is compiled in, so one config file can serve
    /// both builds.
    #[serde(default)]
    pub aws: AwsBackendConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            aws: AwsBackendConfig::default(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_owned()
}

/// Settings for the DynamoDB + S3 backend.
#[derive(Debug, Deserialize)]
pub struct AwsBackendConfig {
    /// DynamoDB table holding the metadata records.
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// S3 bucket holding the data payloads.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Optional endpoint URL for local development.
    pub endpoint_url: Option<String>,
    /// Prefix applied to partition keys and object keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for AwsBackendConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            bucket: default_bucket(),
            region: default_region(),
            endpoint_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_table_name() -> String {
    "fragmenta_fragments".to_owned()
}

fn default_bucket() -> String {
    "fragmenta-fragments".to_owned()
}

fn default_region() -> String {
    "us-east-1".to_owned()
}

fn default_key_prefix() -> String {
    "fragmenta".to_owned()
}
