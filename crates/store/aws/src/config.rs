/// Configuration for the DynamoDB + S3 fragment backend.
#[derive(Debug, Clone)]
pub struct AwsConfig {
    /// DynamoDB table holding the metadata records.
    pub table_name: String,

    /// S3 bucket holding the data payloads.
    pub bucket: String,

    /// AWS region (e.g. `"us-east-1"`).
    pub region: String,

    /// Optional endpoint URL for local development (LocalStack,
    /// DynamoDB Local, MinIO).
    pub endpoint_url: Option<String>,

    /// Prefix applied to partition keys and object keys to avoid
    /// collisions when the table or bucket is shared.
    pub key_prefix: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            table_name: String::from("fragmenta_fragments"),
            bucket: String::from("fragmenta-fragments"),
            region: String::from("us-east-1"),
            endpoint_url: None,
            key_prefix: String::from("fragmenta"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = AwsConfig::default();
        assert_eq!(cfg.table_name, "fragmenta_fragments");
        assert_eq!(cfg.bucket, "fragmenta-fragments");
        assert_eq!(cfg.region, "us-east-1");
        assert!(cfg.endpoint_url.is_none());
        assert_eq!(cfg.key_prefix, "fragmenta");
    }

    #[test]
    fn custom_values() {
        let cfg = AwsConfig {
            table_name: "my_table".into(),
            bucket: "my-bucket".into(),
            region: "eu-west-1".into(),
            endpoint_url: Some("http://localhost:4566".into()),
            key_prefix: "myapp".into(),
        };
        assert_eq!(cfg.table_name, "my_table");
        assert_eq!(cfg.bucket, "my-bucket");
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }
}
