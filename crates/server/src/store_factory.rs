use std::sync::Arc;

use fragmenta_store::FragmentBackend;
use fragmenta_store_memory::MemoryFragmentBackend;

use crate::config::StorageConfig;
use crate::error::ServerError;

/// Create the configured fragment backend.
pub async fn create_backend(
    config: &StorageConfig,
) -> Result<Arc<dyn FragmentBackend>, ServerError> {
    match config.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryFragmentBackend::new())),
        #[cfg(feature = "aws")]
        "aws" => {
            let aws_config = fragmenta_store_aws::AwsConfig {
                table_name: config.aws.table_name.clone(),
                bucket: config.aws.bucket.clone(),
                region: config.aws.region.clone(),
                endpoint_url: config.aws.endpoint_url.clone(),
                key_prefix: config.aws.key_prefix.clone(),
            };
            Ok(Arc::new(
                fragmenta_store_aws::AwsFragmentBackend::new(&aws_config).await,
            ))
        }
        #[cfg(not(feature = "aws"))]
        "aws" => Err(ServerError::Config(
            "storage backend 'aws' requires building with the `aws` feature".to_owned(),
        )),
        other => Err(ServerError::Config(format!(
            "unknown storage backend '{other}' (expected 'memory' or 'aws')"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_is_the_default() {
        let backend = create_backend(&StorageConfig::default()).await;
        assert!(backend.is_ok());
    }

    #[tokio::test]
    async fn unknown_backend_is_a_config_error() {
        let config = StorageConfig {
            backend: "postgres".to_owned(),
            ..StorageConfig::default()
        };
        let err = create_backend(&config).await.unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }
}
