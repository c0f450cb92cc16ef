use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use bytes::Bytes;

use fragmenta_core::{Fragment, FragmentId, OwnerId};
use fragmenta_store::{FragmentBackend, FragmentKey, StoreError};

use crate::config::AwsConfig;
use crate::table::{build_object_key, build_pk, build_sk};

/// Durable [`FragmentBackend`] with metadata in DynamoDB and data
/// payloads in S3.
///
/// Metadata lives in a single table with composite primary key
/// (`pk = {prefix}:{owner}`, `sk = fragment:{id}`); the record is stored
/// as its canonical JSON document. Data blobs live under
/// `{prefix}/{owner}/{id}` in the bucket. The two services are the
/// "different physical stores" the backend contract allows for.
#[derive(Debug)]
pub struct AwsFragmentBackend {
    dynamo: aws_sdk_dynamodb::Client,
    s3: aws_sdk_s3::Client,
    table_name: String,
    bucket: String,
    prefix: String,
}

impl AwsFragmentBackend {
    /// Create a backend from the provided configuration.
    ///
    /// Loads AWS credentials from the standard environment chain and
    /// optionally overrides the endpoint URL for local development.
    pub async fn new(config: &AwsConfig) -> Self {
        let (dynamo, s3) = build_clients(config).await;
        Self::from_clients(dynamo, s3, config)
    }

    /// Create a backend from existing clients.
    ///
    /// Useful for sharing clients across backends or injecting
    /// pre-configured ones in tests.
    pub fn from_clients(
        dynamo: aws_sdk_dynamodb::Client,
        s3: aws_sdk_s3::Client,
        config: &AwsConfig,
    ) -> Self {
        Self {
            dynamo,
            s3,
            table_name: config.table_name.clone(),
            bucket: config.bucket.clone(),
            prefix: config.key_prefix.clone(),
        }
    }
}

#[async_trait]
impl FragmentBackend for AwsFragmentBackend {
    async fn read_metadata(&self, key: &FragmentKey) -> Result<Option<Fragment>, StoreError> {
        let result = self
            .dynamo
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(build_pk(&self.prefix, key)))
            .key("sk", AttributeValue::S(build_sk(key)))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let Some(item) = result.item() else {
            return Ok(None);
        };

        match item.get("record") {
            Some(AttributeValue::S(json)) => serde_json::from_str(json)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            _ => Err(StoreError::Serialization(
                "metadata item is missing its record document".to_owned(),
            )),
        }
    }

    async fn write_metadata(
        &self,
        key: &FragmentKey,
        fragment: &Fragment,
    ) -> Result<(), StoreError> {
        let record = serde_json::to_string(fragment)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        self.dynamo
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(build_pk(&self.prefix, key)))
            .item("sk", AttributeValue::S(build_sk(key)))
            .item("record", AttributeValue::S(record))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn read_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError> {
        let result = self
            .s3
            .get_object()
            .bucket(&self.bucket)
            .key(build_object_key(&self.prefix, key))
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    return Ok(None);
                }
                return Err(StoreError::Backend(service_err.to_string()));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Backend(format!("failed to read S3 body: {e}")))?
            .into_bytes();

        Ok(Some(data))
    }

    async fn write_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(build_object_key(&self.prefix, key))
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(())
    }

    async fn list_ids(&self, owner: &OwnerId) -> Result<Vec<FragmentId>, StoreError> {
        let pk = format!("{}:{}", self.prefix, owner);
        let sk_prefix = "fragment:";

        let mut ids = Vec::new();
        let mut exclusive_start_key = None;

        loop {
            let mut query = self
                .dynamo
                .query()
                .table_name(&self.table_name)
                .key_condition_expression("pk = :pk AND begins_with(sk, :sk_prefix)")
                .expression_attribute_values(":pk", AttributeValue::S(pk.clone()))
                .expression_attribute_values(
                    ":sk_prefix",
                    AttributeValue::S(sk_prefix.to_owned()),
                );

            if let Some(key) = exclusive_start_key {
                query = query.set_exclusive_start_key(Some(key));
            }

            let response = query
                .send()
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            for item in response.items() {
                if let Some(AttributeValue::S(sk)) = item.get("sk")
                    && let Some(id) = sk.strip_prefix(sk_prefix)
                {
                    ids.push(FragmentId::new(id));
                }
            }

            exclusive_start_key = response.last_evaluated_key().cloned();
            if exclusive_start_key.is_none() {
                break;
            }
        }

        Ok(ids)
    }

    async fn delete(&self, key: &FragmentKey) -> Result<bool, StoreError> {
        // Metadata half: `ALL_OLD` reports whether a record existed.
        let deleted = self
            .dynamo
            .delete_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(build_pk(&self.prefix, key)))
            .key("sk", AttributeValue::S(build_sk(key)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let metadata_removed = deleted.attributes().is_some_and(|attrs| !attrs.is_empty());

        // Data half: S3 deletes are silent for missing keys, so probe
        // first to report whether anything was actually removed.
        let object_key = build_object_key(&self.prefix, key);
        let data_removed = match self
            .s3
            .head_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(_) => {
                self.s3
                    .delete_object()
                    .bucket(&self.bucket)
                    .key(&object_key)
                    .send()
                    .await
                    .map_err(|e| StoreError::Backend(e.to_string()))?;
                true
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    false
                } else {
                    return Err(StoreError::Backend(service_err.to_string()));
                }
            }
        };

        Ok(metadata_removed || data_removed)
    }
}

/// Build DynamoDB and S3 clients from the provided configuration.
///
/// Uses the standard AWS SDK environment credential chain; when an
/// endpoint override is configured (local development), S3 is switched
/// to path-style addressing since local object stores rarely support
/// virtual-hosted buckets.
pub async fn build_clients(
    config: &AwsConfig,
) -> (aws_sdk_dynamodb::Client, aws_sdk_s3::Client) {
    let mut loader =
        aws_config::from_env().region(aws_config::Region::new(config.region.clone()));

    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }

    let sdk_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    (
        aws_sdk_dynamodb::Client::new(&sdk_config),
        aws_sdk_s3::Client::from_conf(s3_config),
    )
}

#[cfg(all(test, feature = "integration"))]
mod integration_tests {
    use super::*;
    use crate::config::AwsConfig;
    use crate::table::create_table;

    fn test_config() -> AwsConfig {
        AwsConfig {
            table_name: std::env::var("FRAGMENTA_TABLE")
                .unwrap_or_else(|_| "fragmenta_fragments_test".to_owned()),
            bucket: std::env::var("FRAGMENTA_BUCKET")
                .unwrap_or_else(|_| "fragmenta-fragments-test".to_owned()),
            endpoint_url: Some(
                std::env::var("AWS_ENDPOINT")
                    .unwrap_or_else(|_| "http://localhost:4566".to_owned()),
            ),
            key_prefix: format!("test-{}", uuid::Uuid::new_v4()),
            ..AwsConfig::default()
        }
    }

    async fn create_bucket(s3: &aws_sdk_s3::Client, bucket: &str) {
        // Tolerate an already-existing bucket so the setup is idempotent.
        let _ = s3.create_bucket().bucket(bucket).send().await;
    }

    #[tokio::test]
    async fn backend_conformance() {
        let config = test_config();
        let backend = AwsFragmentBackend::new(&config).await;
        create_table(&backend.dynamo, &backend.table_name)
            .await
            .expect("table creation should succeed");
        create_bucket(&backend.s3, &backend.bucket).await;
        fragmenta_store::testing::run_backend_conformance_tests(&backend)
            .await
            .expect("conformance tests should pass");
    }
}
