use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType,
};

use fragmenta_store::FragmentKey;

/// Build the partition key (PK) from a prefix and fragment key.
///
/// Format: `{prefix}:{owner}` -- one partition per owner, so listing an
/// owner's fragments is a single-partition query.
pub fn build_pk(prefix: &str, key: &FragmentKey) -> String {
    format!("{}:{}", prefix, key.owner)
}

/// Build the sort key (SK) from a fragment key.
///
/// Format: `fragment:{id}`
pub fn build_sk(key: &FragmentKey) -> String {
    format!("fragment:{}", key.id)
}

/// Build the S3 object key for a fragment's data payload.
///
/// Format: `{prefix}/{owner}/{id}`
pub fn build_object_key(prefix: &str, key: &FragmentKey) -> String {
    format!("{}/{}/{}", prefix, key.owner, key.id)
}

/// Create the DynamoDB metadata table programmatically.
///
/// The table uses a composite primary key with `pk` (String) as the
/// partition key and `sk` (String) as the sort key, billed on demand.
/// Intended for tests and local development; production tables are
/// provisioned via Infrastructure-as-Code tooling.
///
/// # Errors
///
/// Returns an error if the `CreateTable` call fails for reasons other
/// than the table already existing.
pub async fn create_table(
    client: &Client,
    table_name: &str,
) -> Result<(), aws_sdk_dynamodb::Error> {
    let result = client
        .create_table()
        .table_name(table_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("pk")
                .key_type(KeyType::Hash)
                .build()
                .expect("valid key schema"),
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("sk")
                .key_type(KeyType::Range)
                .build()
                .expect("valid key schema"),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("pk")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .expect("valid attribute definition"),
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("sk")
                .attribute_type(ScalarAttributeType::S)
                .build()
                .expect("valid attribute definition"),
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            // Tolerate "table already exists" errors so `create_table` is idempotent.
            let service_err = err.into_service_error();
            if service_err.is_resource_in_use_exception() {
                Ok(())
            } else {
                Err(service_err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pk_format() {
        let key = FragmentKey::new("abc123", "frag-1");
        assert_eq!(build_pk("fragmenta", &key), "fragmenta:abc123");
    }

    #[test]
    fn sk_format() {
        let key = FragmentKey::new("abc123", "frag-1");
        assert_eq!(build_sk(&key), "fragment:frag-1");
    }

    #[test]
    fn object_key_format() {
        let key = FragmentKey::new("abc123", "frag-1");
        assert_eq!(build_object_key("fragmenta", &key), "fragmenta/abc123/frag-1");
    }

    #[test]
    fn pk_with_custom_prefix() {
        let key = FragmentKey::new("owner", "id");
        assert_eq!(build_pk("myapp", &key), "myapp:owner");
    }
}
