use async_trait::async_trait;
use bytes::Bytes;

use fragmenta_core::{Fragment, FragmentId, OwnerId};

use crate::error::StoreError;
use crate::key::FragmentKey;

/// Trait for persisting fragment metadata and data.
///
/// Metadata (small, structured records) and data (large, binary blobs)
/// may live on different physical stores; the facade only composes these
/// operations. Implementations must be `Send + Sync` and safe for
/// concurrent access.
#[async_trait]
pub trait FragmentBackend: Send + Sync + std::fmt::Debug {
    /// Read the metadata record for a key. Returns `None` when absent.
    async fn read_metadata(&self, key: &FragmentKey) -> Result<Option<Fragment>, StoreError>;

    /// Write (upsert) the metadata record for a key.
    async fn write_metadata(
        &self,
        key: &FragmentKey,
        fragment: &Fragment,
    ) -> Result<(), StoreError>;

    /// Read the data payload for a key. Returns `None` when no data has
    /// been written.
    async fn read_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError>;

    /// Write (replace) the data payload for a key.
    async fn write_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError>;

    /// List the fragment ids owned by `owner`. Order is unspecified.
    async fn list_ids(&self, owner: &OwnerId) -> Result<Vec<FragmentId>, StoreError>;

    /// Delete whichever halves of the pair exist. Returns `true` when
    /// either the metadata record or the data payload was removed.
    async fn delete(&self, key: &FragmentKey) -> Result<bool, StoreError>;
}
