use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use fragmenta_core::{Fragment, FragmentId, OwnerId};
use fragmenta_store::{FragmentBackend, FragmentKey, StoreError};

/// In-memory [`FragmentBackend`] backed by a pair of [`DashMap`]s, one
/// for metadata records and one for data payloads.
///
/// Suited to tests and local development; contents do not survive the
/// process. The two maps stand in for the separate physical stores a
/// durable backend would use.
#[derive(Debug, Default)]
pub struct MemoryFragmentBackend {
    metadata: DashMap<String, Fragment>,
    data: DashMap<String, Bytes>,
}

impl MemoryFragmentBackend {
    /// Create a new, empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a [`FragmentKey`] into the string used as the map key.
    fn render_key(key: &FragmentKey) -> String {
        key.canonical()
    }
}

#[async_trait]
impl FragmentBackend for MemoryFragmentBackend {
    async fn read_metadata(&self, key: &FragmentKey) -> Result<Option<Fragment>, StoreError> {
        let rendered = Self::render_key(key);
        Ok(self.metadata.get(&rendered).map(|entry| entry.value().clone()))
    }

    async fn write_metadata(
        &self,
        key: &FragmentKey,
        fragment: &Fragment,
    ) -> Result<(), StoreError> {
        self.metadata.insert(Self::render_key(key), fragment.clone());
        Ok(())
    }

    async fn read_data(&self, key: &FragmentKey) -> Result<Option<Bytes>, StoreError> {
        let rendered = Self::render_key(key);
        Ok(self.data.get(&rendered).map(|entry| entry.value().clone()))
    }

    async fn write_data(&self, key: &FragmentKey, data: Bytes) -> Result<(), StoreError> {
        self.data.insert(Self::render_key(key), data);
        Ok(())
    }

    async fn list_ids(&self, owner: &OwnerId) -> Result<Vec<FragmentId>, StoreError> {
        Ok(self
            .metadata
            .iter()
            .filter(|entry| entry.value().owner_id == *owner)
            .map(|entry| entry.value().id.clone())
            .collect())
    }

    async fn delete(&self, key: &FragmentKey) -> Result<bool, StoreError> {
        let rendered = Self::render_key(key);
        let metadata_removed = self.metadata.remove(&rendered).is_some();
        let data_removed = self.data.remove(&rendered).is_some();
        Ok(metadata_removed || data_removed)
    }
}

#[cfg(test)]
mod tests {
    use fragmenta_core::ContentType;
    use fragmenta_store::testing::run_backend_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let backend = MemoryFragmentBackend::new();
        run_backend_conformance_tests(&backend)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn list_for_unknown_owner_is_empty() {
        let backend = MemoryFragmentBackend::new();
        let ids = backend
            .list_ids(&OwnerId::derive("nobody@example.com"))
            .await
            .unwrap();
        assert!(ids.is_empty());
    }

    #[tokio::test]
    async fn data_is_keyed_per_fragment() {
        let backend = MemoryFragmentBackend::new();
        let owner = OwnerId::derive("user1@email.com");
        let a = Fragment::new(owner.clone(), ContentType::parse("text/plain").unwrap()).unwrap();
        let b = Fragment::new(owner.clone(), ContentType::parse("text/plain").unwrap()).unwrap();

        let key_a = FragmentKey::new(owner.clone(), a.id.clone());
        let key_b = FragmentKey::new(owner.clone(), b.id.clone());
        backend.write_data(&key_a, Bytes::from_static(b"aa")).await.unwrap();
        backend.write_data(&key_b, Bytes::from_static(b"bb")).await.unwrap();

        assert_eq!(
            backend.read_data(&key_a).await.unwrap(),
            Some(Bytes::from_static(b"aa"))
        );
        assert_eq!(
            backend.read_data(&key_b).await.unwrap(),
            Some(Bytes::from_static(b"bb"))
        );
    }
}
