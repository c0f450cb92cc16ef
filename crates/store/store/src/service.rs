use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;

use fragmenta_core::{ContentType, Fragment, FragmentId, OwnerId};

use crate::backend::FragmentBackend;
use crate::error::StoreError;
use crate::key::FragmentKey;

/// Result of a listing: bare ids, or fully materialized records when
/// expansion was requested. The two modes never blur.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FragmentListing {
    Ids(Vec<FragmentId>),
    Expanded(Vec<Fragment>),
}

impl FragmentListing {
    /// Number of entries in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Expanded(fragments) => fragments.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fragment-level operations composed over a pluggable backend.
///
/// The facade adds no locking of its own: concurrent writers to the same
/// `(owner, id)` race at the backend and last write wins, for metadata
/// and data independently.
#[derive(Clone)]
pub struct FragmentStore {
    backend: Arc<dyn FragmentBackend>,
}

impl FragmentStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn FragmentBackend>) -> Self {
        Self { backend }
    }

    /// Create and persist a fresh metadata record (size 0, no data yet).
    pub async fn create(
        &self,
        owner: OwnerId,
        content_type: ContentType,
    ) -> Result<Fragment, StoreError> {
        let fragment = Fragment::new(owner, content_type)?;
        self.backend
            .write_metadata(&Self::key_of(&fragment), &fragment)
            .await?;
        Ok(fragment)
    }

    /// Persist the current in-memory metadata, refreshing `updated`
    /// first. Idempotent; does not touch the data store.
    pub async fn save(&self, fragment: &mut Fragment) -> Result<(), StoreError> {
        fragment.updated = Utc::now();
        self.backend
            .write_metadata(&Self::key_of(fragment), fragment)
            .await
    }

    /// Replace the data payload and bring the metadata in line with it.
    ///
    /// The data write happens first; the record and its persisted
    /// metadata are only touched once the bytes are safely stored, so a
    /// failed data write leaves nothing mutated and the metadata never
    /// claims a size for data that was not persisted. A crash between
    /// the two writes is tolerated: this is a best-effort two-step
    /// commit, not a transaction.
    pub async fn set_data(&self, fragment: &mut Fragment, data: Bytes) -> Result<(), StoreError> {
        let size = u64::try_from(data.len()).unwrap_or(u64::MAX);
        self.backend.write_data(&Self::key_of(fragment), data).await?;
        fragment.size = size;
        self.save(fragment).await
    }

    /// [`set_data`](Self::set_data) guarded by the stored type: the
    /// incoming primary mime must match the stored one, checked before
    /// any mutation.
    pub async fn replace_data(
        &self,
        fragment: &mut Fragment,
        incoming: &ContentType,
        data: Bytes,
    ) -> Result<(), StoreError> {
        fragment.ensure_same_mime(incoming)?;
        self.set_data(fragment, data).await
    }

    /// Fetch the data payload for a fragment. Not-found when the data
    /// was never written or the pair no longer exists.
    pub async fn get_data(&self, fragment: &Fragment) -> Result<Bytes, StoreError> {
        let key = Self::key_of(fragment);
        self.backend
            .read_data(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.canonical()))
    }

    /// Fetch one fragment by owner and id, re-validating the stored
    /// record so corruption surfaces as a typed error.
    pub async fn by_id(&self, owner: &OwnerId, id: &FragmentId) -> Result<Fragment, StoreError> {
        let key = FragmentKey::new(owner.clone(), id.clone());
        let record = self
            .backend
            .read_metadata(&key)
            .await?
            .ok_or_else(|| StoreError::NotFound(key.canonical()))?;
        record.validate()?;
        Ok(record)
    }

    /// List the owner's fragments: bare ids, or re-validated records
    /// when `expand` is set. Always a (possibly empty) listing for an
    /// owner with no fragments.
    pub async fn by_user(
        &self,
        owner: &OwnerId,
        expand: bool,
    ) -> Result<FragmentListing, StoreError> {
        let ids = self.backend.list_ids(owner).await?;
        if !expand {
            return Ok(FragmentListing::Ids(ids));
        }

        let mut fragments = Vec::with_capacity(ids.len());
        for id in ids {
            let key = FragmentKey::new(owner.clone(), id);
            // An id can vanish between the listing and the read when a
            // delete races the expansion; skip it rather than failing
            // the whole listing.
            if let Some(record) = self.backend.read_metadata(&key).await? {
                record.validate()?;
                fragments.push(record);
            }
        }
        Ok(FragmentListing::Expanded(fragments))
    }

    /// Remove the metadata and data for a fragment, whichever halves
    /// exist. Deleting a fragment that does not exist at all is
    /// not-found.
    pub async fn delete(&self, owner: &OwnerId, id: &FragmentId) -> Result<(), StoreError> {
        let key = FragmentKey::new(owner.clone(), id.clone());
        if self.backend.delete(&key).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound(key.canonical()))
        }
    }

    fn key_of(fragment: &Fragment) -> FragmentKey {
        FragmentKey::new(fragment.owner_id.clone(), fragment.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_serializes_transparently() {
        let ids = FragmentListing::Ids(vec![FragmentId::new("a"), FragmentId::new("b")]);
        let json = serde_json::to_value(&ids).unwrap();
        assert_eq!(json, serde_json::json!(["a", "b"]));
    }
}
