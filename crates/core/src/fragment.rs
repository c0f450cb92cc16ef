use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content_type::ContentType;
use crate::error::FragmentError;
use crate::types::{FragmentId, OwnerId};

/// Metadata record for one stored blob.
///
/// The serialized form is the canonical shape the metadata backend
/// persists and the store reconstructs:
/// `{id, ownerId, type, size, created, updated}`. `size` always mirrors
/// the byte length of the most recently written data payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: FragmentId,
    #[serde(rename = "ownerId")]
    pub owner_id: OwnerId,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Fragment {
    /// Create a fresh fragment: generated UUID v4 id, `size` 0, and
    /// `created == updated` from a single captured timestamp.
    ///
    /// This is the only way to produce a well-formed new fragment; an
    /// invalid combination is rejected before anything is observable.
    pub fn new(owner_id: OwnerId, content_type: ContentType) -> Result<Self, FragmentError> {
        let now = Utc::now();
        let fragment = Self {
            id: FragmentId::new(Uuid::new_v4().to_string()),
            owner_id,
            content_type,
            size: 0,
            created: now,
            updated: now,
        };
        fragment.validate()?;
        Ok(fragment)
    }

    /// Check the construction invariants.
    ///
    /// The store applies this to every record reconstructed from the
    /// backend, so a corrupted record surfaces as a typed error rather
    /// than an invalid entity.
    pub fn validate(&self) -> Result<(), FragmentError> {
        if self.owner_id.as_str().is_empty() {
            return Err(FragmentError::Validation("ownerId is required".to_owned()));
        }
        if self.id.as_str().is_empty() {
            return Err(FragmentError::Validation("id is required".to_owned()));
        }
        if !self.content_type.is_supported() {
            return Err(FragmentError::UnsupportedType(
                self.content_type.to_string(),
            ));
        }
        Ok(())
    }

    /// The primary mime, parameters stripped:
    /// `text/html; charset=utf-8` -> `text/html`.
    pub fn mime_type(&self) -> &str {
        self.content_type.mime_type()
    }

    /// True when this fragment holds a `text/*` payload.
    pub fn is_text(&self) -> bool {
        self.content_type.is_text()
    }

    /// Mime types this fragment's content can be converted into.
    pub fn formats(&self) -> Vec<&'static str> {
        self.content_type.formats()
    }

    /// Reject a data rewrite whose primary mime differs from the stored
    /// one. The stored type is immutable; only the charset may vary
    /// between writes.
    pub fn ensure_same_mime(&self, incoming: &ContentType) -> Result<(), FragmentError> {
        if incoming.mime_type() == self.mime_type() {
            Ok(())
        } else {
            Err(FragmentError::Validation(format!(
                "content type {} does not match stored type {}",
                incoming.mime_type(),
                self.mime_type()
            )))
        }
    }
}
