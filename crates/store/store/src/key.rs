use serde::{Deserialize, Serialize};

use fragmenta_core::{FragmentId, OwnerId};

/// Key addressing one fragment's metadata/data pair in the backend.
///
/// Metadata and data are always partitioned by `(owner, id)`; neither
/// half exists meaningfully without the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FragmentKey {
    pub owner: OwnerId,
    pub id: FragmentId,
}

impl FragmentKey {
    /// Create a new fragment key.
    #[must_use]
    pub fn new(owner: impl Into<OwnerId>, id: impl Into<FragmentId>) -> Self {
        Self {
            owner: owner.into(),
            id: id.into(),
        }
    }

    /// Return a canonical string representation: `owner:id`.
    ///
    /// The owner key is hex and the id a UUID, so the separator cannot
    /// collide with either component.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!("{}:{}", self.owner, self.id)
    }
}

impl std::fmt::Display for FragmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
