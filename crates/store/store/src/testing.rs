//! Backend conformance test suite.
//!
//! Call [`run_backend_conformance_tests`] from your backend's test
//! module with a fresh backend instance.

use bytes::Bytes;

use fragmenta_core::{ContentType, Fragment, OwnerId};

use crate::backend::FragmentBackend;
use crate::error::StoreError;
use crate::key::FragmentKey;

fn test_owner(identity: &str) -> OwnerId {
    OwnerId::derive(identity)
}

fn test_fragment(owner: &OwnerId) -> Fragment {
    Fragment::new(
        owner.clone(),
        ContentType::parse("text/plain").expect("text/plain parses"),
    )
    .expect("fragment construction should succeed")
}

fn key_of(fragment: &Fragment) -> FragmentKey {
    FragmentKey::new(fragment.owner_id.clone(), fragment.id.clone())
}

/// Run the full backend conformance test suite.
///
/// # Errors
///
/// Returns an error if any conformance test fails.
pub async fn run_backend_conformance_tests(
    backend: &dyn FragmentBackend,
) -> Result<(), StoreError> {
    test_read_missing_metadata(backend).await?;
    test_metadata_roundtrip(backend).await?;
    test_metadata_overwrite(backend).await?;
    test_data_roundtrip(backend).await?;
    test_read_data_before_write(backend).await?;
    test_list_is_scoped_by_owner(backend).await?;
    test_delete_removes_both_halves(backend).await?;
    test_delete_missing_returns_false(backend).await?;
    test_delete_with_one_half_present(backend).await?;
    Ok(())
}

async fn test_read_missing_metadata(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let key = FragmentKey::new(test_owner("conformance@test"), "missing");
    let record = backend.read_metadata(&key).await?;
    assert!(record.is_none(), "read of missing metadata should be None");
    Ok(())
}

async fn test_metadata_roundtrip(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");
    let fragment = test_fragment(&owner);
    let key = key_of(&fragment);

    backend.write_metadata(&key, &fragment).await?;
    let record = backend.read_metadata(&key).await?;
    assert_eq!(
        record.as_ref(),
        Some(&fragment),
        "metadata should round-trip exactly"
    );
    Ok(())
}

async fn test_metadata_overwrite(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");
    let mut fragment = test_fragment(&owner);
    let key = key_of(&fragment);

    backend.write_metadata(&key, &fragment).await?;
    fragment.size = 42;
    backend.write_metadata(&key, &fragment).await?;

    let record = backend.read_metadata(&key).await?;
    assert_eq!(
        record.map(|f| f.size),
        Some(42),
        "rewrite should replace the record"
    );
    Ok(())
}

async fn test_data_roundtrip(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");
    let fragment = test_fragment(&owner);
    let key = key_of(&fragment);

    let payload = Bytes::from_static(b"conformance payload");
    backend.write_data(&key, payload.clone()).await?;
    let data = backend.read_data(&key).await?;
    assert_eq!(data, Some(payload), "data should round-trip byte-exact");
    Ok(())
}

async fn test_read_data_before_write(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");
    let fragment = test_fragment(&owner);
    let key = key_of(&fragment);

    backend.write_metadata(&key, &fragment).await?;
    let data = backend.read_data(&key).await?;
    assert!(
        data.is_none(),
        "metadata without a data write should read as no data"
    );
    Ok(())
}

async fn test_list_is_scoped_by_owner(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let alice = test_owner("alice-conformance@test");
    let bob = test_owner("bob-conformance@test");

    let a1 = test_fragment(&alice);
    let a2 = test_fragment(&alice);
    let b1 = test_fragment(&bob);
    for fragment in [&a1, &a2, &b1] {
        backend.write_metadata(&key_of(fragment), fragment).await?;
    }

    let mut ids = backend.list_ids(&alice).await?;
    ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    let mut expected = vec![a1.id.clone(), a2.id.clone()];
    expected.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    assert_eq!(ids, expected, "listing must contain exactly alice's ids");

    let bob_ids = backend.list_ids(&bob).await?;
    assert_eq!(bob_ids, vec![b1.id.clone()]);
    Ok(())
}

async fn test_delete_removes_both_halves(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");
    let fragment = test_fragment(&owner);
    let key = key_of(&fragment);

    backend.write_metadata(&key, &fragment).await?;
    backend.write_data(&key, Bytes::from_static(b"bye")).await?;

    let removed = backend.delete(&key).await?;
    assert!(removed, "delete should report the pair as removed");
    assert!(backend.read_metadata(&key).await?.is_none());
    assert!(backend.read_data(&key).await?.is_none());
    Ok(())
}

async fn test_delete_missing_returns_false(backend: &dyn FragmentBackend) -> Result<(), StoreError> {
    let key = FragmentKey::new(test_owner("conformance@test"), "never-written");
    let removed = backend.delete(&key).await?;
    assert!(!removed, "delete of a missing pair should report false");
    Ok(())
}

async fn test_delete_with_one_half_present(
    backend: &dyn FragmentBackend,
) -> Result<(), StoreError> {
    let owner = test_owner("conformance@test");

    // Metadata only.
    let fragment = test_fragment(&owner);
    let key = key_of(&fragment);
    backend.write_metadata(&key, &fragment).await?;
    assert!(backend.delete(&key).await?, "metadata-only delete");

    // Data only, as a crashed two-step commit could leave behind.
    let orphan = FragmentKey::new(owner, "orphan-data");
    backend.write_data(&orphan, Bytes::from_static(b"stray")).await?;
    assert!(backend.delete(&orphan).await?, "data-only delete");
    assert!(backend.read_data(&orphan).await?.is_none());
    Ok(())
}
