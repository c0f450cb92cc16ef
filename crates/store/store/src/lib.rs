pub mod backend;
pub mod error;
pub mod key;
pub mod service;
pub mod testing;

pub use backend::FragmentBackend;
pub use error::StoreError;
pub use key::FragmentKey;
pub use service::{FragmentListing, FragmentStore};
