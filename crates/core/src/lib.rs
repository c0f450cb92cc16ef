pub mod content_type;
pub mod error;
pub mod fragment;
pub mod owner;
pub mod types;

pub use content_type::{ContentType, SUPPORTED_TYPES, is_supported_type};
pub use error::FragmentError;
pub use fragment::Fragment;
pub use owner::{Principal, resolve_owner};
pub use types::{FragmentId, OwnerId};
