mod store;

pub use store::MemoryFragmentBackend;
