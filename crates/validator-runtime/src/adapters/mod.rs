//! Adapters owned by the composition root.

mod local_keys;

pub use local_keys::LocalKeyManager;
