//! Backing key-value storage for the cache and layout components.
//!
//! Both the daily cache and the layout store are thin read-modify-write
//! wrappers over a synchronous, string-keyed, string-valued store. The store
//! is injected through the `KeyValueStore` trait so each component can be
//! tested against an in-memory fake and shipped against the durable
//! file-backed implementation.
//!
//! Implementations:
//! - `MemoryStore`: volatile, optionally capacity-limited
//! - `FileStore`: one JSON file per store, persistent across restarts

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store capacity exceeded: {attempted} bytes would pass the {limit} byte limit")]
    QuotaExceeded { limit: usize, attempted: usize },

    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous key-value store contract.
///
/// Reads are infallible: an unreadable or missing key is simply absent.
/// Writes can fail, most notably when a capacity limit would be exceeded.
pub trait KeyValueStore: Send + Sync {
    /// Look up a key. Absent keys and unreadable stores both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value under a key, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is a no-op.
    fn remove(&self, key: &str);

    /// Every key currently present, in unspecified order.
    fn keys(&self) -> Vec<String>;
}
