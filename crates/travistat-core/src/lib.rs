//! Core library for the travistat client.
//!
//! travistat publishes daily statistics dumps for a Travian game world. This
//! crate holds everything the client frontends share:
//!
//! - [`store`]: the injected key-value store both persistence components
//!   sit on, with in-memory and file-backed implementations
//! - [`cache`]: the daily response cache (date-suffixed keys, implicit
//!   expiry at UTC midnight)
//! - [`layouts`]: the named dashboard layout store with its active-layout
//!   pointer
//! - [`models`]: serde types for the API entities
//! - [`api`]: the REST client and its cache-aware wrapper
//! - [`config`]: config file handling

pub mod api;
pub mod cache;
pub mod clock;
pub mod config;
pub mod layouts;
pub mod models;
pub mod store;

pub use api::{ApiClient, ApiError, CachedApi};
pub use cache::DailyCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use layouts::{DashboardLayout, LayoutStore};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
