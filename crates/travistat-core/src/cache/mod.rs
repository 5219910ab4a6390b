//! Daily response cache.
//!
//! Game statistics only change when the server publishes its daily dump, so
//! fetched lists are cached under a key suffixed with the current UTC date.
//! The suffix makes entries self-expiring: once the date rolls over, lookups
//! produce a different effective key and miss, with no cleanup pass needed.
//!
//! The cache is a pure optimization. Every failure on the cache path (full
//! store, malformed entry, unreadable store) degrades to a miss or a dropped
//! write and never reaches the caller.

pub mod daily;

pub use daily::DailyCache;
