//! Named dashboard layout persistence.
//!
//! Users save arrangements of dashboard widgets under a name, switch between
//! them, and delete them. Layouts live in the backing store as one JSON
//! array; the id of the currently active layout is tracked under a separate
//! key. Unlike the daily cache, persistence failures here are surfaced to
//! the caller: losing a saved layout silently is not acceptable.

pub mod store;

pub use store::{DashboardLayout, LayoutStore};
