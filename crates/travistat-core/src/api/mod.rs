//! REST client for the travistat statistics backend.
//!
//! `ApiClient` speaks to the public JSON API (player, alliance, and region
//! data from the daily map dump). `CachedApi` layers the daily cache over
//! the list endpoints so each day's rankings are fetched at most once.

pub mod cached;
pub mod client;
pub mod error;

pub use cached::CachedApi;
pub use client::ApiClient;
pub use error::ApiError;
