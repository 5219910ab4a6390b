//! Data models for travistat API entities.
//!
//! These mirror the JSON the statistics backend serves from its daily map
//! dump:
//!
//! - `Player`, `PlayerHistory`: per-player totals and their day-by-day series
//! - `Alliance`: alliance aggregates
//! - `Region`: per-region aggregates
//! - `Village`: a single map square
//! - `PaginatedResponse`, `ApiEnvelope`: response wrappers

pub mod alliance;
pub mod npc;
pub mod player;
pub mod region;
pub mod response;
pub mod village;

pub use alliance::Alliance;
pub use npc::{filter_npc_alliances, filter_npc_players, is_npc_alliance, NPC_ALLIANCE};
pub use player::{Player, PlayerHistory};
pub use region::Region;
pub use response::{ApiEnvelope, PaginatedResponse, Pagination};
pub use village::Village;
