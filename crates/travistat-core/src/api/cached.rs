//! Cache-aware wrapper over the API client.
//!
//! List endpoints return data that only changes with the daily dump, so they
//! route through the daily cache under stable base keys. Detail endpoints
//! (villages, history) are cheap and always fetched live.

use std::sync::Arc;

use anyhow::Result;

use crate::cache::DailyCache;
use crate::models::{Alliance, Player, PlayerHistory, Region, Village};

use super::ApiClient;

/// Cache base key for the player ranking.
pub const PLAYERS_LIST_KEY: &str = "players:list";

/// Cache base key for the alliance ranking.
pub const ALLIANCES_LIST_KEY: &str = "alliances:list";

/// Cache base key for the alliance tag list.
pub const ALLIANCE_TAGS_KEY: &str = "alliances:tags";

/// Cache base key for the region list.
pub const REGIONS_LIST_KEY: &str = "regions:list";

pub struct CachedApi {
    client: ApiClient,
    cache: Arc<DailyCache>,
}

impl CachedApi {
    pub fn new(client: ApiClient, cache: Arc<DailyCache>) -> Self {
        Self { client, cache }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Player ranking for the current day, cached.
    pub async fn players(&self, limit: Option<usize>, force_refresh: bool) -> Result<Vec<Player>> {
        self.cache
            .fetch_with_cache(PLAYERS_LIST_KEY, force_refresh, || {
                self.client.fetch_players(limit)
            })
            .await
    }

    /// Alliance ranking for the current day, cached.
    pub async fn alliances(&self, force_refresh: bool) -> Result<Vec<Alliance>> {
        self.cache
            .fetch_with_cache(ALLIANCES_LIST_KEY, force_refresh, || {
                self.client.fetch_alliances()
            })
            .await
    }

    /// Alliance tags for the current day, cached.
    pub async fn alliance_tags(&self, force_refresh: bool) -> Result<Vec<Alliance>> {
        self.cache
            .fetch_with_cache(ALLIANCE_TAGS_KEY, force_refresh, || {
                self.client.fetch_alliance_tags()
            })
            .await
    }

    /// Region list for the current day, cached.
    pub async fn regions(&self, force_refresh: bool) -> Result<Vec<Region>> {
        self.cache
            .fetch_with_cache(REGIONS_LIST_KEY, force_refresh, || {
                self.client.fetch_regions()
            })
            .await
    }

    /// Villages of a single player. Always live.
    pub async fn player_villages(&self, player_name: &str) -> Result<Vec<Village>> {
        self.client.fetch_player_villages(player_name).await
    }

    /// History series of a single player. Always live.
    pub async fn player_history(&self, player_name: &str) -> Result<Vec<PlayerHistory>> {
        self.client.fetch_player_history(player_name).await
    }

    /// Villages of a single alliance. Always live.
    pub async fn alliance_villages(&self, tag: &str) -> Result<Vec<Village>> {
        self.client.fetch_alliance_villages(tag).await
    }

    /// Villages of a single region. Always live.
    pub async fn region_villages(&self, region: &str) -> Result<Vec<Village>> {
        self.client.fetch_region_villages(region).await
    }

    /// Drop every cached day of every list endpoint.
    pub fn invalidate_all(&self) {
        for base in [
            PLAYERS_LIST_KEY,
            ALLIANCES_LIST_KEY,
            ALLIANCE_TAGS_KEY,
            REGIONS_LIST_KEY,
        ] {
            self.cache.clear_all_for_base(base);
        }
    }
}
