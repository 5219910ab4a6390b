//! HTTP client for the travistat REST API.
//!
//! All data endpoints are unauthenticated GETs returning JSON. Rate limiting
//! (429) is the one transient failure the server produces under load, so the
//! generic request path retries it with bounded exponential backoff; every
//! other failure maps through `ApiError` and propagates.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::models::{Alliance, ApiEnvelope, PaginatedResponse, Player, PlayerHistory, Region, Village};

use super::ApiError;

/// Default API base, overridable through config for self-hosted mirrors.
pub const DEFAULT_BASE_URL: &str = "https://travistat.example.com/api";

/// HTTP request timeout in seconds.
/// The large village endpoints can take a few seconds server-side.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for travistat.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if a response is successful, returning `Some` for success,
    /// `None` for rate limit (should retry), or an error otherwise.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("Failed to send GET request to {}", url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    return response
                        .json()
                        .await
                        .with_context(|| format!("Failed to parse JSON response from {}", url));
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = %url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    // ===== Data Fetching Methods =====

    /// Fetch the player ranking, optionally capped at `limit` entries.
    pub async fn fetch_players(&self, limit: Option<usize>) -> Result<Vec<Player>> {
        let path = match limit {
            Some(limit) => format!("/players?limit={}", limit),
            None => "/players".to_string(),
        };
        let response: PaginatedResponse<Player> = self.get(&path).await?;
        Ok(response.data)
    }

    /// Fetch every village currently held by a player.
    pub async fn fetch_player_villages(&self, player_name: &str) -> Result<Vec<Village>> {
        let path = format!("/player/{}/villages", urlencode(player_name));
        let response: ApiEnvelope<Vec<Village>> = self.get(&path).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Fetch a player's day-by-day history series.
    pub async fn fetch_player_history(&self, player_name: &str) -> Result<Vec<PlayerHistory>> {
        let path = format!("/player/{}/history", urlencode(player_name));
        let response: ApiEnvelope<Vec<PlayerHistory>> = self.get(&path).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Fetch the alliance ranking with aggregates.
    pub async fn fetch_alliances(&self) -> Result<Vec<Alliance>> {
        let response: PaginatedResponse<Alliance> = self.get("/alliances").await?;
        Ok(response.data)
    }

    /// Fetch the bare list of alliance tags.
    pub async fn fetch_alliance_tags(&self) -> Result<Vec<Alliance>> {
        let response: PaginatedResponse<Alliance> = self.get("/alliance").await?;
        Ok(response.data)
    }

    /// Fetch every village of an alliance.
    pub async fn fetch_alliance_villages(&self, tag: &str) -> Result<Vec<Village>> {
        let path = format!("/alliance/{}/villages", urlencode(tag));
        let response: ApiEnvelope<Vec<Village>> = self.get(&path).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Fetch the region list with aggregates.
    pub async fn fetch_regions(&self) -> Result<Vec<Region>> {
        let response: PaginatedResponse<Region> = self.get("/region").await?;
        Ok(response.data)
    }

    /// Fetch every village in a region.
    pub async fn fetch_region_villages(&self, region: &str) -> Result<Vec<Village>> {
        let path = format!("/region/{}/villages", urlencode(region));
        let response: ApiEnvelope<Vec<Village>> = self.get(&path).await?;
        Ok(response.data.unwrap_or_default())
    }
}

/// Percent-encode a path segment. Player and alliance names can carry
/// spaces and non-ASCII characters.
fn urlencode(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
