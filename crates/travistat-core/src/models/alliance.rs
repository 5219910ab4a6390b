use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alliance {
    /// Alliance tag, the primary identifier on the map dump.
    pub alliance: String,
    #[serde(default)]
    pub players: Option<i64>,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub villages: Option<i64>,
    #[serde(default, rename = "topRegion")]
    pub top_region: Option<String>,
}

impl Alliance {
    pub fn display_players(&self) -> String {
        match self.players {
            Some(count) => format!("{} players", count),
            None => "Unknown".to_string(),
        }
    }
}
