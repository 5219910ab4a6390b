use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub region: String,
    #[serde(default)]
    pub villages: Option<i64>,
    #[serde(default)]
    pub population: Option<i64>,
}
