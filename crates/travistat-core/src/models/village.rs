use serde::{Deserialize, Serialize};

/// A single occupied map square from the daily dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Village {
    pub field_id: i64,
    pub x: i64,
    pub y: i64,
    pub tribe: String,
    pub village_id: i64,
    pub village_name: String,
    pub player_id: i64,
    pub player_name: String,
    pub alliance_id: i64,
    pub alliance_tag: String,
    pub population: i64,
    pub region: String,
    pub capital: bool,
    pub city: bool,
    pub harbor: bool,
    pub victory_points: i64,
    #[serde(default)]
    pub dump_date: Option<String>,
}

impl Village {
    /// Map coordinates in the in-game `(x|y)` notation.
    pub fn coord_display(&self) -> String {
        format!("({}|{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_display() {
        let village: Village = serde_json::from_str(
            r#"{
                "field_id": 40401, "x": -13, "y": 87, "tribe": "Gaul",
                "village_id": 9, "village_name": "Gergovie",
                "player_id": 4, "player_name": "vercingetorix",
                "alliance_id": 2, "alliance_tag": "AVR",
                "population": 976, "region": "Gergovia",
                "capital": true, "city": false, "harbor": false,
                "victory_points": 400
            }"#,
        )
        .unwrap();
        assert_eq!(village.coord_display(), "(-13|87)");
        assert_eq!(village.dump_date, None);
    }
}
