use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub alliance: Option<String>,
    pub villages: i64,
    pub population: i64,
    #[serde(default)]
    pub tribe: Option<String>,
    #[serde(default, alias = "tribeId")]
    pub tribe_id: Option<i64>,
}

impl Player {
    pub fn display_alliance(&self) -> String {
        self.alliance.clone().unwrap_or_else(|| "-".to_string())
    }
}

/// One point of a player's day-by-day history series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerHistory {
    pub dump_date: String,
    pub villages: i64,
    pub population: i64,
    pub victory_points: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_parses_both_tribe_id_spellings() {
        let snake: Player =
            serde_json::from_str(r#"{"id":1,"name":"a","villages":2,"population":90,"tribe_id":3}"#)
                .unwrap();
        assert_eq!(snake.tribe_id, Some(3));

        let camel: Player =
            serde_json::from_str(r#"{"id":1,"name":"a","villages":2,"population":90,"tribeId":3}"#)
                .unwrap();
        assert_eq!(camel.tribe_id, Some(3));
    }

    #[test]
    fn test_display_alliance_falls_back() {
        let player: Player =
            serde_json::from_str(r#"{"id":1,"name":"a","villages":2,"population":90}"#).unwrap();
        assert_eq!(player.display_alliance(), "-");
    }
}
