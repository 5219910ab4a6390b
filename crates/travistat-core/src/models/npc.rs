//! NPC alliance filtering.
//!
//! The map dump includes the Natars, the game's non-player faction. They
//! distort rankings and charts, so list consumers filter them out.

use crate::models::{Alliance, Player};

/// Alliance tag of the game's non-player faction.
pub const NPC_ALLIANCE: &str = "Natars";

/// Case-insensitive check against the NPC alliance tag.
pub fn is_npc_alliance(tag: &str) -> bool {
    tag.trim().eq_ignore_ascii_case(NPC_ALLIANCE)
}

/// Drop the NPC alliance from an alliance list.
pub fn filter_npc_alliances(alliances: Vec<Alliance>) -> Vec<Alliance> {
    alliances
        .into_iter()
        .filter(|a| !is_npc_alliance(&a.alliance))
        .collect()
}

/// Drop players belonging to the NPC alliance from a player list.
pub fn filter_npc_players(players: Vec<Player>) -> Vec<Player> {
    players
        .into_iter()
        .filter(|p| !p.alliance.as_deref().is_some_and(is_npc_alliance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_npc_alliance() {
        assert!(is_npc_alliance("Natars"));
        assert!(is_npc_alliance("natars"));
        assert!(is_npc_alliance("  NATARS  "));
        assert!(!is_npc_alliance("AVR"));
        assert!(!is_npc_alliance(""));
    }

    #[test]
    fn test_filter_npc_players_keeps_unaffiliated() {
        let players: Vec<Player> = serde_json::from_str(
            r#"[
                {"id":1,"name":"a","alliance":"Natars","villages":1,"population":10},
                {"id":2,"name":"b","alliance":"AVR","villages":1,"population":10},
                {"id":3,"name":"c","villages":1,"population":10}
            ]"#,
        )
        .unwrap();

        let kept = filter_npc_players(players);
        let names: Vec<&str> = kept.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }
}
