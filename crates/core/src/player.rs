use crate::scoring;
use serde::{Deserialize, Serialize};

/// A seat at the table. `scores[0]` is round 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub name: String,
    pub scores: Vec<u32>,
    /// Hex value from the palette, e.g. `#3B82F6`.
    pub color: String,
}

impl Player {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scores: Vec::new(),
            color: color.into(),
        }
    }

    pub fn with_scores(mut self, scores: Vec<u32>) -> Self {
        self.scores = scores;
        self
    }

    pub fn total(&self) -> u32 {
        scoring::total(&self.scores)
    }

    pub fn rounds_played(&self) -> usize {
        self.scores.len()
    }

    /// Score for a 1-based round, if that round has been recorded.
    pub fn round_score(&self, round: u8) -> Option<u32> {
        let index = usize::from(round).checked_sub(1)?;
        self.scores.get(index).copied()
    }
}

pub fn shares_any_player(left: &[Player], right: &[Player]) -> bool {
    left.iter()
        .any(|player| right.iter().any(|other| other.id == player.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_score_is_one_based() {
        let player = Player::new("p1", "Alice", "#3B82F6").with_scores(vec![3, 0, 12]);
        assert_eq!(player.round_score(1), Some(3));
        assert_eq!(player.round_score(3), Some(12));
        assert_eq!(player.round_score(0), None);
        assert_eq!(player.round_score(4), None);
        assert_eq!(player.total(), 15);
    }

    #[test]
    fn missing_fields_default_on_decode() {
        let player: Player = serde_json::from_str(r#"{"id":"p1","name":"Bob"}"#).expect("decode");
        assert!(player.scores.is_empty());
        assert!(player.color.is_empty());
    }

    #[test]
    fn shares_any_player_matches_on_id_only() {
        let left = vec![Player::new("a", "Alice", "#3B82F6")];
        let same_name = vec![Player::new("b", "Alice", "#3B82F6")];
        let same_id = vec![Player::new("a", "Renamed", "#EF4444")];
        assert!(!shares_any_player(&left, &same_name));
        assert!(shares_any_player(&left, &same_id));
        assert!(!shares_any_player(&left, &[]));
    }
}
