use crate::{GameState, Player};

/// Cards dealt to each player in a round: round 1 deals 3, round 11 deals 13.
pub fn cards_for_round(round: u8) -> u8 {
    round.saturating_add(2)
}

/// Saturates instead of wrapping, so oversized stored scores never reorder leaders.
pub fn total(scores: &[u32]) -> u32 {
    scores.iter().fold(0u32, |acc, score| acc.saturating_add(*score))
}

/// Cumulative total after each round.
pub fn running_totals(scores: &[u32]) -> Vec<u32> {
    scores
        .iter()
        .scan(0u32, |acc, score| {
            *acc = acc.saturating_add(*score);
            Some(*acc)
        })
        .collect()
}

/// Every player tied for the lowest total, in seat order. Lower is better.
pub fn leaders(players: &[Player]) -> Vec<&Player> {
    let Some(best) = players.iter().map(Player::total).min() else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|player| player.total() == best)
        .collect()
}

/// Leaders are only highlighted once at least one round has been played.
pub fn leaders_visible(game: &GameState) -> bool {
    !game.players.is_empty() && game.current_round > 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing<'a> {
    pub player: &'a Player,
    pub total: u32,
}

/// Players ordered lowest total first. Ties keep seat order.
pub fn standings(players: &[Player]) -> Vec<Standing<'_>> {
    let mut rows: Vec<Standing<'_>> = players
        .iter()
        .map(|player| Standing {
            player,
            total: player.total(),
        })
        .collect();
    rows.sort_by_key(|row| row.total);
    rows
}
