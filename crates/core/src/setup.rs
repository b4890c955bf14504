use crate::{names, palette, IdSource, Player, SetupRng, MAX_PLAYERS, MIN_PLAYERS};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("at least 2 players are required, got {0}")]
    TooFewPlayers(usize),
    #[error("at most 7 players are allowed, got {0}")]
    TooManyPlayers(usize),
    #[error("player {0} has an empty name")]
    EmptyName(usize),
    #[error("player names must be unique: {0}")]
    DuplicateName(String),
    #[error("player colors must be unique: {0}")]
    DuplicateColor(String),
    #[error("no player slot {0}")]
    InvalidSlot(usize),
}

/// Checks a roster before it becomes a game: 2-7 players, unique non-empty
/// names (exact match), unique colors.
pub fn validate_players(players: &[Player]) -> Result<(), SetupError> {
    if players.len() < MIN_PLAYERS {
        return Err(SetupError::TooFewPlayers(players.len()));
    }
    if players.len() > MAX_PLAYERS {
        return Err(SetupError::TooManyPlayers(players.len()));
    }
    let mut names = HashSet::new();
    let mut colors = HashSet::new();
    for (index, player) in players.iter().enumerate() {
        if player.name.trim().is_empty() {
            return Err(SetupError::EmptyName(index));
        }
        if !names.insert(player.name.as_str()) {
            return Err(SetupError::DuplicateName(player.name.clone()));
        }
        if !player.color.is_empty() && !colors.insert(player.color.to_ascii_uppercase()) {
            return Err(SetupError::DuplicateColor(player.color.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupSlot {
    pub name: String,
    pub color: String,
}

/// Roster being edited on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupDraft {
    slots: Vec<SetupSlot>,
}

impl SetupDraft {
    /// Two slots with random names and distinct colors.
    pub fn new(rng: &mut SetupRng) -> Self {
        let mut draft = Self { slots: Vec::new() };
        for _ in 0..MIN_PLAYERS {
            draft.push_random_slot(rng);
        }
        draft
    }

    pub fn slots(&self) -> &[SetupSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn can_add(&self) -> bool {
        self.slots.len() < MAX_PLAYERS
    }

    pub fn can_remove(&self) -> bool {
        self.slots.len() > MIN_PLAYERS
    }

    /// Returns false once the table is full.
    pub fn add_player(&mut self, rng: &mut SetupRng) -> bool {
        if !self.can_add() {
            return false;
        }
        self.push_random_slot(rng);
        true
    }

    /// Returns false when removal would drop below the minimum.
    pub fn remove_player(&mut self, index: usize) -> bool {
        if !self.can_remove() || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }

    pub fn set_name(&mut self, index: usize, name: impl Into<String>) -> Result<(), SetupError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SetupError::InvalidSlot(index))?;
        slot.name = name.into();
        Ok(())
    }

    /// Assigns `color`; a slot already holding it receives this slot's old color.
    pub fn set_color(&mut self, index: usize, color: &str) -> Result<(), SetupError> {
        if index >= self.slots.len() {
            return Err(SetupError::InvalidSlot(index));
        }
        let holder = self
            .slots
            .iter()
            .position(|slot| slot.color.eq_ignore_ascii_case(color));
        match holder {
            Some(other) if other != index => {
                let previous = std::mem::replace(&mut self.slots[index].color, color.to_string());
                self.slots[other].color = previous;
            }
            _ => self.slots[index].color = color.to_string(),
        }
        Ok(())
    }

    /// Steps the slot's color forward or back through the palette.
    pub fn cycle_color(&mut self, index: usize, forward: bool) -> Result<(), SetupError> {
        let slot = self.slots.get(index).ok_or(SetupError::InvalidSlot(index))?;
        let len = palette::PALETTE.len();
        let current = palette::index_of(&slot.color).unwrap_or(0);
        let next = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.set_color(index, palette::PALETTE[next].value)
    }

    /// Builds the roster: names trimmed, blanks replaced with random names,
    /// fresh ids, empty score sheets.
    pub fn finish(
        &self,
        rng: &mut SetupRng,
        ids: &mut dyn IdSource,
    ) -> Result<Vec<Player>, SetupError> {
        let players: Vec<Player> = self
            .slots
            .iter()
            .map(|slot| {
                let trimmed = slot.name.trim();
                let name = if trimmed.is_empty() {
                    names::random_name(rng)
                } else {
                    trimmed.to_string()
                };
                Player::new(ids.next_id(), name, slot.color.clone())
            })
            .collect();
        validate_players(&players)?;
        Ok(players)
    }

    fn push_random_slot(&mut self, rng: &mut SetupRng) {
        let used: Vec<String> = self.slots.iter().map(|slot| slot.color.clone()).collect();
        let color = palette::random_unique_colors(1, &used, rng)
            .pop()
            .unwrap_or_default();
        let name = (0..16)
            .map(|_| names::random_name(rng))
            .find(|name| self.slots.iter().all(|slot| &slot.name != name))
            .unwrap_or_else(|| format!("Player {}", self.slots.len() + 1));
        self.slots.push(SetupSlot { name, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SequentialIds;

    fn roster(names: &[&str]) -> Vec<Player> {
        names
            .iter()
            .enumerate()
            .map(|(idx, name)| Player::new(format!("p{idx}"), *name, palette::PALETTE[idx].value))
            .collect()
    }

    #[test]
    fn validate_accepts_two_to_seven() {
        assert_eq!(
            validate_players(&roster(&["Alice"])),
            Err(SetupError::TooFewPlayers(1))
        );
        assert!(validate_players(&roster(&["Alice", "Bob"])).is_ok());
        assert!(validate_players(&roster(&["a", "b", "c", "d", "e", "f", "g"])).is_ok());
        assert_eq!(
            validate_players(&roster(&["a", "b", "c", "d", "e", "f", "g", "h"])),
            Err(SetupError::TooManyPlayers(8))
        );
    }

    #[test]
    fn validate_rejects_exact_duplicate_names_only() {
        assert_eq!(
            validate_players(&roster(&["Alice", "Alice"])),
            Err(SetupError::DuplicateName("Alice".to_string()))
        );
        assert!(validate_players(&roster(&["Alice", "alice"])).is_ok());
        assert_eq!(
            validate_players(&roster(&["Alice", "  "])),
            Err(SetupError::EmptyName(1))
        );
    }

    #[test]
    fn validate_rejects_shared_colors() {
        let mut players = roster(&["Alice", "Bob"]);
        players[1].color = players[0].color.to_ascii_lowercase();
        assert!(matches!(
            validate_players(&players),
            Err(SetupError::DuplicateColor(_))
        ));
    }

    #[test]
    fn draft_starts_with_two_distinct_colors() {
        let mut rng = SetupRng::from_seed(5);
        let draft = SetupDraft::new(&mut rng);
        assert_eq!(draft.len(), 2);
        assert_ne!(draft.slots()[0].color, draft.slots()[1].color);
        assert!(draft.slots().iter().all(|slot| !slot.name.is_empty()));
    }

    #[test]
    fn draft_add_and_remove_respect_bounds() {
        let mut rng = SetupRng::from_seed(9);
        let mut draft = SetupDraft::new(&mut rng);
        assert!(!draft.remove_player(0));
        while draft.add_player(&mut rng) {}
        assert_eq!(draft.len(), MAX_PLAYERS);
        let colors: HashSet<_> = draft.slots().iter().map(|slot| slot.color.clone()).collect();
        assert_eq!(colors.len(), MAX_PLAYERS);
        assert!(draft.remove_player(3));
        assert_eq!(draft.len(), MAX_PLAYERS - 1);
    }

    #[test]
    fn set_color_swaps_with_holder() {
        let mut rng = SetupRng::from_seed(2);
        let mut draft = SetupDraft::new(&mut rng);
        let first = draft.slots()[0].color.clone();
        let second = draft.slots()[1].color.clone();
        draft.set_color(0, &second).expect("slot");
        assert_eq!(draft.slots()[0].color, second);
        assert_eq!(draft.slots()[1].color, first);
        assert_eq!(draft.set_color(5, &first), Err(SetupError::InvalidSlot(5)));
    }

    #[test]
    fn cycle_color_never_duplicates() {
        let mut rng = SetupRng::from_seed(4);
        let mut draft = SetupDraft::new(&mut rng);
        for _ in 0..palette::PALETTE.len() {
            draft.cycle_color(0, true).expect("slot");
            assert_ne!(draft.slots()[0].color, draft.slots()[1].color);
        }
    }

    #[test]
    fn finish_trims_and_fills_blank_names() {
        let mut rng = SetupRng::from_seed(8);
        let mut draft = SetupDraft::new(&mut rng);
        draft.set_name(0, "  Alice ").expect("slot");
        draft.set_name(1, "").expect("slot");
        let mut ids = SequentialIds::new("p");
        let players = draft.finish(&mut rng, &mut ids).expect("finish");
        assert_eq!(players[0].name, "Alice");
        assert!(!players[1].name.is_empty());
        assert_eq!(players[0].id, "p-1");
        assert_eq!(players[1].id, "p-2");
        assert!(players.iter().all(|player| player.scores.is_empty()));
    }

    #[test]
    fn finish_rejects_duplicate_names() {
        let mut rng = SetupRng::from_seed(8);
        let mut draft = SetupDraft::new(&mut rng);
        draft.set_name(0, "Bob").expect("slot");
        draft.set_name(1, "Bob ").expect("slot");
        let mut ids = SequentialIds::new("p");
        assert_eq!(
            draft.finish(&mut rng, &mut ids),
            Err(SetupError::DuplicateName("Bob".to_string()))
        );
    }
}
