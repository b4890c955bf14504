use crate::{GameHistory, Player};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Saved games in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    records: Vec<GameHistory>,
}

/// Field-level update for a record. `None` leaves the field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryPatch {
    pub players: Option<Vec<Player>>,
    pub is_complete: Option<bool>,
    pub final_round: Option<u8>,
    pub title: Option<String>,
    pub note: Option<String>,
}

impl HistoryPatch {
    pub fn players(players: Vec<Player>) -> Self {
        Self {
            players: Some(players),
            ..Self::default()
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }

    pub fn with_completion(mut self, is_complete: bool, final_round: u8) -> Self {
        self.is_complete = Some(is_complete);
        self.final_round = Some(final_round);
        self
    }

    pub fn apply(&self, record: &mut GameHistory) {
        if let Some(players) = &self.players {
            record.players = players.clone();
        }
        if let Some(is_complete) = self.is_complete {
            record.is_complete = is_complete;
        }
        if let Some(final_round) = self.final_round {
            record.final_round = final_round;
        }
        if let Some(title) = &self.title {
            record.title = title.clone();
        }
        if let Some(note) = &self.note {
            record.note = note.clone();
        }
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<GameHistory>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[GameHistory] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameHistory> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, record: GameHistory) {
        self.records.push(record);
    }

    pub fn find(&self, id: &str) -> Option<&GameHistory> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn find_all<P>(&self, predicate: P) -> Vec<&GameHistory>
    where
        P: Fn(&GameHistory) -> bool,
    {
        self.records.iter().filter(|record| predicate(record)).collect()
    }

    /// Returns false when no record has `id`.
    pub fn update(&mut self, id: &str, patch: &HistoryPatch) -> bool {
        match self.records.iter_mut().find(|record| record.id == id) {
            Some(record) => {
                patch.apply(record);
                true
            }
            None => false,
        }
    }

    /// Drops every record with `id`; returns how many went.
    pub fn delete(&mut self, id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        before - self.records.len()
    }

    /// Strips the player from every snapshot; returns the number of records touched.
    pub fn remove_player_everywhere(&mut self, player_id: &str) -> usize {
        let mut touched = 0;
        for record in &mut self.records {
            let before = record.players.len();
            record.players.retain(|player| player.id != player_id);
            if record.players.len() != before {
                touched += 1;
            }
        }
        touched
    }

    /// Newest first. Records with unparseable dates go last.
    pub fn sorted_by_date_desc(&self) -> Vec<&GameHistory> {
        let mut sorted: Vec<&GameHistory> = self.records.iter().collect();
        sorted.sort_by_key(|record| Reverse(record.created_at()));
        sorted
    }

    pub fn recent(&self, limit: usize) -> Vec<&GameHistory> {
        let mut sorted = self.sorted_by_date_desc();
        sorted.truncate(limit);
        sorted
    }
}

/// Title shown in lists: the record's title, or its day when untitled.
pub fn display_title(record: &GameHistory) -> &str {
    if record.title.trim().is_empty() {
        record.day()
    } else {
        &record.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, date: &str, players: &[&str]) -> GameHistory {
        GameHistory {
            id: id.to_string(),
            date: date.to_string(),
            players: players
                .iter()
                .map(|pid| Player::new(*pid, *pid, "#3B82F6"))
                .collect(),
            final_round: 1,
            ..GameHistory::default()
        }
    }

    fn sample() -> History {
        History::from_records(vec![
            record("g1", "2026-10-17T10:00:00.000Z", &["a", "b"]),
            record("g2", "2026-10-19T09:00:00.000Z", &["c", "d"]),
            record("g3", "2026-10-18T22:00:00.000Z", &["a", "c"]),
        ])
    }

    #[test]
    fn update_merges_only_given_fields() {
        let mut history = sample();
        assert!(history.update("g1", &HistoryPatch::note("keep me")));
        let patch = HistoryPatch::players(vec![Player::new("a", "a", "#3B82F6")])
            .with_completion(true, 12);
        assert!(history.update("g1", &patch));
        let updated = history.find("g1").expect("record");
        assert_eq!(updated.players.len(), 1);
        assert!(updated.is_complete);
        assert_eq!(updated.final_round, 12);
        assert_eq!(updated.note, "keep me");
        assert_eq!(updated.date, "2026-10-17T10:00:00.000Z");
        assert!(!history.update("missing", &patch));
    }

    #[test]
    fn delete_removes_only_the_target() {
        let mut history = sample();
        assert_eq!(history.delete("g2"), 1);
        assert_eq!(history.delete("g2"), 0);
        let ids: Vec<_> = history.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g3"]);
    }

    #[test]
    fn find_all_filters_by_predicate() {
        let history = sample();
        let with_a = history.find_all(|r| r.players.iter().any(|p| p.id == "a"));
        let ids: Vec<_> = with_a.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g3"]);
    }

    #[test]
    fn remove_player_everywhere_counts_touched_records() {
        let mut history = sample();
        assert_eq!(history.remove_player_everywhere("c"), 2);
        assert!(history.iter().all(|r| r.players.iter().all(|p| p.id != "c")));
        assert_eq!(history.find("g1").expect("g1").players.len(), 2);
    }

    #[test]
    fn sorted_newest_first_with_recent_limit() {
        let mut history = sample();
        history.insert(record("broken", "not a date", &["x"]));
        let ids: Vec<_> = history
            .sorted_by_date_desc()
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["g2", "g3", "g1", "broken"]);
        let recent: Vec<_> = history.recent(2).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(recent, vec!["g2", "g3"]);
        assert_eq!(history.records()[3].id, "broken");
    }

    #[test]
    fn display_title_falls_back_to_day() {
        let mut entry = record("g1", "2026-10-17T10:00:00.000Z", &[]);
        assert_eq!(display_title(&entry), "2026-10-17");
        entry.title = "Thanksgiving".to_string();
        assert_eq!(display_title(&entry), "Thanksgiving");
    }

    #[test]
    fn serializes_as_plain_array() {
        let value = serde_json::to_value(sample()).expect("encode");
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[0]["finalRound"], 1);
    }
}
