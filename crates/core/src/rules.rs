/// Rounds in a full game. Round 1 deals 3 cards, round 11 deals 13.
pub const TOTAL_ROUNDS: u8 = 11;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 7;
/// Highest score a player can take in one round.
pub const MAX_SCORE: u32 = 9999;
/// Storage key holding the serialized application state.
pub const PERSIST_KEY: &str = "fiveCrownsApp";
/// Records shown under the "recent" tab of the home screen.
pub const RECENT_GAMES: usize = 5;
