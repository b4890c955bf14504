//! Scorekeeping logic for Five Crowns. Keep this crate free of IO and platform concerns.

pub mod clock;
pub mod events;
pub mod history;
pub mod ids;
pub mod names;
pub mod navigation;
pub mod palette;
pub mod player;
pub mod rng;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod setup;
pub mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::*;
pub use history::*;
pub use ids::*;
pub use navigation::*;
pub use player::Player;
pub use rng::*;
pub use rules::*;
pub use scoring::*;
pub use session::*;
pub use setup::*;
pub use state::*;
