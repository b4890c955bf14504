//! Persistence for the scorekeeper: storage backends, the typed JSON store
//! and the application root that saves after every operation.

pub mod backend;
pub mod config;
pub mod error;
pub mod keeper;
pub mod store;

pub use backend::*;
pub use config::*;
pub use error::*;
pub use keeper::*;
pub use store::*;
