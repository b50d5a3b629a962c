//! In-memory caches for the topic directory and the active-topic roster.

pub mod directory;
pub mod roster;

pub use directory::DirectoryCache;
pub use roster::RosterCache;
