//! Server roster: authoritative snapshots and where they come from.

pub mod errors;
pub mod http;
pub mod source;
pub mod types;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::FetchError;
pub use http::HttpRosterSource;
pub use source::RosterSource;
pub use types::{Difficulty, MapInfo, Roster, ServerId, ServerSnapshot};
pub use wire::decode_roster;
