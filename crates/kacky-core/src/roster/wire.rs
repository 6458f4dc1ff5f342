//! Decoding of the backend's dashboard payload.
//!
//! ```json
//! {"servers": [{"serverNumber": "1", "maps": [{"number": 201, "author": "x", "finished": false}],
//!   "serverDifficulty": "hard", "serverJoin": "kacky1", "timeLimit": 10, "timeLeft": 342}]}
//! ```
//!
//! `timeLimit` is in minutes, `timeLeft` in seconds.

use serde::Deserialize;

use super::errors::FetchError;
use super::types::{Difficulty, MapInfo, ServerId, ServerSnapshot};

#[derive(Debug, Deserialize)]
struct WireRoster {
    #[serde(default)]
    servers: Vec<WireServer>,
}

/// `serverNumber` arrives as a string on current backends and as a bare
/// number on older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(u64),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireServer {
    server_number: WireId,
    #[serde(default)]
    maps: Vec<MapInfo>,
    #[serde(default)]
    server_difficulty: Option<String>,
    #[serde(default)]
    server_join: String,
    #[serde(default)]
    time_limit: u64,
    time_left: i64,
}

impl From<WireServer> for ServerSnapshot {
    fn from(wire: WireServer) -> Self {
        let server_id = match wire.server_number {
            WireId::Text(id) => ServerId::new(id),
            WireId::Number(n) => ServerId::new(n.to_string()),
        };

        ServerSnapshot {
            server_id,
            maps: wire.maps,
            difficulty: Difficulty::from(wire.server_difficulty.unwrap_or_default()),
            join_target: wire.server_join,
            time_limit_secs: wire.time_limit.saturating_mul(60),
            // A server that overran its slot reports a negative value
            remaining_secs: u64::try_from(wire.time_left).unwrap_or(0),
        }
    }
}

/// Decode a dashboard response body into server snapshots, in backend order.
pub fn decode_roster(body: &str) -> Result<Vec<ServerSnapshot>, FetchError> {
    let roster: WireRoster = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        message: e.to_string(),
    })?;

    Ok(roster.servers.into_iter().map(ServerSnapshot::from).collect())
}
