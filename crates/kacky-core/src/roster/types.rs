use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable server identifier, unique within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A map in a server's rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapInfo {
    pub number: u32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub finished: bool,
}

/// Difficulty tier a server belongs to.
///
/// Only used for grouping and badges; the countdown engine ignores it.
/// Tiers the backend introduces later are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    /// No tier assigned (early event phases).
    Unrated,
    White,
    Green,
    Blue,
    Red,
    Black,
    Hard,
    Harder,
    Hardest,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Unrated => "",
            Difficulty::White => "white",
            Difficulty::Green => "green",
            Difficulty::Blue => "blue",
            Difficulty::Red => "red",
            Difficulty::Black => "black",
            Difficulty::Hard => "hard",
            Difficulty::Harder => "harder",
            Difficulty::Hardest => "hardest",
            Difficulty::Other(raw) => raw,
        }
    }

    /// Label shown on tier badges and group headers.
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Unrated => "Phase 1",
            Difficulty::White => "White",
            Difficulty::Green => "Green",
            Difficulty::Blue => "Blue",
            Difficulty::Red => "Red",
            Difficulty::Black => "Black",
            Difficulty::Hard => "Hard",
            Difficulty::Harder => "Harder",
            Difficulty::Hardest => "Hardest",
            Difficulty::Other(raw) => raw,
        }
    }

    /// Badge colour name for the tier.
    pub fn badge_color(&self) -> &'static str {
        match self {
            Difficulty::White => "white",
            Difficulty::Green => "green",
            Difficulty::Blue => "blue",
            Difficulty::Red | Difficulty::Harder => "red",
            Difficulty::Black => "black",
            Difficulty::Hard => "orange",
            Difficulty::Hardest => "purple",
            Difficulty::Unrated | Difficulty::Other(_) => "gray",
        }
    }
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" => Difficulty::Unrated,
            "white" => Difficulty::White,
            "green" => Difficulty::Green,
            "blue" => Difficulty::Blue,
            "red" => Difficulty::Red,
            "black" => Difficulty::Black,
            "hard" => Difficulty::Hard,
            "harder" => Difficulty::Harder,
            "hardest" => Difficulty::Hardest,
            _ => Difficulty::Other(raw),
        }
    }
}

impl From<Difficulty> for String {
    fn from(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Other(raw) => raw,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authoritative state of one server at the instant the roster was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSnapshot {
    pub server_id: ServerId,
    /// Current map first, followed by the upcoming rotation.
    pub maps: Vec<MapInfo>,
    pub difficulty: Difficulty,
    pub join_target: String,
    pub time_limit_secs: u64,
    pub remaining_secs: u64,
}

impl ServerSnapshot {
    /// The map currently being played, if the rotation is known.
    pub fn current_map(&self) -> Option<&MapInfo> {
        self.maps.first()
    }

    /// Maps queued after the current one.
    pub fn upcoming_maps(&self) -> &[MapInfo] {
        self.maps.get(1..).unwrap_or(&[])
    }
}

/// One successful roster fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roster {
    pub servers: Vec<ServerSnapshot>,
    pub fetched_at: DateTime<Utc>,
}

impl Roster {
    pub fn new(servers: Vec<ServerSnapshot>) -> Self {
        Self {
            servers,
            fetched_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
