use chrono::{DateTime, Utc};
use serde::Serialize;

use super::reconciler::Reconciler;
use crate::poller::PollState;
use crate::roster::{Difficulty, MapInfo, Roster, ServerId};

/// One server as the presentation layer renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerView {
    pub server_id: ServerId,
    pub maps: Vec<MapInfo>,
    pub difficulty: Difficulty,
    pub join_target: String,
    pub time_limit_secs: u64,
    pub display_seconds: u64,
    pub is_loading: bool,
    pub is_success: bool,
}

impl ServerView {
    pub fn current_map(&self) -> Option<&MapInfo> {
        self.maps.first()
    }

    /// Countdown formatted for display.
    pub fn countdown(&self) -> String {
        format_countdown(self.display_seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    /// No snapshot has arrived yet.
    Loading,
    Live,
    /// The last fetch failed; the previous snapshot is still shown.
    Stale,
}

impl FrameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameStatus::Loading => "loading",
            FrameStatus::Live => "live",
            FrameStatus::Stale => "stale",
        }
    }
}

/// Everything needed to render the roster at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub servers: Vec<ServerView>,
    pub is_loading: bool,
    pub is_success: bool,
    /// Reconciler revision this frame was built from.
    pub revision: u64,
    pub fetched_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            is_loading: true,
            is_success: false,
            revision: 0,
            fetched_at: None,
            last_error: None,
        }
    }
}

impl Frame {
    /// Build a frame from the reconciler and the poll state it was seeded from.
    pub fn build(reconciler: &Reconciler, state: &PollState) -> Self {
        compose(
            reconciler,
            state.roster.as_deref(),
            state.is_loading,
            state.is_success,
            state.last_error.as_ref().map(|e| e.to_string()),
        )
    }

    /// Frame for a single fetched roster, seeded but never ticked.
    pub fn from_roster(roster: &Roster, fixed_offset: u64) -> Self {
        let mut reconciler = Reconciler::new(fixed_offset);
        reconciler.on_snapshot(&roster.servers);
        compose(&reconciler, Some(roster), false, true, None)
    }

    pub fn status(&self) -> FrameStatus {
        if self.fetched_at.is_none() {
            FrameStatus::Loading
        } else if self.is_success {
            FrameStatus::Live
        } else {
            FrameStatus::Stale
        }
    }
}

fn compose(
    reconciler: &Reconciler,
    roster: Option<&Roster>,
    is_loading: bool,
    is_success: bool,
    last_error: Option<String>,
) -> Frame {
    let servers = roster
        .map(|roster| {
            roster
                .servers
                .iter()
                .enumerate()
                .map(|(index, server)| ServerView {
                    server_id: server.server_id.clone(),
                    maps: server.maps.clone(),
                    difficulty: server.difficulty.clone(),
                    join_target: server.join_target.clone(),
                    time_limit_secs: server.time_limit_secs,
                    display_seconds: reconciler
                        .read_for(index, &server.server_id)
                        .unwrap_or(0),
                    is_loading,
                    is_success,
                })
                .collect()
        })
        .unwrap_or_default();

    Frame {
        servers,
        is_loading,
        is_success,
        revision: reconciler.revision(),
        fetched_at: roster.map(|roster| roster.fetched_at),
        last_error,
    }
}

/// Servers sharing one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyGroup<'a> {
    pub difficulty: &'a Difficulty,
    pub servers: Vec<&'a ServerView>,
}

/// Group servers by tier, tiers in order of first appearance.
pub fn group_by_difficulty(servers: &[ServerView]) -> Vec<DifficultyGroup<'_>> {
    let mut groups: Vec<DifficultyGroup<'_>> = Vec::new();
    for server in servers {
        match groups
            .iter_mut()
            .find(|group| *group.difficulty == server.difficulty)
        {
            Some(group) => group.servers.push(server),
            None => groups.push(DifficultyGroup {
                difficulty: &server.difficulty,
                servers: vec![server],
            }),
        }
    }
    groups
}

/// `M:SS` below an hour, `H:MM:SS` from an hour up.
pub fn format_countdown(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
