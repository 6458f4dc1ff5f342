//! Read-only session and event context.
//!
//! Built once at the composition root and handed to whatever needs it
//! (the poller needs the credential, renderers need the event). Nothing
//! looks this up ambiently, so tests can substitute their own context.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Credential used to authenticate roster requests.
///
/// Also serves as the single-flight key for the poller: two fetches with
/// the same credential are never in flight at once.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Credential {
    token: Option<String>,
}

impl Credential {
    /// Credential for the public roster (no `Authorization` header).
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    /// Bearer credential. Blank tokens are treated as anonymous.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            Self::anonymous()
        } else {
            Self {
                token: Some(token.to_string()),
            }
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.token.is_none()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(_) => f.write_str("Credential(Bearer <redacted>)"),
            None => f.write_str("Credential(Anonymous)"),
        }
    }
}

/// The event the roster belongs to (e.g. Kackiest Kacky 9).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EventInfo {
    /// Event status as reported by the backend (e.g. "active", "finished").
    #[serde(default)]
    pub status: String,

    /// Event type short code: "kk" (Kackiest Kacky) or "kr" (Kacky Reloaded).
    #[serde(default, rename = "type")]
    pub kind: String,

    /// Edition number of the event.
    #[serde(default)]
    pub edition: u32,
}

impl EventInfo {
    /// Human-readable title, e.g. "Kackiest Kacky 9".
    pub fn title(&self) -> String {
        let name = match self.kind.to_ascii_lowercase().as_str() {
            "kk" => "Kackiest Kacky",
            "kr" => "Kacky Reloaded",
            "" => "Kacky",
            _ => self.kind.as_str(),
        };

        if self.edition == 0 {
            name.to_string()
        } else {
            format!("{} {}", name, self.edition)
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Capability bundle passed down from the composition root.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    credential: Credential,
    event: EventInfo,
}

impl SessionContext {
    pub fn new(credential: Credential, event: EventInfo) -> Self {
        Self { credential, event }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn event(&self) -> &EventInfo {
        &self.event
    }
}
