//! Turn and Fact domain types.
//!
//! These are the value objects that flow through the whole system:
//! the user types a line → the session loop records a `Turn` → the responder
//! replies → another `Turn` is recorded. `Fact`s are the durable statements
//! the user explicitly asked the companion to remember.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of a single remembered fact.
pub const MAX_FACT_LEN: usize = 500;

/// The role of an utterance in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The companion's reply
    Assistant,
    /// System notices
    System,
}

/// A single recorded utterance.
///
/// Immutable once written: the transcript log appends turns and never
/// mutates or deletes them. `content` is stored verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who said this
    pub role: Role,

    /// The text content, verbatim and unbounded
    pub content: String,

    /// When this turn was recorded (UTC)
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    /// Create a turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create a new assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One durably remembered statement, scoped to an assistant identity.
///
/// Append-only: there is no update or delete operation anywhere in the
/// system. A fact persists for the lifetime of the identity's data directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    /// The remembered text
    pub fact: String,

    /// When this fact was stored (UTC)
    pub timestamp: DateTime<Utc>,
}

impl Fact {
    /// Create a fact stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            fact: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Identifier for a single run of the interactive loop.
///
/// Derived from the UTC creation time. Two sessions created within the same
/// second collide; that edge case is accepted and not guarded against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStamp(pub String);

impl SessionStamp {
    /// Stamp for a session created now.
    pub fn now() -> Self {
        Self(Utc::now().format("%Y%m%dT%H%M%SZ").to_string())
    }
}

impl std::fmt::Display for SessionStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
