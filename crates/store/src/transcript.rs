//! Transcript log — one append-only JSONL file per session.
//!
//! The session loop writes both sides of every exchange here, the user line
//! always before the responder is called. Transcripts are write-only from the
//! companion's perspective; the format stays parseable line-by-line for
//! external tooling.

use ember_core::error::StoreError;
use ember_core::turn::{Role, SessionStamp, Turn};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Factory for per-session transcript files under a sessions directory.
pub struct TranscriptLog {
    sessions_dir: PathBuf,
}

impl TranscriptLog {
    /// Create a transcript log rooted at the given sessions directory.
    ///
    /// The directory is created lazily on the first append.
    pub fn new(sessions_dir: impl Into<PathBuf>) -> Self {
        Self {
            sessions_dir: sessions_dir.into(),
        }
    }

    /// Start a new session bound to a freshly stamped file.
    ///
    /// Two sessions created within the same second share a file; that
    /// collision is accepted as out of scope.
    pub fn create_session(&self) -> SessionHandle {
        let stamp = SessionStamp::now();
        let path = self.sessions_dir.join(format!("session_{stamp}.jsonl"));
        debug!(path = %path.display(), "Starting transcript session");
        SessionHandle { path }
    }
}

/// Handle to one session's transcript file.
///
/// A session is bound to exactly one file for its whole lifetime.
pub struct SessionHandle {
    path: PathBuf,
}

impl SessionHandle {
    /// The transcript file path (exists after the first append).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably record one turn.
    ///
    /// On failure the turn is not retried; the error is surfaced to the
    /// caller, which treats it as fatal for that turn only.
    pub fn append(&self, role: Role, content: &str) -> Result<(), StoreError> {
        let turn = Turn::new(role, content);
        let record = serde_json::to_string(&turn)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        crate::append_line(&self.path, &record)
    }
}
