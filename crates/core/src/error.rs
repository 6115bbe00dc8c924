//! Error types for the ember domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all ember operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Store errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Responder errors ---
    #[error("Responder error: {0}")]
    Responder(#[from] ResponderError),

    // --- Search errors ---
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures while appending to or reading the append-only logs.
///
/// Fatal for the turn in which they occur, never for the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Record serialization failed: {0}")]
    Serialization(String),
}

/// Failures of the external reasoning responder.
///
/// Never fatal to the process: each variant is rendered as a one-line
/// inline error and the session loop continues.
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    #[error("responder executable not found: {0}")]
    NotFound(String),

    #[error("failed to launch responder: {0}")]
    Spawn(String),

    #[error("responder exited with code {code}: {detail}")]
    NonZeroExit { code: i32, detail: String },

    #[error("responder timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("responder produced unparsable output: {0}")]
    MalformedOutput(String),

    #[error("no assistant content found in responder output")]
    NoAssistantContent,
}

/// Failures of the web search collaborator.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("missing search credential: {0}")]
    MissingCredential(String),

    #[error("search transport error{http}: {reason}", http = .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Transport { status: Option<u16>, reason: String },
}
