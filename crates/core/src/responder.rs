//! Responder trait — the abstraction over the external reasoning collaborator.
//!
//! A Responder accepts an assembled prompt plus optional provider, model, and
//! system-prompt parameters and returns free text, or fails with a structured
//! reason. Implementations may shell out to a local executable, call a local
//! service, or call a remote API — the session loop must not assume which.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ResponderError;

/// A single request to the reasoning collaborator.
#[derive(Debug, Clone)]
pub struct ResponderRequest {
    /// The fully assembled prompt text
    pub prompt: String,

    /// Provider id to pass through (absent = responder default)
    pub provider: Option<String>,

    /// Model id to pass through (absent = responder default)
    pub model: Option<String>,

    /// System prompt to pass through (absent = responder default)
    pub system_prompt: Option<String>,

    /// Hard deadline for the call
    pub timeout: Duration,
}

impl ResponderRequest {
    /// Build a request with responder defaults for everything but the prompt.
    pub fn new(prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            prompt: prompt.into(),
            provider: None,
            model: None,
            system_prompt: None,
            timeout,
        }
    }
}

/// The reasoning collaborator.
///
/// The call is blocking from the session loop's perspective: one request in
/// flight at a time, bounded by `request.timeout`. On timeout the call fails
/// cleanly rather than hanging or silently retrying.
#[async_trait]
pub trait Responder: Send + Sync {
    /// A human-readable name for this responder (e.g., "goose").
    fn name(&self) -> &str;

    /// Send a prompt and wait for the reply text.
    async fn respond(
        &self,
        request: ResponderRequest,
    ) -> std::result::Result<String, ResponderError>;
}
