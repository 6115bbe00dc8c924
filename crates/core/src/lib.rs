//! # Ember Core
//!
//! Domain types, collaborator traits, and the error taxonomy for the ember
//! companion CLI. Everything here is either a value object ([`Turn`],
//! [`Fact`]) or a seam: the reasoning responder and the web search provider
//! are traits whose implementations live in outer crates, so the session
//! loop can be driven by scripted stand-ins in tests and never needs to know
//! whether a reply came from a subprocess, a local service, or a remote API.

pub mod error;
pub mod responder;
pub mod search;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ResponderError, Result, SearchError, StoreError};
pub use responder::{Responder, ResponderRequest};
pub use search::SearchProvider;
pub use turn::{Fact, MAX_FACT_LEN, Role, SessionStamp, Turn};
