//! Error types.
//!
//! Remote layout failures never reach the user: the layout computer logs them
//! and falls back to the local layout. `ViewError` covers bad input and use
//! after teardown; `LifecycleCoordinator::rebuild` returns it, and the
//! JavaScript bindings turn it into a thrown error.

use std::time::Duration;

use thiserror::Error;

/// Why a remote layout attempt was not adopted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// Network failure before any response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {0}")]
    Status(u16),

    /// The body could not be decoded or violates the layout contract.
    #[error("malformed layout response: {0}")]
    Malformed(String),

    /// The endpoint answered with an empty node list.
    #[error("layout response contained no nodes")]
    EmptyResponse,

    /// No response within the allotted time.
    #[error("no layout response within {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by the JavaScript-facing view.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("invalid issue list: {0}")]
    InvalidIssues(String),

    #[error("invalid view config: {0}")]
    InvalidConfig(String),

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("view has been disposed")]
    Disposed,
}
