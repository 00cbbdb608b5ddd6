//! Common error types for jetrank
//!
//! Only conditions the caller must act on are errors. A malformed flight or an
//! unresolved airport code degrades to a neutral fallback inside the engine
//! (flagged via `CriticalFactor` / `reduced_confidence`) and never aborts a
//! whole candidate set; an empty candidate set likewise produces empty or
//! degenerate output, not an error.

use thiserror::Error;

/// Common result type for jetrank operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the ranking engine
#[derive(Error, Debug)]
pub enum Error {
    /// Filter specification value outside its domain (e.g. negative max price).
    /// Rejected before execution; the API layer maps this to a user-facing message.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal invariant violation
    #[error("Internal error: {0}")]
    Internal(String),
}
