//! Framework error type.
//!
//! Only genuinely invalid input is an error.  A trial that never ignites or
//! never collides is a modeled outcome and is reported as a value by the
//! crates that run trials.

use thiserror::Error;

/// The top-level error type for `ste-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum SteError {
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field:  &'static str,
        reason: String,
    },
}

impl SteError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SteError::InvalidConfig { field, reason: reason.into() }
    }
}

/// Shorthand result type for all `ste-*` crates.
pub type SteResult<T> = Result<T, SteError>;
