//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `PdError` or convert into
//! their parent crate's error via `From` impls.

use thiserror::Error;

/// The base error for `pd-core`, wrapped by sub-crates.
#[derive(Debug, Error)]
pub enum PdError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `pd-*` crates.
pub type PdResult<T> = Result<T, PdError>;
