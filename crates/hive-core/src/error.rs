//! Framework error type.
//!
//! Sub-crates define their own error enums and convert `HiveError` into them
//! via `#[from]`.  Game result codes are not errors; see
//! [`ActionResult`](crate::ActionResult).

use thiserror::Error;

use crate::AgentId;

/// The top-level error type for `hive-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum HiveError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("invalid region name {0:?}")]
    InvalidRegionName(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for all `hive-*` crates.
pub type HiveResult<T> = Result<T, HiveError>;
