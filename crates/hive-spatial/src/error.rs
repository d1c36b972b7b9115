//! Spatial-subsystem error types.

use thiserror::Error;

use hive_core::HiveError;

/// A serialized path that does not follow the `XXYY` + direction-code layout.
///
/// Only ever produced by corrupt persisted memory; callers discard the path
/// and replan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("serialized path {0:?} is shorter than its 4-digit head")]
    TooShort(String),

    #[error("serialized path head {0:?} is not a tile coordinate")]
    BadHead(String),

    #[error("invalid direction code {code:?} at offset {offset}")]
    BadDirection { code: char, offset: usize },
}

/// Errors produced by `hive-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Core(#[from] HiveError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
