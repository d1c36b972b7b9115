//! World-subsystem error type.
//!
//! Only the `LocalWorld` construction API returns these.  Actions issued
//! through [`World`](crate::World) report `ActionResult` codes instead.

use thiserror::Error;

use hive_core::{AgentId, EntityId, HiveError, Position, RegionId};

/// Errors produced by `hive-world`.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("region {0} does not exist")]
    UnknownRegion(RegionId),

    #[error("region {0} already exists")]
    DuplicateRegion(RegionId),

    #[error("tile {0} is not walkable")]
    NotWalkable(Position),

    #[error("tile {0} is already occupied")]
    Occupied(Position),

    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Core(#[from] HiveError),
}

pub type WorldResult<T> = Result<T, WorldError>;
