//! `hive-core`: foundational types for the `hive` colony controller.
//!
//! This crate is a dependency of every other `hive-*` crate.  It has no
//! `hive-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `EntityId`                                 |
//! | [`grid`]        | `RegionId`, `Position`, `Direction`, `Terrain`        |
//! | [`time`]        | `Tick`                                                |
//! | [`resource`]    | `ResourceKind`, `Inventory`                           |
//! | [`entity`]      | `EntityKind` and its movement/transfer capabilities   |
//! | [`action`]      | `ActionResult` game result codes                      |
//! | [`rng`]         | `AgentRng` (per-agent, deterministic)                 |
//! | [`error`]       | `HiveError`, `HiveResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |
//!           | Required to persist agent memory between ticks.            |

pub mod action;
pub mod entity;
pub mod error;
pub mod grid;
pub mod ids;
pub mod resource;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use action::ActionResult;
pub use entity::EntityKind;
pub use error::{HiveError, HiveResult};
pub use grid::{Direction, MAX_REGION_INDEX, Position, REGION_SIZE, RegionId, Terrain};
pub use ids::{AgentId, EntityId};
pub use resource::{Inventory, ResourceKind};
pub use rng::AgentRng;
pub use time::Tick;
