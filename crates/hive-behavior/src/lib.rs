//! `hive-behavior`: per-role task assignment.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`config`]   | `RoleConfig`, `RoleTable`: each role's behavior as data       |
//! | [`select`]   | Target selection queries over a `World`                       |
//! | [`assignor`] | `TaskAssignor`, the status machine driving every role         |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! Roles differ only in their [`RoleConfig`]: where they gather, what they
//! work on, and when they switch.  A single [`TaskAssignor`] runs them all.
//! Movement goes through the [`MovementCoordinator`](hive_mobility::MovementCoordinator)
//! handed in by the caller so every agent in a tick shares one move registry.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on the config types.        |

pub mod assignor;
pub mod config;
pub mod error;
pub mod select;


pub use assignor::{Evaluation, TaskAssignor};
pub use config::{Gather, REPAIR_CEILING, RoleConfig, RoleTable, Scope, Transition, Work};
pub use error::{BehaviorError, BehaviorResult};
