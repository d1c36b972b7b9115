//! `hive-agent`: per-agent memory for the `hive` colony controller.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                         |
//! |-------------|------------------------------------------------------------------|
//! | [`memory`]  | `AgentMemory`, `Role`, `Status`, `TargetKind`, `TargetRef`, `MovePlan` |
//! | [`region`]  | `RegionMemory`, `RegionReport`: what scouts saw elsewhere        |
//! | [`store`]   | `AgentStore` (memory by id), `AgentRngs` (per-agent RNG)         |
//! | [`builder`] | `AgentStoreBuilder` (resume from persisted memory)               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on memory types so the      |
//! |         | external key-value store can persist them.                    |

pub mod builder;
pub mod memory;
pub mod region;
pub mod store;


pub use builder::AgentStoreBuilder;
pub use memory::{AgentMemory, MovePlan, Role, Status, TargetKind, TargetRef};
pub use region::{ControllerReport, RegionMemory, RegionReport};
pub use store::{AgentRngs, AgentStore};
