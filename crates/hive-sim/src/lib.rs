//! `hive-sim`: per-tick driver for the hive colony controller.
//!
//! # Tick loop
//!
//! ```text
//! every tick (driven by the caller, world advanced in between):
//!   ① Evict:  drop memory of agents the world no longer reports.
//!   ② Spawn:  compare live counts against the quota table and request
//!              one agent per under-filled (role, home).
//!   ③ Assign: for each agent in ascending AgentId order, while the tick
//!              budget lasts: take its memory, run its role's status
//!              machine (which may move it), put the memory back.
//! ```
//!
//! The move registry inside the shared [`MovementCoordinator`](hive_mobility::MovementCoordinator)
//! resets itself on the first move of a new tick, so no begin-tick call is
//! needed.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`colony`]   | `Colony`, `TickReport`, `AssignmentPass`                   |
//! | [`builder`]  | `ColonyBuilder`                                            |
//! | [`config`]   | `ColonyConfig`                                             |
//! | [`budget`]   | `TickBudget`, `WallClockBudget`, `AgentBudget`, `Unlimited`|
//! | [`observer`] | `ColonyObserver`, `NoopObserver`                           |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | Adds `Colony::prewarm_costs` (Rayon cost-matrix prewarm).  |
//! | `fx-hash`  | FxHash for the move registry.                              |
//! | `serde`    | Derives `Serialize`/`Deserialize` on `ColonyConfig`.       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use hive_sim::{ColonyBuilder, ColonyConfig, NoopObserver};
//!
//! let mut colony = ColonyBuilder::new(ColonyConfig::seeded(42)).quotas(quotas).build()?;
//! for _ in 0..1_000 {
//!     colony.run_tick(&mut world, &mut NoopObserver)?;
//!     world.end_tick();
//! }
//! ```

pub mod budget;
pub mod builder;
pub mod colony;
pub mod config;
pub mod error;
pub mod observer;

#[cfg(test)]
mod tests;

pub use budget::{AgentBudget, TickBudget, Unlimited, WallClockBudget};
pub use builder::ColonyBuilder;
pub use colony::{AssignmentPass, Colony, TickReport};
pub use config::ColonyConfig;
pub use error::{SimError, SimResult};
pub use observer::{ColonyObserver, NoopObserver};
