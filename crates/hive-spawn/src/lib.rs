//! `hive-spawn`: population quotas and spawn planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`quota`]   | `SpawnQuota`, `QuotaTable`                                 |
//! | [`counts`]  | `PopulationCounts` (live agents per role/home, sources)    |
//! | [`planner`] | `SpawnPlanner::evaluate`, `SpawnNeed`                      |
//! | [`loader`]  | `load_quotas_csv`, `load_quotas_reader`                    |
//! | [`error`]   | `SpawnError`, `SpawnResult<T>`                             |
//!
//! # Planning model
//!
//! ```text
//! want(role, home) = minimum                      (plain quota)
//!                  = minimum × sources(home)      (per-source quota)
//! need(role, home) ⇔ alive(role, home) < want(role, home)
//! ```
//!
//! Planning is a pure comparison.  Choosing a body and issuing the spawn is
//! the colony driver's job.

pub mod counts;
pub mod error;
pub mod loader;
pub mod planner;
pub mod quota;

#[cfg(test)]
mod tests;

pub use counts::PopulationCounts;
pub use error::{SpawnError, SpawnResult};
pub use loader::{load_quotas_csv, load_quotas_reader};
pub use planner::{SpawnNeed, SpawnPlanner};
pub use quota::{QuotaTable, SpawnQuota};
