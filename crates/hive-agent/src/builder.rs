//! Fluent builder for constructing `AgentStore` + `AgentRngs` in one step.
//!
//! # Usage
//!
//! ```rust
//! use hive_agent::{AgentMemory, AgentStoreBuilder, Role};
//! use hive_core::{AgentId, RegionId};
//!
//! let home = RegionId::new(0, 0);
//! let (store, rngs) = AgentStoreBuilder::new(/*seed=*/ 42)
//!     .agent(AgentId(0), AgentMemory::new(Role::Nurse, home))
//!     .agent(AgentId(1), AgentMemory::new(Role::Worker, home))
//!     .build();
//!
//! assert_eq!(store.len(), 2);
//! assert!(rngs.is_empty()); // RNGs are seeded on first use
//! ```

use hive_core::AgentId;

use crate::{AgentMemory, AgentRngs, AgentStore};

/// Fluent builder for [`AgentStore`] + [`AgentRngs`], used when resuming a
/// colony from previously persisted memory.
pub struct AgentStoreBuilder {
    seed:   u64,
    agents: Vec<(AgentId, AgentMemory)>,
}

impl AgentStoreBuilder {
    /// Create a builder using `seed` as the colony RNG seed.
    pub fn new(seed: u64) -> Self {
        Self { seed, agents: Vec::new() }
    }

    /// Add one persisted record.  A later record for the same id wins.
    pub fn agent(mut self, id: AgentId, memory: AgentMemory) -> Self {
        self.agents.push((id, memory));
        self
    }

    /// Add many persisted records.
    pub fn agents(mut self, records: impl IntoIterator<Item = (AgentId, AgentMemory)>) -> Self {
        self.agents.extend(records);
        self
    }

    /// Construct `AgentStore` and `AgentRngs`.
    pub fn build(self) -> (AgentStore, AgentRngs) {
        let mut store = AgentStore::new();
        for (id, memory) in self.agents {
            store.insert(id, memory);
        }
        (store, AgentRngs::new(self.seed))
    }
}
