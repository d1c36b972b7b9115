//! Live population per role and home region.

use std::collections::BTreeMap;

use hive_agent::{AgentStore, Role};
use hive_core::RegionId;

/// Agents alive per `(role, home)` plus the source count of each home
/// region, the two inputs spawn planning needs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulationCounts {
    agents:  BTreeMap<(Role, RegionId), usize>,
    sources: BTreeMap<RegionId, usize>,
}

impl PopulationCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every record in `store`.
    pub fn from_store(store: &AgentStore) -> Self {
        let mut counts = Self::new();
        for (_, memory) in store.iter() {
            counts.add(memory.role, memory.home);
        }
        counts
    }

    pub fn add(&mut self, role: Role, home: RegionId) {
        *self.agents.entry((role, home)).or_default() += 1;
    }

    pub fn with_sources(mut self, region: RegionId, sources: usize) -> Self {
        self.set_sources(region, sources);
        self
    }

    pub fn set_sources(&mut self, region: RegionId, sources: usize) {
        self.sources.insert(region, sources);
    }

    #[inline]
    pub fn get(&self, role: Role, home: RegionId) -> usize {
        self.agents.get(&(role, home)).copied().unwrap_or(0)
    }

    /// Sources known in `region`; 0 if never set.
    #[inline]
    pub fn sources(&self, region: RegionId) -> usize {
        self.sources.get(&region).copied().unwrap_or(0)
    }

    /// Total agents counted.
    pub fn total(&self) -> usize {
        self.agents.values().sum()
    }
}
