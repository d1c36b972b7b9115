//! Agent memory storage: `AgentStore` (memory records) and `AgentRngs`
//! (per-agent RNG).
//!
//! # Why two structs?
//!
//! Shove resolution needs `&mut AgentRngs` for the agent being displaced
//! while the coordinator also reads other agents' memory out of
//! `&mut AgentStore`.  Keeping RNGs in their own struct lets both borrows
//! coexist.
//!
//! # Take / restore
//!
//! While an agent is being evaluated its memory is taken out of the store
//! ([`AgentStore::take`]) and put back when the evaluation finishes
//! ([`AgentStore::restore`]).  An evaluation interrupted between agents
//! therefore leaves every other record untouched.

use std::collections::BTreeMap;

use hive_core::{AgentId, AgentRng, RegionId};

use crate::memory::{AgentMemory, Role};

// ── AgentRngs ─────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNGs, created on first use.
pub struct AgentRngs {
    seed:  u64,
    inner: BTreeMap<AgentId, AgentRng>,
}

impl AgentRngs {
    pub fn new(seed: u64) -> Self {
        Self { seed, inner: BTreeMap::new() }
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Mutable reference to one agent's RNG, seeding it if needed.
    pub fn get_mut(&mut self, agent: AgentId) -> &mut AgentRng {
        let seed = self.seed;
        self.inner.entry(agent).or_insert_with(|| AgentRng::new(seed, agent))
    }

    pub fn remove(&mut self, agent: AgentId) {
        self.inner.remove(&agent);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

// ── AgentStore ────────────────────────────────────────────────────────────────

/// Memory records for every agent the colony knows about, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct AgentStore {
    memories: BTreeMap<AgentId, AgentMemory>,
}

impl AgentStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// Iterator over all known `AgentId`s in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.memories.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &AgentMemory)> + '_ {
        self.memories.iter().map(|(&id, m)| (id, m))
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&AgentMemory> {
        self.memories.get(&agent)
    }

    #[inline]
    pub fn get_mut(&mut self, agent: AgentId) -> Option<&mut AgentMemory> {
        self.memories.get_mut(&agent)
    }

    #[inline]
    pub fn contains(&self, agent: AgentId) -> bool {
        self.memories.contains_key(&agent)
    }

    /// Record memory for `agent`, replacing any previous record.
    pub fn insert(&mut self, agent: AgentId, memory: AgentMemory) {
        self.memories.insert(agent, memory);
    }

    /// Remove and return `agent`'s memory for exclusive use.
    pub fn take(&mut self, agent: AgentId) -> Option<AgentMemory> {
        self.memories.remove(&agent)
    }

    /// Put memory back after [`take`](Self::take).
    pub fn restore(&mut self, agent: AgentId, memory: AgentMemory) {
        self.memories.insert(agent, memory);
    }

    pub fn remove(&mut self, agent: AgentId) -> Option<AgentMemory> {
        self.memories.remove(&agent)
    }

    /// Drop every record for which `keep` returns `false`; returns the
    /// evicted ids.
    pub fn evict(&mut self, mut keep: impl FnMut(AgentId) -> bool) -> Vec<AgentId> {
        let gone: Vec<AgentId> = self.memories.keys().copied().filter(|&id| !keep(id)).collect();
        for id in &gone {
            self.memories.remove(id);
        }
        gone
    }

    /// Agents with `role` whose home is `home`.
    pub fn count_role(&self, role: Role, home: RegionId) -> usize {
        self.memories.values().filter(|m| m.role == role && m.home == home).count()
    }

    /// Agents other than `except` with `role` whose memory satisfies `pred`.
    pub fn any_other(&self, except: AgentId, role: Role, pred: impl Fn(&AgentMemory) -> bool) -> bool {
        self.memories.iter().any(|(&id, m)| id != except && m.role == role && pred(m))
    }
}
