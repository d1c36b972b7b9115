//! Plain-data views of world objects handed to the controller.
//!
//! Snapshots are copies taken at query time; acting on an object always goes
//! back through the [`World`](crate::World) by id, so a stale snapshot can at
//! worst produce an `InvalidTarget` result.

use hive_core::{AgentId, EntityId, EntityKind, Inventory, Position, RegionId, ResourceKind};

/// A non-agent world object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    pub id:    EntityId,
    pub kind:  EntityKind,
    pub pos:   Position,
    /// Owned by the controlling player.
    pub owned: bool,
    /// Resources held.  Sources report their remaining energy here.
    pub store: Inventory,
    /// Current and maximum hit points; `0 / 0` for objects without hits.
    pub hits:     u32,
    pub hits_max: u32,
    /// Construction sites: energy invested so far and energy required.
    /// Controllers: upgrade progress (with `progress_total` unused).
    pub progress:       u32,
    pub progress_total: u32,
}

impl EntitySnapshot {
    #[inline]
    pub fn amount(&self, resource: ResourceKind) -> u32 {
        self.store.get(resource)
    }

    #[inline]
    pub fn energy(&self) -> u32 {
        self.amount(ResourceKind::Energy)
    }

    /// Room left for `resource`, or 0 if this object never accepts it.
    pub fn free_for(&self, resource: ResourceKind) -> u32 {
        if self.kind.accepts(resource) { self.store.free() } else { 0 }
    }

    /// `hits / hits_max`, or 1.0 for objects without hits.
    pub fn health_fraction(&self) -> f64 {
        if self.hits_max == 0 { 1.0 } else { self.hits as f64 / self.hits_max as f64 }
    }

    #[inline]
    pub fn is_damaged(&self) -> bool {
        self.hits < self.hits_max
    }
}

/// An agent as the engine currently reports it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentView {
    pub id:       AgentId,
    pub pos:      Position,
    pub store:    Inventory,
    /// Still being produced; cannot act yet.
    pub spawning: bool,
    /// Controlled by this colony (hostile agents also occupy tiles).
    pub owned:    bool,
}

/// A request to produce a new agent in `home`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnOrder {
    pub home: RegionId,
    pub name: String,
}
