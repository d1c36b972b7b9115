//! The engine interface consumed by the controller.
//!
//! # Pluggability
//!
//! Everything above this crate talks to the game through [`World`], so the
//! controller runs unchanged against a real engine binding or against
//! [`LocalWorld`](crate::LocalWorld) in tests.
//!
//! # Tick model
//!
//! Queries reflect the state at the start of the current tick.  Actions are
//! intents: a move issued during a tick is validated immediately (so the
//! caller gets a result code) but only takes effect when the engine advances
//! the tick.  Two agents moving into each other's tiles in the same tick
//! therefore swap cleanly.

use hive_core::{
    ActionResult, AgentId, Direction, EntityId, EntityKind, Position, RegionId, ResourceKind, Tick,
};
use hive_spatial::RegionView;

use crate::snapshot::{AgentView, EntitySnapshot, SpawnOrder};

pub trait World: RegionView {
    /// The engine's current tick.
    fn tick(&self) -> Tick;

    // ── Agents ────────────────────────────────────────────────────────────

    /// Every live agent owned by this colony, in engine enumeration order.
    fn agents(&self) -> Vec<AgentId>;

    fn agent(&self, id: AgentId) -> Option<AgentView>;

    /// The agent standing on `pos`, if any (owned or hostile).
    fn occupant(&self, pos: Position) -> Option<AgentView>;

    // ── Entities ──────────────────────────────────────────────────────────

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot>;

    /// Every entity of `kind` in `region`.  Empty for invisible regions.
    fn entities_in(&self, region: RegionId, kind: EntityKind) -> Vec<EntitySnapshot>;

    /// Every entity of `kind` within `range` tiles of `pos`.
    fn entities_near(&self, pos: Position, range: u32, kind: EntityKind) -> Vec<EntitySnapshot>;

    /// Index of the goal an agent at `from` can reach in the fewest steps
    /// (stopping adjacent to it), or `None` if none is reachable.
    fn closest_by_path(&self, from: Position, goals: &[Position]) -> Option<usize>;

    /// Index of the goal nearest `from` in straight-line range.  Ties go to
    /// the earlier goal.
    fn closest_by_range(&self, from: Position, goals: &[Position]) -> Option<usize> {
        goals
            .iter()
            .enumerate()
            .min_by_key(|(_, g)| from.range_to(**g))
            .map(|(i, _)| i)
    }

    // ── Actions ───────────────────────────────────────────────────────────

    /// Step one tile in `dir`.
    fn move_agent(&mut self, agent: AgentId, dir: Direction) -> ActionResult;

    /// Take `resource` out of a structure, tombstone, or ruin (range 1).
    fn withdraw(&mut self, agent: AgentId, target: EntityId, resource: ResourceKind) -> ActionResult;

    /// Pick up a dropped resource pile (range 1).
    fn pickup(&mut self, agent: AgentId, target: EntityId) -> ActionResult;

    /// Put `resource` into a structure (range 1).
    fn transfer(&mut self, agent: AgentId, target: EntityId, resource: ResourceKind) -> ActionResult;

    /// Mine energy from a source (range 1).
    fn harvest(&mut self, agent: AgentId, target: EntityId) -> ActionResult;

    /// Spend energy on a construction site (range 3).
    fn build(&mut self, agent: AgentId, target: EntityId) -> ActionResult;

    /// Spend energy restoring a structure's hits (range 3).
    fn repair(&mut self, agent: AgentId, target: EntityId) -> ActionResult;

    /// Spend energy on a controller (range 3).
    fn upgrade(&mut self, agent: AgentId, target: EntityId) -> ActionResult;

    /// Show a short message above the agent.
    fn say(&mut self, agent: AgentId, message: &str);

    /// Ask a spawn in `order.home` to produce an agent.  Returns the new
    /// agent's id (it reports `spawning` until ready), or `None` if no spawn
    /// there can take the order this tick.
    fn request_spawn(&mut self, order: &SpawnOrder) -> Option<AgentId>;
}
