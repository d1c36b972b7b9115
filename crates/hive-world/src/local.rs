//! `LocalWorld`: a small in-memory engine implementing [`World`].
//!
//! It models just enough of the game for the controller to be exercised end
//! to end: terrain, fixtures with stores and hits, dropped resources,
//! tombstones, spawning, and intent-based movement resolved when the tick
//! advances.
//!
//! # Movement resolution
//!
//! [`LocalWorld::end_tick`] applies every move intent at once:
//!
//! 1. Intents into unwalkable tiles are dropped.  When several agents want
//!    the same tile the lowest `AgentId` wins.
//! 2. A mover whose destination is held by an agent that is not itself
//!    moving is blocked.  Blocking can cascade down a chain, so this repeats
//!    until nothing changes.
//! 3. Survivors move simultaneously, so swaps and longer rotations succeed.
//!
//! # Spatial index
//!
//! Entities live in an `rstar` R-tree keyed by world coordinates.  Range
//! queries walk `nearest_neighbor_iter` out to the circle enclosing the
//! Chebyshev square and then filter to the square.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::{debug, trace};

use hive_core::{
    ActionResult, AgentId, Direction, EntityId, EntityKind, Inventory, Position, REGION_SIZE,
    RegionId, ResourceKind, Terrain, Tick,
};
use hive_spatial::{RegionView, StructureTile};

use crate::error::{WorldError, WorldResult};
use crate::snapshot::{AgentView, EntitySnapshot, SpawnOrder};
use crate::world::World;

/// Range of withdraw, pickup, transfer, and harvest.
pub const ADJACENT_RANGE: u32 = 1;
/// Range of build, repair, and upgrade.
pub const WORK_RANGE: u32 = 3;
/// Hits restored per unit of energy spent repairing.
pub const REPAIR_HITS_PER_ENERGY: u32 = 100;

// ── Config ────────────────────────────────────────────────────────────────────

/// Rates and sizes used by the local engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalWorldConfig {
    /// Energy mined per `harvest` call.
    pub harvest_rate:       u32,
    /// Energy spent per `build` call.
    pub build_rate:         u32,
    /// Energy spent per `repair` call.
    pub repair_rate:        u32,
    /// Energy spent per `upgrade` call.
    pub upgrade_rate:       u32,
    /// Energy drawn from spawns and extensions per produced agent.
    pub spawn_cost:         u32,
    /// Ticks an agent spends spawning before it can act.
    pub spawn_ticks:        u32,
    /// Carry capacity of produced agents.
    pub agent_capacity:     u32,
    /// Energy a source holds when full.
    pub source_capacity:    u32,
    /// Sources refill every this many ticks.
    pub source_regen_ticks: u64,
}

impl Default for LocalWorldConfig {
    fn default() -> Self {
        Self {
            harvest_rate:       10,
            build_rate:         5,
            repair_rate:        1,
            upgrade_rate:       2,
            spawn_cost:         200,
            spawn_ticks:        3,
            agent_capacity:     100,
            source_capacity:    3000,
            source_regen_ticks: 300,
        }
    }
}

/// Default maximum hits for a fixture kind (0 for kinds without hits).
pub fn default_hits(kind: EntityKind) -> u32 {
    match kind {
        EntityKind::Road      => 5_000,
        EntityKind::Container => 250_000,
        EntityKind::Wall | EntityKind::Rampart => 300_000_000,
        EntityKind::Spawn     => 5_000,
        EntityKind::Extension => 1_000,
        EntityKind::Tower     => 3_000,
        EntityKind::Storage   => 10_000,
        EntityKind::Link      => 1_000,
        _ => 0,
    }
}

/// Default store capacity for a structure kind.
pub fn default_capacity(kind: EntityKind) -> u32 {
    match kind {
        EntityKind::Spawn     => 300,
        EntityKind::Extension => 50,
        EntityKind::Tower     => 1_000,
        EntityKind::Container => 2_000,
        EntityKind::Storage   => 1_000_000,
        EntityKind::Link      => 800,
        _ => 0,
    }
}

// ── Internal state ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct IndexEntry {
    point: [i64; 2],
    id:    EntityId,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[i64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexEntry {
    fn distance_2(&self, point: &[i64; 2]) -> i64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

fn point(pos: Position) -> [i64; 2] {
    [pos.world_x() as i64, pos.world_y() as i64]
}

struct RegionData {
    terrain: Vec<Terrain>,
    visible: bool,
}

struct Entity {
    kind:           EntityKind,
    pos:            Position,
    owned:          bool,
    store:          Inventory,
    hits:           u32,
    hits_max:       u32,
    progress:       u32,
    progress_total: u32,
    builds:         Option<EntityKind>,
}

struct Body {
    pos:           Position,
    store:         Inventory,
    owned:         bool,
    spawning_left: u32,
    name:          String,
}

// ── LocalWorld ────────────────────────────────────────────────────────────────

/// In-memory engine.  Build it with the `add_*` methods, drive it through
/// [`World`], and call [`end_tick`](Self::end_tick) between ticks.
pub struct LocalWorld {
    pub config:  LocalWorldConfig,
    tick:        Tick,
    regions:     HashMap<RegionId, RegionData>,
    entities:    BTreeMap<EntityId, Entity>,
    index:       RTree<IndexEntry>,
    agents:      BTreeMap<AgentId, Body>,
    occupancy:   HashMap<Position, AgentId>,
    intents:     BTreeMap<AgentId, Direction>,
    spawns_used: HashSet<EntityId>,
    speech:      Vec<(Tick, AgentId, String)>,
    next_entity: u32,
    next_agent:  u32,
}

impl Default for LocalWorld {
    fn default() -> Self {
        Self::new(LocalWorldConfig::default())
    }
}

impl LocalWorld {
    pub fn new(config: LocalWorldConfig) -> Self {
        Self {
            config,
            tick:        Tick::ZERO,
            regions:     HashMap::new(),
            entities:    BTreeMap::new(),
            index:       RTree::new(),
            agents:      BTreeMap::new(),
            occupancy:   HashMap::new(),
            intents:     BTreeMap::new(),
            spawns_used: HashSet::new(),
            speech:      Vec::new(),
            next_entity: 0,
            next_agent:  0,
        }
    }

    // ── Construction ──────────────────────────────────────────────────────

    /// Add a visible all-plain region.
    pub fn add_region(&mut self, region: RegionId) -> WorldResult<()> {
        if self.regions.contains_key(&region) {
            return Err(WorldError::DuplicateRegion(region));
        }
        let tiles = REGION_SIZE as usize * REGION_SIZE as usize;
        self.regions.insert(region, RegionData { terrain: vec![Terrain::Plain; tiles], visible: true });
        Ok(())
    }

    pub fn set_terrain(&mut self, pos: Position, terrain: Terrain) -> WorldResult<()> {
        let data = self.regions.get_mut(&pos.region).ok_or(WorldError::UnknownRegion(pos.region))?;
        data.terrain[pos.y as usize * REGION_SIZE as usize + pos.x as usize] = terrain;
        Ok(())
    }

    pub fn set_visible(&mut self, region: RegionId, visible: bool) -> WorldResult<()> {
        let data = self.regions.get_mut(&region).ok_or(WorldError::UnknownRegion(region))?;
        data.visible = visible;
        Ok(())
    }

    fn insert_entity(&mut self, kind: EntityKind, pos: Position, owned: bool, store: Inventory) -> WorldResult<EntityId> {
        if !self.regions.contains_key(&pos.region) {
            return Err(WorldError::UnknownRegion(pos.region));
        }
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        let hits_max = default_hits(kind);
        self.entities.insert(id, Entity {
            kind,
            pos,
            owned,
            store,
            hits: hits_max,
            hits_max,
            progress: 0,
            progress_total: 0,
            builds: None,
        });
        self.index.insert(IndexEntry { point: point(pos), id });
        Ok(id)
    }

    /// Add a structure with full hits and an empty store.
    pub fn add_structure(&mut self, kind: EntityKind, pos: Position, owned: bool) -> WorldResult<EntityId> {
        self.insert_entity(kind, pos, owned, Inventory::with_capacity(default_capacity(kind)))
    }

    /// Add a full energy source.
    pub fn add_source(&mut self, pos: Position) -> WorldResult<EntityId> {
        let cap = self.config.source_capacity;
        self.insert_entity(EntityKind::Source, pos, false, Inventory::holding(cap, ResourceKind::Energy, cap))
    }

    pub fn add_controller(&mut self, pos: Position, owned: bool) -> WorldResult<EntityId> {
        self.insert_entity(EntityKind::Controller, pos, owned, Inventory::default())
    }

    /// Add a construction site that becomes `builds` after `total` energy.
    pub fn add_site(&mut self, pos: Position, builds: EntityKind, total: u32) -> WorldResult<EntityId> {
        let id = self.insert_entity(EntityKind::ConstructionSite, pos, true, Inventory::default())?;
        if let Some(e) = self.entities.get_mut(&id) {
            e.builds = Some(builds);
            e.progress_total = total;
        }
        Ok(id)
    }

    /// Add a pile of `amount` dropped `resource`.
    pub fn add_drop(&mut self, pos: Position, resource: ResourceKind, amount: u32) -> WorldResult<EntityId> {
        self.insert_entity(EntityKind::DroppedResource, pos, false, Inventory::holding(amount, resource, amount))
    }

    pub fn add_tombstone(&mut self, pos: Position, store: Inventory) -> WorldResult<EntityId> {
        self.insert_entity(EntityKind::Tombstone, pos, false, store)
    }

    pub fn add_ruin(&mut self, pos: Position, store: Inventory) -> WorldResult<EntityId> {
        self.insert_entity(EntityKind::Ruin, pos, false, store)
    }

    /// Put up to `amount` of `resource` into an entity's store; returns how
    /// much fit.
    pub fn fill(&mut self, id: EntityId, resource: ResourceKind, amount: u32) -> WorldResult<u32> {
        let e = self.entities.get_mut(&id).ok_or(WorldError::EntityNotFound(id))?;
        Ok(e.store.add(resource, amount))
    }

    pub fn set_hits(&mut self, id: EntityId, hits: u32) -> WorldResult<()> {
        let e = self.entities.get_mut(&id).ok_or(WorldError::EntityNotFound(id))?;
        e.hits = hits.min(e.hits_max);
        Ok(())
    }

    /// Place a ready owned agent with an empty store.
    pub fn add_agent(&mut self, pos: Position) -> WorldResult<AgentId> {
        self.place_agent(pos, true)
    }

    /// Place an agent belonging to someone else.  It never moves.
    pub fn add_hostile(&mut self, pos: Position) -> WorldResult<AgentId> {
        self.place_agent(pos, false)
    }

    fn place_agent(&mut self, pos: Position, owned: bool) -> WorldResult<AgentId> {
        if !self.regions.contains_key(&pos.region) {
            return Err(WorldError::UnknownRegion(pos.region));
        }
        if !self.walkable(pos) {
            return Err(WorldError::NotWalkable(pos));
        }
        if self.occupancy.contains_key(&pos) {
            return Err(WorldError::Occupied(pos));
        }
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.agents.insert(id, Body {
            pos,
            store: Inventory::with_capacity(self.config.agent_capacity),
            owned,
            spawning_left: 0,
            name: String::new(),
        });
        self.occupancy.insert(pos, id);
        Ok(id)
    }

    /// Put resources straight into an agent's store; returns how much fit.
    pub fn give(&mut self, agent: AgentId, resource: ResourceKind, amount: u32) -> WorldResult<u32> {
        let b = self.agents.get_mut(&agent).ok_or(WorldError::AgentNotFound(agent))?;
        Ok(b.store.add(resource, amount))
    }

    /// Remove an agent, leaving a tombstone with its store.
    pub fn kill_agent(&mut self, agent: AgentId) -> WorldResult<EntityId> {
        let body = self.agents.remove(&agent).ok_or(WorldError::AgentNotFound(agent))?;
        if self.occupancy.get(&body.pos) == Some(&agent) {
            self.occupancy.remove(&body.pos);
        }
        self.intents.remove(&agent);
        debug!(%agent, pos = %body.pos, "agent died");
        self.add_tombstone(body.pos, body.store)
    }

    // ── Inspection ────────────────────────────────────────────────────────

    /// Every `say` so far, oldest first.
    pub fn speech(&self) -> &[(Tick, AgentId, String)] {
        &self.speech
    }

    /// Messages `agent` has said.
    pub fn said_by(&self, agent: AgentId) -> Vec<&str> {
        self.speech.iter().filter(|(_, a, _)| *a == agent).map(|(_, _, m)| m.as_str()).collect()
    }

    /// The move `agent` has queued this tick.
    pub fn intent(&self, agent: AgentId) -> Option<Direction> {
        self.intents.get(&agent).copied()
    }

    /// Name given to `agent` when it was spawned.
    pub fn agent_name(&self, agent: AgentId) -> Option<&str> {
        self.agents.get(&agent).map(|b| b.name.as_str())
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn terrain_at(&self, pos: Position) -> Terrain {
        self.regions
            .get(&pos.region)
            .map_or(Terrain::Wall, |d| d.terrain[pos.y as usize * REGION_SIZE as usize + pos.x as usize])
    }

    fn ids_near(&self, pos: Position, range: u32) -> Vec<EntityId> {
        let q = point(pos);
        let r = range as i64;
        let limit = 2 * r * r;
        self.index
            .nearest_neighbor_iter(&q)
            .take_while(|e| e.distance_2(&q) <= limit)
            .filter(|e| (e.point[0] - q[0]).abs().max((e.point[1] - q[1]).abs()) <= r)
            .map(|e| e.id)
            .collect()
    }

    /// Terrain and fixtures allow standing on `pos` (agents not considered).
    fn walkable(&self, pos: Position) -> bool {
        if !self.regions.contains_key(&pos.region) || !self.terrain_at(pos).is_walkable() {
            return false;
        }
        !self
            .ids_near(pos, 0)
            .iter()
            .filter_map(|id| self.entities.get(id))
            .any(|e| e.kind.blocks_movement(e.owned))
    }

    fn snapshot(id: EntityId, e: &Entity) -> EntitySnapshot {
        EntitySnapshot {
            id,
            kind: e.kind,
            pos: e.pos,
            owned: e.owned,
            store: e.store.clone(),
            hits: e.hits,
            hits_max: e.hits_max,
            progress: e.progress,
            progress_total: e.progress_total,
        }
    }

    fn view(id: AgentId, b: &Body) -> AgentView {
        AgentView { id, pos: b.pos, store: b.store.clone(), spawning: b.spawning_left > 0, owned: b.owned }
    }

    /// Common checks for an interaction: an owned, ready actor and an
    /// existing target within `range`.
    fn check(&self, agent: AgentId, target: EntityId, range: u32) -> Result<(), ActionResult> {
        let body = self.agents.get(&agent).filter(|b| b.owned).ok_or(ActionResult::NotOwner)?;
        if body.spawning_left > 0 {
            return Err(ActionResult::Busy);
        }
        let e = self.entities.get(&target).ok_or(ActionResult::InvalidTarget)?;
        if !body.pos.in_range_to(e.pos, range) {
            return Err(ActionResult::NotInRange);
        }
        Ok(())
    }

    fn parts(&mut self, agent: AgentId, target: EntityId) -> Option<(&mut Body, &mut Entity)> {
        Some((self.agents.get_mut(&agent)?, self.entities.get_mut(&target)?))
    }

    fn remove_entity(&mut self, id: EntityId) {
        if let Some(e) = self.entities.remove(&id) {
            self.index.remove(&IndexEntry { point: point(e.pos), id });
        }
    }

    // ── Tick advance ──────────────────────────────────────────────────────

    /// Apply queued moves, finish spawning, regenerate sources, and advance
    /// the tick counter.
    pub fn end_tick(&mut self) {
        self.resolve_moves();
        self.finish_spawning();

        let next = self.tick.next();
        if self.config.source_regen_ticks > 0 && next.0 % self.config.source_regen_ticks == 0 {
            for e in self.entities.values_mut().filter(|e| e.kind == EntityKind::Source) {
                let missing = e.store.free();
                e.store.add(ResourceKind::Energy, missing);
            }
        }
        self.spawns_used.clear();
        self.tick = next;
    }

    fn resolve_moves(&mut self) {
        let intents = std::mem::take(&mut self.intents);
        let mut claimed: HashSet<Position> = HashSet::new();
        let mut moving: BTreeMap<AgentId, Position> = BTreeMap::new();

        for (&id, &dir) in &intents {
            let Some(body) = self.agents.get(&id) else { continue };
            let dest = body.pos.step(dir);
            if self.walkable(dest) && claimed.insert(dest) {
                moving.insert(id, dest);
            }
        }

        loop {
            let blocked: Vec<AgentId> = moving
                .iter()
                .filter(|(_, dest)| self.occupancy.get(*dest).is_some_and(|o| !moving.contains_key(o)))
                .map(|(&id, _)| id)
                .collect();
            if blocked.is_empty() {
                break;
            }
            for id in blocked {
                moving.remove(&id);
            }
        }

        for (&id, _) in &moving {
            if let Some(b) = self.agents.get(&id) {
                self.occupancy.remove(&b.pos);
            }
        }
        for (id, dest) in moving {
            if let Some(b) = self.agents.get_mut(&id) {
                trace!(agent = %id, from = %b.pos, to = %dest, "moved");
                b.pos = dest;
                self.occupancy.insert(dest, id);
            }
        }
    }

    fn finish_spawning(&mut self) {
        let ids: Vec<AgentId> = self.agents.iter().filter(|(_, b)| b.spawning_left > 0).map(|(&id, _)| id).collect();
        for id in ids {
            let Some(b) = self.agents.get(&id) else { continue };
            if b.spawning_left > 1 {
                if let Some(b) = self.agents.get_mut(&id) {
                    b.spawning_left -= 1;
                }
                continue;
            }
            let spawn_pos = b.pos;
            let exit = spawn_pos
                .neighbors()
                .map(|(_, p)| p)
                .find(|p| self.walkable(*p) && !self.occupancy.contains_key(p));
            // No free tile: stay inside the spawn one more tick.
            let Some(exit) = exit else { continue };
            if let Some(b) = self.agents.get_mut(&id) {
                b.spawning_left = 0;
                b.pos = exit;
                self.occupancy.insert(exit, id);
                debug!(agent = %id, pos = %exit, name = %b.name, "agent ready");
            }
        }
    }
}

// ── RegionView ────────────────────────────────────────────────────────────────

impl RegionView for LocalWorld {
    fn region_exists(&self, region: RegionId) -> bool {
        self.regions.contains_key(&region)
    }

    /// Flagged visible, or an owned agent stands in it.
    fn is_visible(&self, region: RegionId) -> bool {
        match self.regions.get(&region) {
            Some(d) => d.visible || self.agents.values().any(|b| b.owned && b.pos.region == region),
            None => false,
        }
    }

    fn terrain(&self, pos: Position) -> Terrain {
        self.terrain_at(pos)
    }

    fn structures(&self, region: RegionId) -> Vec<StructureTile> {
        if !self.is_visible(region) {
            return Vec::new();
        }
        self.entities
            .values()
            .filter(|e| e.pos.region == region && e.kind.is_fixture())
            .map(|e| StructureTile { pos: e.pos, kind: e.kind, owned: e.owned })
            .collect()
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

impl World for LocalWorld {
    fn tick(&self) -> Tick {
        self.tick
    }

    fn agents(&self) -> Vec<AgentId> {
        self.agents.iter().filter(|(_, b)| b.owned).map(|(&id, _)| id).collect()
    }

    fn agent(&self, id: AgentId) -> Option<AgentView> {
        self.agents.get(&id).map(|b| Self::view(id, b))
    }

    fn occupant(&self, pos: Position) -> Option<AgentView> {
        let id = *self.occupancy.get(&pos)?;
        self.agent(id)
    }

    fn entity(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).map(|e| Self::snapshot(id, e))
    }

    fn entities_in(&self, region: RegionId, kind: EntityKind) -> Vec<EntitySnapshot> {
        if !self.is_visible(region) {
            return Vec::new();
        }
        self.entities
            .iter()
            .filter(|(_, e)| e.pos.region == region && e.kind == kind)
            .map(|(&id, e)| Self::snapshot(id, e))
            .collect()
    }

    fn entities_near(&self, pos: Position, range: u32, kind: EntityKind) -> Vec<EntitySnapshot> {
        let mut ids = self.ids_near(pos, range);
        ids.sort_unstable();
        ids.into_iter()
            .filter_map(|id| self.entities.get(&id).map(|e| (id, e)))
            .filter(|(_, e)| e.kind == kind && self.is_visible(e.pos.region))
            .map(|(id, e)| Self::snapshot(id, e))
            .collect()
    }

    fn closest_by_path(&self, from: Position, goals: &[Position]) -> Option<usize> {
        if goals.is_empty() {
            return None;
        }
        let hit = |p: Position| goals.iter().position(|g| g.range_to(p) <= ADJACENT_RANGE);
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(p) = queue.pop_front() {
            if let Some(i) = hit(p) {
                return Some(i);
            }
            for (_, n) in p.neighbors() {
                if n.region == from.region && self.walkable(n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        None
    }

    fn move_agent(&mut self, agent: AgentId, dir: Direction) -> ActionResult {
        let Some(body) = self.agents.get(&agent).filter(|b| b.owned) else {
            return ActionResult::NotOwner;
        };
        if body.spawning_left > 0 {
            return ActionResult::Busy;
        }
        if !self.walkable(body.pos.step(dir)) {
            return ActionResult::Blocked;
        }
        self.intents.insert(agent, dir);
        ActionResult::Ok
    }

    fn withdraw(&mut self, agent: AgentId, target: EntityId, resource: ResourceKind) -> ActionResult {
        if let Err(r) = self.check(agent, target, ADJACENT_RANGE) {
            return r;
        }
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        let withdrawable = matches!(
            e.kind,
            EntityKind::Container
                | EntityKind::Storage
                | EntityKind::Link
                | EntityKind::Spawn
                | EntityKind::Extension
                | EntityKind::Tower
                | EntityKind::Tombstone
                | EntityKind::Ruin
        );
        if !withdrawable {
            return ActionResult::InvalidTarget;
        }
        if e.store.get(resource) == 0 {
            return ActionResult::NotEnoughResources;
        }
        if body.store.free() == 0 {
            return ActionResult::Full;
        }
        let taken = e.store.remove(resource, body.store.free());
        body.store.add(resource, taken);
        ActionResult::Ok
    }

    fn pickup(&mut self, agent: AgentId, target: EntityId) -> ActionResult {
        if let Err(r) = self.check(agent, target, ADJACENT_RANGE) {
            return r;
        }
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if e.kind != EntityKind::DroppedResource {
            return ActionResult::InvalidTarget;
        }
        if body.store.free() == 0 {
            return ActionResult::Full;
        }
        let kinds: Vec<ResourceKind> = e.store.kinds().collect();
        for kind in kinds {
            let taken = e.store.remove(kind, body.store.free());
            body.store.add(kind, taken);
        }
        if e.store.is_empty() {
            self.remove_entity(target);
        }
        ActionResult::Ok
    }

    fn transfer(&mut self, agent: AgentId, target: EntityId, resource: ResourceKind) -> ActionResult {
        if let Err(r) = self.check(agent, target, ADJACENT_RANGE) {
            return r;
        }
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if !e.kind.accepts(resource) {
            return ActionResult::InvalidTarget;
        }
        if body.store.get(resource) == 0 {
            return ActionResult::NotEnoughResources;
        }
        if e.store.free() == 0 {
            return ActionResult::Full;
        }
        let given = body.store.remove(resource, e.store.free());
        e.store.add(resource, given);
        ActionResult::Ok
    }

    fn harvest(&mut self, agent: AgentId, target: EntityId) -> ActionResult {
        if let Err(r) = self.check(agent, target, ADJACENT_RANGE) {
            return r;
        }
        let rate = self.config.harvest_rate;
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if e.kind != EntityKind::Source {
            return ActionResult::InvalidTarget;
        }
        if e.store.get(ResourceKind::Energy) == 0 {
            return ActionResult::NotEnoughResources;
        }
        // Whatever does not fit in the harvester's store drops under it.
        let mined = e.store.remove(ResourceKind::Energy, rate);
        let spill = mined - body.store.add(ResourceKind::Energy, mined);
        let pos = body.pos;
        if spill > 0 && self.add_drop(pos, ResourceKind::Energy, spill).is_err() {
            trace!(%agent, %pos, spill, "spill lost");
        }
        ActionResult::Ok
    }

    fn build(&mut self, agent: AgentId, target: EntityId) -> ActionResult {
        if let Err(r) = self.check(agent, target, WORK_RANGE) {
            return r;
        }
        let rate = self.config.build_rate;
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if e.kind != EntityKind::ConstructionSite || !e.owned {
            return ActionResult::InvalidTarget;
        }
        let energy = body.store.get(ResourceKind::Energy);
        if energy == 0 {
            return ActionResult::NotEnoughResources;
        }
        let spent = rate.min(energy).min(e.progress_total.saturating_sub(e.progress));
        body.store.remove(ResourceKind::Energy, spent);
        e.progress += spent;
        if e.progress >= e.progress_total {
            if let Some(kind) = e.builds.take() {
                debug!(site = %target, %kind, pos = %e.pos, "construction finished");
                e.kind = kind;
                e.hits_max = default_hits(kind);
                e.hits = e.hits_max;
                e.store = Inventory::with_capacity(default_capacity(kind));
            }
        }
        ActionResult::Ok
    }

    fn repair(&mut self, agent: AgentId, target: EntityId) -> ActionResult {
        if let Err(r) = self.check(agent, target, WORK_RANGE) {
            return r;
        }
        let rate = self.config.repair_rate;
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if e.hits_max == 0 || e.hits >= e.hits_max {
            return ActionResult::InvalidTarget;
        }
        let energy = body.store.get(ResourceKind::Energy);
        if energy == 0 {
            return ActionResult::NotEnoughResources;
        }
        let needed = (e.hits_max - e.hits).div_ceil(REPAIR_HITS_PER_ENERGY);
        let spent = rate.min(energy).min(needed);
        body.store.remove(ResourceKind::Energy, spent);
        e.hits = (e.hits + spent * REPAIR_HITS_PER_ENERGY).min(e.hits_max);
        ActionResult::Ok
    }

    fn upgrade(&mut self, agent: AgentId, target: EntityId) -> ActionResult {
        if let Err(r) = self.check(agent, target, WORK_RANGE) {
            return r;
        }
        let rate = self.config.upgrade_rate;
        let Some((body, e)) = self.parts(agent, target) else { return ActionResult::InvalidTarget };
        if e.kind != EntityKind::Controller {
            return ActionResult::InvalidTarget;
        }
        if !e.owned {
            return ActionResult::NotOwner;
        }
        let energy = body.store.get(ResourceKind::Energy);
        if energy == 0 {
            return ActionResult::NotEnoughResources;
        }
        let spent = rate.min(energy);
        body.store.remove(ResourceKind::Energy, spent);
        e.progress += spent;
        ActionResult::Ok
    }

    fn say(&mut self, agent: AgentId, message: &str) {
        self.speech.push((self.tick, agent, message.to_owned()));
    }

    fn request_spawn(&mut self, order: &SpawnOrder) -> Option<AgentId> {
        let spawn = self
            .entities
            .iter()
            .find(|(id, e)| {
                e.kind == EntityKind::Spawn
                    && e.owned
                    && e.pos.region == order.home
                    && !self.spawns_used.contains(*id)
            })
            .map(|(&id, e)| (id, e.pos))?;

        let cost = self.config.spawn_cost;
        let is_bank = |e: &Entity| {
            e.owned && e.pos.region == order.home && matches!(e.kind, EntityKind::Spawn | EntityKind::Extension)
        };
        let available: u32 = self.entities.values().filter(|e| is_bank(*e)).map(|e| e.store.get(ResourceKind::Energy)).sum();
        if available < cost {
            trace!(home = %order.home, available, cost, "not enough energy to spawn");
            return None;
        }

        // Spawns are drained before extensions.
        let mut banks: Vec<(bool, EntityId)> =
            self.entities.iter().filter(|(_, e)| is_bank(*e)).map(|(&id, e)| (e.kind != EntityKind::Spawn, id)).collect();
        banks.sort_unstable();
        let mut owed = cost;
        for (_, id) in banks {
            if owed == 0 {
                break;
            }
            if let Some(e) = self.entities.get_mut(&id) {
                owed -= e.store.remove(ResourceKind::Energy, owed);
            }
        }

        let (spawn_id, spawn_pos) = spawn;
        self.spawns_used.insert(spawn_id);
        let id = AgentId(self.next_agent);
        self.next_agent += 1;
        self.agents.insert(id, Body {
            pos: spawn_pos,
            store: Inventory::with_capacity(self.config.agent_capacity),
            owned: true,
            spawning_left: self.config.spawn_ticks.max(1),
            name: order.name.clone(),
        });
        debug!(agent = %id, name = %order.name, home = %order.home, "spawn started");
        Some(id)
    }
}
