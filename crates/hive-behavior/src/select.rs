//! Target selection queries.
//!
//! Every function here is a pure read of the [`World`]: it returns the
//! chosen snapshot and leaves persisting it to the caller.

use hive_agent::TargetKind;
use hive_core::{EntityId, EntityKind, Position, RegionId, ResourceKind};
use hive_world::{EntitySnapshot, World};

/// Structures a repairer may work on.
pub const REPAIRABLE: [EntityKind; 9] = [
    EntityKind::Spawn,
    EntityKind::Extension,
    EntityKind::Tower,
    EntityKind::Container,
    EntityKind::Storage,
    EntityKind::Link,
    EntityKind::Road,
    EntityKind::Wall,
    EntityKind::Rampart,
];

/// `true` if energy can be taken from `e` right now.
#[inline]
pub fn has_energy(e: &EntitySnapshot) -> bool {
    e.energy() > 0
}

/// Nearest of `candidates` to `from`, by path or by straight range.
pub fn closest<W: World + ?Sized>(
    world:      &W,
    from:       Position,
    candidates: Vec<EntitySnapshot>,
    by_range:   bool,
) -> Option<EntitySnapshot> {
    let goals: Vec<Position> = candidates.iter().map(|e| e.pos).collect();
    let pick = if by_range { world.closest_by_range(from, &goals) } else { world.closest_by_path(from, &goals) };
    pick.and_then(|i| candidates.into_iter().nth(i))
}

/// Walk `priority` in order and return the nearest energy-holding candidate
/// of the first kind that has a reachable one.
pub fn collect_target<W: World + ?Sized>(
    world:    &W,
    from:     Position,
    region:   RegionId,
    priority: &[TargetKind],
) -> Option<EntitySnapshot> {
    priority.iter().find_map(|&kind| {
        let candidates: Vec<EntitySnapshot> = kind
            .entity_kinds()
            .iter()
            .flat_map(|&k| world.entities_in(region, k))
            .filter(has_energy)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        closest(world, from, candidates, kind.by_range())
    })
}

/// Dropped piles and tombstones in `region` holding anything but energy.
fn misc_candidates<W: World + ?Sized>(world: &W, region: RegionId) -> Vec<EntitySnapshot> {
    [EntityKind::DroppedResource, EntityKind::Tombstone]
        .into_iter()
        .flat_map(|k| world.entities_in(region, k))
        .filter(|e| e.store.has_misc())
        .collect()
}

/// `true` if non-energy resources are lying around in `region`.
pub fn misc_lying_around<W: World + ?Sized>(world: &W, region: RegionId) -> bool {
    !misc_candidates(world, region).is_empty()
}

/// Nearest pile or tombstone holding non-energy resources.
pub fn misc_target<W: World + ?Sized>(world: &W, from: Position, region: RegionId) -> Option<EntitySnapshot> {
    closest(world, from, misc_candidates(world, region), false)
}

/// The first non-energy resource in `e`'s store.
pub fn first_misc(e: &EntitySnapshot) -> Option<ResourceKind> {
    e.store.kinds().find(|k| !k.is_energy())
}

/// First sink kind (in order) with an owned member that has room for one of
/// `held`; returns the nearest such sink and the resource to hand over.
pub fn deliver_sink<W: World + ?Sized>(
    world:  &W,
    from:   Position,
    region: RegionId,
    sinks:  &[EntityKind],
    held:   &[ResourceKind],
) -> Option<(EntitySnapshot, ResourceKind)> {
    let fits = |e: &EntitySnapshot| held.iter().copied().find(|&r| e.free_for(r) > 0);
    sinks.iter().find_map(|&kind| {
        let candidates: Vec<EntitySnapshot> = world
            .entities_in(region, kind)
            .into_iter()
            .filter(|e| e.owned && fits(e).is_some())
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let sink = closest(world, from, candidates, false)?;
        let resource = fits(&sink)?;
        Some((sink, resource))
    })
}

/// `true` if `e` is a spawn or extension that still takes energy.
pub fn needs_energy(e: &EntitySnapshot) -> bool {
    matches!(e.kind, EntityKind::Spawn | EntityKind::Extension) && e.owned && e.free_for(ResourceKind::Energy) > 0
}

/// Nearest (by range) spawn or extension that still takes energy.
pub fn nurse_target<W: World + ?Sized>(world: &W, from: Position, region: RegionId) -> Option<EntitySnapshot> {
    let candidates: Vec<EntitySnapshot> = [EntityKind::Spawn, EntityKind::Extension]
        .into_iter()
        .flat_map(|k| world.entities_in(region, k))
        .filter(needs_energy)
        .collect();
    closest(world, from, candidates, true)
}

/// Nearest owned construction site.
pub fn build_target<W: World + ?Sized>(world: &W, from: Position, region: RegionId) -> Option<EntitySnapshot> {
    let sites: Vec<EntitySnapshot> =
        world.entities_in(region, EntityKind::ConstructionSite).into_iter().filter(|e| e.owned).collect();
    closest(world, from, sites, false)
}

/// `true` if `region` has an owned construction site.
pub fn has_construction<W: World + ?Sized>(world: &W, region: RegionId) -> bool {
    world.entities_in(region, EntityKind::ConstructionSite).iter().any(|e| e.owned)
}

/// `true` if `e` is worth repairing under `ceiling`.
pub fn repairable(e: &EntitySnapshot, ceiling: u32) -> bool {
    e.is_damaged() && e.hits <= ceiling
}

/// The damaged structure with the lowest health fraction that nobody else
/// is repairing.  Ties go to the lower id.
pub fn repair_target<W: World + ?Sized>(
    world:   &W,
    region:  RegionId,
    ceiling: u32,
    taken:   impl Fn(EntityId) -> bool,
) -> Option<EntitySnapshot> {
    REPAIRABLE
        .into_iter()
        .flat_map(|k| world.entities_in(region, k))
        .filter(|e| repairable(e, ceiling) && !taken(e.id))
        .min_by(|a, b| a.health_fraction().total_cmp(&b.health_fraction()).then(a.id.cmp(&b.id)))
}

/// The first source in `region` that `claimed` does not report as taken.
pub fn unclaimed_source<W: World + ?Sized>(
    world:   &W,
    region:  RegionId,
    claimed: impl Fn(EntityId) -> bool,
) -> Option<EntitySnapshot> {
    world.entities_in(region, EntityKind::Source).into_iter().find(|s| !claimed(s.id))
}

/// The owned controller in `region`.
pub fn controller<W: World + ?Sized>(world: &W, region: RegionId) -> Option<EntitySnapshot> {
    world.entities_in(region, EntityKind::Controller).into_iter().find(|c| c.owned)
}

/// Energy piles within `range` of `pos`.
pub fn energy_drops_near<W: World + ?Sized>(world: &W, pos: Position, range: u32) -> Option<EntitySnapshot> {
    world.entities_near(pos, range, EntityKind::DroppedResource).into_iter().find(has_energy)
}
