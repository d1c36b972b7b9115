//! A home region with a little of everything the roles touch, and an
//! unseen outpost to the east.

use hive_core::{EntityKind, Position, RegionId, ResourceKind, Terrain};
use hive_world::{LocalWorld, LocalWorldConfig, WorldResult};

pub const HOME: RegionId = RegionId { x: 0, y: 0 };
pub const OUTPOST: RegionId = RegionId { x: 1, y: 0 };

#[inline]
pub fn at(x: u8, y: u8) -> Position {
    Position::new(HOME, x, y)
}

/// Build the demo world: two sources, a stocked spawn, a controller, a
/// container, a half-broken road, a construction site, and a swampy ridge
/// with a wall through it.  The outpost holds one source and an unowned
/// controller and starts out of sight.
pub fn build_world() -> WorldResult<LocalWorld> {
    let mut w = LocalWorld::new(LocalWorldConfig::default());
    w.add_region(HOME)?;
    w.add_region(OUTPOST)?;
    w.set_visible(OUTPOST, false)?;
    w.add_source(Position::new(OUTPOST, 20, 30))?;
    w.add_controller(Position::new(OUTPOST, 30, 15), false)?;

    for y in 10..40 {
        w.set_terrain(at(20, y), if y == 25 { Terrain::Plain } else { Terrain::Wall })?;
        w.set_terrain(at(21, y), Terrain::Swamp)?;
    }

    w.add_source(at(8, 12))?;
    w.add_source(at(10, 38))?;

    let spawn = w.add_structure(EntityKind::Spawn, at(30, 25), true)?;
    w.fill(spawn, ResourceKind::Energy, 300)?;
    w.add_structure(EntityKind::Extension, at(31, 26), true)?;
    w.add_controller(at(40, 10), true)?;
    w.add_structure(EntityKind::Container, at(12, 25), true)?;

    for x in 22..30 {
        let road = w.add_structure(EntityKind::Road, at(x, 25), true)?;
        if x % 3 == 0 {
            w.set_hits(road, 500)?;
        }
    }
    w.add_site(at(35, 30), EntityKind::Extension, 300)?;
    Ok(w)
}
