//! Read-only view of region terrain and structures.
//!
//! This is the slice of the simulation engine the path finder needs.  The
//! full engine interface (`hive_world::World`) extends it.

use hive_core::{EntityKind, Position, RegionId, Terrain};

/// One structure as reported by the engine: where it stands, what it is, and
/// whether the controlling player owns it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StructureTile {
    pub pos:   Position,
    pub kind:  EntityKind,
    pub owned: bool,
}

/// Terrain and structure queries for path finding.
pub trait RegionView {
    /// `true` if the region exists on the map at all.  Searches never expand
    /// into regions that do not.
    fn region_exists(&self, region: RegionId) -> bool;

    /// `true` if the controller currently has vision in `region`, so its
    /// structure list is current.
    fn is_visible(&self, region: RegionId) -> bool;

    /// Static terrain of a tile.  Known for every existing region, visible
    /// or not.
    fn terrain(&self, pos: Position) -> Terrain;

    /// Every fixture standing in `region`.  Empty when the region is not
    /// visible.
    fn structures(&self, region: RegionId) -> Vec<StructureTile>;
}
