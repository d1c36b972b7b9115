//! Per-region traversal-cost matrices and their per-tick cache.
//!
//! # Cost model
//!
//! A matrix entry of `0` means "no override, use the terrain cost".  The
//! matrix only records what structures do to a tile:
//!
//! | Structure                                 | Entry                 |
//! |-------------------------------------------|-----------------------|
//! | road                                      | `ROAD_COST` (1)       |
//! | container, owned rampart                  | untouched             |
//! | anything else that occupies a tile        | `BLOCKED` (255)       |
//!
//! # Caching
//!
//! A matrix is built at most once per `(region, tick)`.  Each region has its
//! own slot guarded by its own mutex, so regions can be built concurrently
//! (see `prewarm`, feature `parallel`) while two requests for the same region
//! in the same tick still share one build.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::trace;

use hive_core::{EntityKind, Position, REGION_SIZE, RegionId, Terrain, Tick};

use crate::view::RegionView;

/// Entry for roads.
pub const ROAD_COST: u8 = 1;
/// Entry for impassable tiles.
pub const BLOCKED: u8 = u8::MAX;

const TILES: usize = REGION_SIZE as usize * REGION_SIZE as usize;

// ── CostMatrix ────────────────────────────────────────────────────────────────

/// Dense 50×50 cost overrides for one region.
#[derive(Clone, PartialEq, Eq)]
pub struct CostMatrix {
    costs: Box<[u8]>,
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self { costs: vec![0; TILES].into_boxed_slice() }
    }
}

impl std::fmt::Debug for CostMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set = self.costs.iter().filter(|&&c| c != 0).count();
        f.debug_struct("CostMatrix").field("overrides", &set).finish()
    }
}

impl CostMatrix {
    #[inline]
    fn idx(x: u8, y: u8) -> usize {
        y as usize * REGION_SIZE as usize + x as usize
    }

    /// Override entry at local `(x, y)`; `0` means none.
    #[inline]
    pub fn get(&self, x: u8, y: u8) -> u8 {
        self.costs[Self::idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: u8, y: u8, cost: u8) {
        self.costs[Self::idx(x, y)] = cost;
    }

    /// Build the matrix for `region` from the structures `view` reports.
    ///
    /// An invisible region yields an all-default matrix.
    pub fn build<V: RegionView + ?Sized>(view: &V, region: RegionId) -> Self {
        let mut m = CostMatrix::default();
        for s in view.structures(region) {
            if s.pos.region != region {
                continue;
            }
            match s.kind {
                EntityKind::Road => {
                    // A blocker sharing the tile wins over the road.
                    if m.get(s.pos.x, s.pos.y) != BLOCKED {
                        m.set(s.pos.x, s.pos.y, ROAD_COST);
                    }
                }
                kind if kind.blocks_movement(s.owned) => m.set(s.pos.x, s.pos.y, BLOCKED),
                _ => {}
            }
        }
        m
    }

    /// Cost of stepping onto `pos` given this matrix and terrain weights, or
    /// `None` if the tile cannot be entered.
    pub fn step_cost(&self, pos: Position, terrain: Terrain, plain: u8, swamp: u8) -> Option<u32> {
        match self.get(pos.x, pos.y) {
            BLOCKED => None,
            0 => match terrain {
                Terrain::Plain => Some(plain as u32),
                Terrain::Swamp => Some(swamp as u32),
                Terrain::Wall  => None,
            },
            c => (terrain != Terrain::Wall).then_some(c as u32),
        }
    }
}

// ── CostMatrixCache ───────────────────────────────────────────────────────────

#[derive(Default)]
struct Slot {
    built: Option<(Tick, Arc<CostMatrix>)>,
}

/// The grid cost oracle: one cached matrix per region, valid for one tick.
#[derive(Default)]
pub struct CostMatrixCache {
    slots:  RwLock<HashMap<RegionId, Arc<Mutex<Slot>>>>,
    builds: AtomicU64,
}

impl CostMatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cost matrix for `region` at `tick`, building it if this is the
    /// first request for that pair.  Repeated calls within a tick return the
    /// same `Arc`.
    pub fn get<V: RegionView + ?Sized>(&self, view: &V, region: RegionId, tick: Tick) -> Arc<CostMatrix> {
        let slot = self.slot(region);
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((built_at, m)) = &slot.built {
            if *built_at == tick {
                return Arc::clone(m);
            }
        }
        let m = Arc::new(CostMatrix::build(view, region));
        self.builds.fetch_add(1, Ordering::Relaxed);
        trace!(%region, %tick, "cost matrix built");
        slot.built = Some((tick, Arc::clone(&m)));
        m
    }

    /// Build matrices for every region in `regions` in parallel.
    #[cfg(feature = "parallel")]
    pub fn prewarm<V: RegionView + Sync + ?Sized>(&self, view: &V, regions: &[RegionId], tick: Tick) {
        use rayon::prelude::*;
        regions.par_iter().for_each(|&r| {
            self.get(view, r, tick);
        });
    }

    /// Total matrices built since creation.
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    /// Forget every cached matrix.
    pub fn clear(&self) {
        self.slots.write().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn slot(&self, region: RegionId) -> Arc<Mutex<Slot>> {
        if let Some(s) = self.slots.read().unwrap_or_else(PoisonError::into_inner).get(&region) {
            return Arc::clone(s);
        }
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(region).or_default())
    }
}
