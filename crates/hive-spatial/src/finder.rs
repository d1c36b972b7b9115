//! Path finding with budget back-off.
//!
//! [`PathFinder::find_path`] runs the configured [`GridSearch`] with the base
//! expansion budget; an incomplete result is retried with the budget doubled,
//! up to `attempts` runs.  The outcome is never an error:
//!
//! - a complete path is returned as soon as one is found;
//! - otherwise the last run's partial path, if it moves the agent at all;
//! - otherwise an empty path, meaning "cannot reach the goal right now".

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use hive_core::{Position, RegionId, Tick};

use crate::cost::{CostMatrix, CostMatrixCache};
use crate::search::{AStarSearch, CostField, GridSearch, SearchGoal, SearchLimits};
use crate::view::RegionView;

// ── PathOptions ───────────────────────────────────────────────────────────────

/// Search configuration for one `find_path` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathOptions {
    /// Cap on distinct regions a path may touch.
    pub max_regions:   u32,
    /// Cost of stepping onto plain terrain.
    pub plain_cost:    u8,
    /// Cost of stepping onto swamp terrain.
    pub swamp_cost:    u8,
    /// Expansion budget for the first attempt.
    pub search_budget: u32,
    /// Number of attempts; each retry doubles the budget.
    pub attempts:      u32,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            max_regions:   6,
            plain_cost:    2,
            swamp_cost:    10,
            search_budget: 2000,
            attempts:      2,
        }
    }
}

impl PathOptions {
    /// Budget for the 1-based `attempt`.
    pub fn budget_for(&self, attempt: u32) -> u32 {
        let shift = attempt.saturating_sub(1).min(16);
        self.search_budget.saturating_mul(1 << shift)
    }
}

// ── Cost field over the oracle ────────────────────────────────────────────────

/// Terrain + cached cost matrices for one tick.  Looks each region's matrix
/// up once per search.
struct OracleField<'a, V: ?Sized> {
    view:     &'a V,
    cache:    &'a CostMatrixCache,
    tick:     Tick,
    opts:     PathOptions,
    matrices: HashMap<RegionId, Option<Arc<CostMatrix>>>,
}

impl<V: RegionView + ?Sized> CostField for OracleField<'_, V> {
    fn step_cost(&mut self, pos: Position) -> Option<u32> {
        let (view, cache, tick) = (self.view, self.cache, self.tick);
        let matrix = self
            .matrices
            .entry(pos.region)
            .or_insert_with(|| view.region_exists(pos.region).then(|| cache.get(view, pos.region, tick)))
            .as_ref()?;
        matrix.step_cost(pos, view.terrain(pos), self.opts.plain_cost, self.opts.swamp_cost)
    }
}

// ── PathFinder ────────────────────────────────────────────────────────────────

/// Path finder over a pluggable grid search.
#[derive(Clone, Debug, Default)]
pub struct PathFinder<S: GridSearch = AStarSearch> {
    search: S,
}

impl PathFinder<AStarSearch> {
    pub fn new() -> Self {
        Self { search: AStarSearch }
    }
}

impl<S: GridSearch> PathFinder<S> {
    pub fn with_search(search: S) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    /// Find a path from `start` to any of `goals`.
    ///
    /// The returned positions exclude `start`.  An empty result means the
    /// goal is unreachable this tick (or `start` already satisfies a goal).
    pub fn find_path<V: RegionView + ?Sized>(
        &self,
        view: &V,
        cache: &CostMatrixCache,
        tick: Tick,
        start: Position,
        goals: &[SearchGoal],
        opts: &PathOptions,
    ) -> Vec<Position> {
        let mut field = OracleField { view, cache, tick, opts: *opts, matrices: HashMap::new() };
        let mut last = Vec::new();

        for attempt in 1..=opts.attempts.max(1) {
            let limits = SearchLimits { budget: opts.budget_for(attempt), max_regions: opts.max_regions };
            let outcome = self.search.search(start, goals, limits, &mut field);
            if !outcome.incomplete {
                return outcome.path;
            }
            debug!(%start, attempt, budget = limits.budget, ops = outcome.ops, "search incomplete");
            last = outcome.path;
        }

        if last.is_empty() {
            debug!(%start, "no path");
        }
        last
    }
}
