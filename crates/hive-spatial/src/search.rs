//! Grid search trait and the default A* implementation.
//!
//! # Pluggability
//!
//! [`PathFinder`](crate::PathFinder) drives the search through the
//! [`GridSearch`] trait, so tests can substitute a scripted search and an
//! engine with a native path finder can wrap it instead of [`AStarSearch`].
//!
//! # Cost units
//!
//! Step costs are small integers (road 1, plain 2, swamp 10 by default).  The
//! heuristic is the Chebyshev distance to the nearest goal's acceptance ring,
//! which never overestimates because no step costs less than 1.

use std::cmp::Reverse;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use hive_core::{Position, RegionId};

// ── Inputs & outputs ──────────────────────────────────────────────────────────

/// Accept any tile within `range` of `pos`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchGoal {
    pub pos:   Position,
    pub range: u32,
}

impl SearchGoal {
    pub fn new(pos: Position, range: u32) -> Self {
        Self { pos, range }
    }

    #[inline]
    fn gap(&self, p: Position) -> u32 {
        p.range_to(self.pos).saturating_sub(self.range)
    }
}

/// Limits for one search run.
#[derive(Copy, Clone, Debug)]
pub struct SearchLimits {
    /// Maximum node expansions before giving up.
    pub budget:      u32,
    /// Maximum number of distinct regions the path may touch, including the
    /// start region.
    pub max_regions: u32,
}

/// Tile costs as seen by a search.
pub trait CostField {
    /// Cost of stepping onto `pos`, or `None` if it cannot be entered
    /// (impassable tile, or a region the search may not use).
    fn step_cost(&mut self, pos: Position) -> Option<u32>;
}

/// Result of one search run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Tiles to step onto in order, excluding the start.  When `incomplete`
    /// this leads to the node that got closest to a goal.
    pub path:       Vec<Position>,
    /// `true` if no goal was reached.
    pub incomplete: bool,
    /// Nodes expanded.
    pub ops:        u32,
    /// Total step cost of `path`.
    pub cost:       u32,
}

/// Pluggable best-first grid search.
pub trait GridSearch: Send + Sync {
    fn search(
        &self,
        start: Position,
        goals: &[SearchGoal],
        limits: SearchLimits,
        costs: &mut dyn CostField,
    ) -> SearchOutcome;
}

// ── AStarSearch ───────────────────────────────────────────────────────────────

/// A* over world coordinates with 8-way movement.
///
/// Ties on `f` are broken by lower heuristic, then by world coordinate, so
/// the same inputs always give the same path.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarSearch;

#[derive(Copy, Clone)]
struct Node {
    g:      u32,
    parent: Option<(i32, i32)>,
}

impl GridSearch for AStarSearch {
    fn search(
        &self,
        start: Position,
        goals: &[SearchGoal],
        limits: SearchLimits,
        costs: &mut dyn CostField,
    ) -> SearchOutcome {
        if goals.is_empty() {
            return SearchOutcome { incomplete: true, ..SearchOutcome::default() };
        }
        let h = |p: Position| goals.iter().map(|g| g.gap(p)).min().unwrap_or(0);

        let key = |p: Position| (p.world_x(), p.world_y());
        let start_key = key(start);

        let mut nodes: HashMap<(i32, i32), Node> = HashMap::new();
        let mut closed: HashSet<(i32, i32)> = HashSet::new();
        let mut regions: HashSet<RegionId> = HashSet::from([start.region]);
        let mut open: BinaryHeap<Reverse<(u32, u32, (i32, i32))>> = BinaryHeap::new();

        nodes.insert(start_key, Node { g: 0, parent: None });
        open.push(Reverse((h(start), h(start), start_key)));

        // Closest node seen so far: (heuristic, g, key).
        let mut best = (h(start), 0u32, start_key);
        let mut ops = 0u32;

        while let Some(Reverse((_, hc, cur))) = open.pop() {
            if !closed.insert(cur) {
                continue;
            }
            let g = nodes[&cur].g;
            if hc == 0 {
                return finish(&nodes, cur, ops, false);
            }
            if (hc, g) < (best.0, best.1) {
                best = (hc, g, cur);
            }
            if ops >= limits.budget {
                break;
            }
            ops += 1;

            let here = Position::from_world(cur.0, cur.1);
            for (_, next) in here.neighbors() {
                let nk = key(next);
                if closed.contains(&nk) {
                    continue;
                }
                if !regions.contains(&next.region) && regions.len() as u32 >= limits.max_regions {
                    continue;
                }
                let Some(step) = costs.step_cost(next) else { continue };
                let ng = g + step;
                match nodes.entry(nk) {
                    Entry::Occupied(e) if e.get().g <= ng => continue,
                    Entry::Occupied(mut e) => {
                        e.insert(Node { g: ng, parent: Some(cur) });
                    }
                    Entry::Vacant(e) => {
                        e.insert(Node { g: ng, parent: Some(cur) });
                    }
                }
                regions.insert(next.region);
                let nh = h(next);
                open.push(Reverse((ng + nh, nh, nk)));
            }
        }

        finish(&nodes, best.2, ops, true)
    }
}

fn finish(nodes: &HashMap<(i32, i32), Node>, end: (i32, i32), ops: u32, incomplete: bool) -> SearchOutcome {
    let cost = nodes.get(&end).map_or(0, |n| n.g);
    let mut path = Vec::new();
    let mut cur = end;
    while let Some(parent) = nodes.get(&cur).and_then(|n| n.parent) {
        path.push(Position::from_world(cur.0, cur.1));
        cur = parent;
    }
    path.reverse();
    SearchOutcome { path, incomplete, ops, cost }
}
