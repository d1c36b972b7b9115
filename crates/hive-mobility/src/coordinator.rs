//! Cached-path movement with shove resolution.
//!
//! # `move_towards`
//!
//! 1. An agent still spawning cannot move: `Busy`.
//! 2. Within `range` of the target: nothing to do, `Ok`.
//! 3. The cached plan is checked against the agent's actual position:
//!    - no plan, an exhausted plan, or a plan whose destination is no longer
//!      within `range` of the target (or in another region) → replan;
//!    - the agent stands on the plan's head → consume it;
//!    - the agent is one tile off the head (it was shoved) → keep the plan
//!      and retry the same step;
//!    - further off, or the stored path is corrupt → replan.
//! 4. If a step remains, move towards it.
//! 5. The plan and the target (as the shove anchor) are written back to the
//!    agent's memory whether or not a move was issued.
//!
//! # Shoving
//!
//! Every move goes through [`MovementCoordinator::step`], which records the
//! mover in the [`MoveRegistry`] and then looks at the tile it is entering.
//! An owned agent standing there that has not moved yet this tick is asked
//! to make way ([`MovementCoordinator::shove`]); because making way is itself
//! a `step`, a chain of blockers unwinds recursively.  The registry bounds the
//! recursion: an agent is never asked to move twice in one tick.

use tracing::{debug, trace};

use hive_agent::{AgentMemory, MovePlan};
use hive_core::{ActionResult, AgentId, Direction, Position};
use hive_spatial::{AStarSearch, BLOCKED, CostMatrixCache, GridSearch, PathFinder, SearchGoal, SerializedPath};
use hive_world::World;

use crate::{MobilityError, MobilityResult, MoveContext, MoveOptions, MoveRegistry};

/// Owns the per-tick movement state: the move registry and the cost-matrix
/// cache, plus the path finder used to replan.
///
/// # Type parameter
///
/// `S` is the grid search behind the path finder (default [`AStarSearch`]).
pub struct MovementCoordinator<S: GridSearch = AStarSearch> {
    finder:   PathFinder<S>,
    costs:    CostMatrixCache,
    registry: MoveRegistry,
}

impl Default for MovementCoordinator<AStarSearch> {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementCoordinator<AStarSearch> {
    pub fn new() -> Self {
        Self::with_search(AStarSearch)
    }
}

impl<S: GridSearch> MovementCoordinator<S> {
    pub fn with_search(search: S) -> Self {
        Self {
            finder:   PathFinder::with_search(search),
            costs:    CostMatrixCache::new(),
            registry: MoveRegistry::new(),
        }
    }

    /// The shared cost-matrix cache.
    #[inline]
    pub fn costs(&self) -> &CostMatrixCache {
        &self.costs
    }

    #[inline]
    pub fn registry(&self) -> &MoveRegistry {
        &self.registry
    }

    #[inline]
    pub fn finder(&self) -> &PathFinder<S> {
        &self.finder
    }

    /// `true` if `agent` has already moved during the world's current tick.
    pub fn has_moved<W: World + ?Sized>(&mut self, world: &W, agent: AgentId) -> bool {
        self.registry.has_moved(world.tick(), agent)
    }

    // ── move_towards ──────────────────────────────────────────────────────

    /// Advance `agent` one tile along a cached path towards `target`.
    ///
    /// `memory` is the agent's own record (taken out of the store by the
    /// caller).  Returns `NoPath` when the agent is out of range and no step
    /// can be taken this tick; otherwise the result of the move, or `Ok` if
    /// already in range.
    pub fn move_towards<W: World + ?Sized>(
        &mut self,
        ctx:    &mut MoveContext<'_, W>,
        agent:  AgentId,
        memory: &mut AgentMemory,
        target: Position,
        opts:   &MoveOptions,
    ) -> MobilityResult<ActionResult> {
        let body = ctx.world.agent(agent).ok_or(MobilityError::AgentNotFound(agent))?;
        if body.spawning {
            return Ok(ActionResult::Busy);
        }
        let pos = body.pos;

        let plan = if pos.in_range_to(target, opts.range) {
            MovePlan { dest: target, path: SerializedPath::empty() }
        } else {
            self.verify_plan(&*ctx.world, agent, pos, target, memory.move_plan.take(), opts)
        };

        let result = if pos.in_range_to(target, opts.range) {
            ActionResult::Ok
        } else {
            match plan.path.next_step(pos).ok().flatten().and_then(|next| pos.direction_to(next)) {
                Some(dir) => self.step(ctx, agent, dir),
                None => ActionResult::NoPath,
            }
        };

        memory.shove_anchor = Some(target);
        memory.move_plan = Some(plan);
        Ok(result)
    }

    /// Keep, advance, or replace the cached plan for an agent at `pos`.
    fn verify_plan<W: World + ?Sized>(
        &self,
        world:  &W,
        agent:  AgentId,
        pos:    Position,
        target: Position,
        cached: Option<MovePlan>,
        opts:   &MoveOptions,
    ) -> MovePlan {
        let Some(plan) = cached.filter(|p| !p.path.is_empty()) else {
            return self.replan(world, agent, pos, target, opts);
        };
        if plan.dest.range_to(target) > opts.range || plan.dest.region != target.region {
            trace!(%agent, dest = %plan.dest, %target, "target drifted");
            return self.replan(world, agent, pos, target, opts);
        }

        match plan.path.next_step(pos) {
            Ok(Some(next)) if next == pos => match plan.path.advance(pos) {
                // A path cut at an unseen region runs out before the target.
                Ok(path) if path.is_empty() => self.replan(world, agent, pos, target, opts),
                Ok(path) => MovePlan { dest: plan.dest, path },
                Err(e) => {
                    debug!(%agent, error = %e, "corrupt path");
                    self.replan(world, agent, pos, target, opts)
                }
            },
            // Shoved off the path since the last step: try the same step again.
            Ok(Some(next)) if pos.range_to(next) <= 1 => plan,
            Ok(Some(next)) => {
                debug!(%agent, %pos, expected = %next, "off path");
                self.replan(world, agent, pos, target, opts)
            }
            Ok(None) => self.replan(world, agent, pos, target, opts),
            Err(e) => {
                debug!(%agent, error = %e, "corrupt path");
                self.replan(world, agent, pos, target, opts)
            }
        }
    }

    fn replan<W: World + ?Sized>(
        &self,
        world:  &W,
        agent:  AgentId,
        from:   Position,
        target: Position,
        opts:   &MoveOptions,
    ) -> MovePlan {
        let goals = [SearchGoal { pos: target, range: opts.range }];
        let steps = self.finder.find_path(world, &self.costs, world.tick(), from, &goals, &opts.path);
        let path = if opts.stop_at_unknown {
            SerializedPath::encode_until(&steps, |r| world.is_visible(r))
        } else {
            SerializedPath::encode(&steps)
        };
        debug!(%agent, %from, %target, steps = steps.len(), path = %path, "replanned");
        MovePlan { dest: target, path }
    }

    // ── Single step and shove ─────────────────────────────────────────────

    /// Issue one move for `agent` and make way for it if an owned agent that
    /// has not moved yet stands on the tile it is entering.
    ///
    /// Returns the engine's result for the move itself.
    pub fn step<W: World + ?Sized>(
        &mut self,
        ctx:   &mut MoveContext<'_, W>,
        agent: AgentId,
        dir:   Direction,
    ) -> ActionResult {
        let now = ctx.world.tick();
        self.registry.record(now, agent);
        let result = ctx.world.move_agent(agent, dir);

        let Some(body) = ctx.world.agent(agent) else {
            return result;
        };
        let ahead = body.pos.step(dir);
        if result == ActionResult::Ok {
            self.registry.claim(now, ahead);
        }
        if let Some(blocker) = ctx.world.occupant(ahead).filter(|o| o.owned && o.id != agent) {
            if self.registry.has_moved(now, blocker.id) {
                trace!(%agent, blocker = %blocker.id, "blocker already moved");
            } else {
                let shoved = self.shove(ctx, blocker.id);
                trace!(%agent, blocker = %blocker.id, %shoved, "shove requested");
            }
        }
        result
    }

    /// Ask `agent` to step aside.
    ///
    /// Candidate tiles are the non-edge neighbours that are walkable and not
    /// blocked by a structure.  A tile is taken if an agent stands on it at
    /// the start of the tick or another move this tick already ends on it;
    /// taken tiles are considered only when no free one exists.  With a shove anchor the candidate closest to it
    /// wins (distances below 1 count as 1, first candidate on ties);
    /// without one a candidate is picked at random.
    ///
    /// Returns `Busy` if the agent already moved this tick, `Blocked` if it
    /// has nowhere to go, and otherwise the result of its move.
    pub fn shove<W: World + ?Sized>(&mut self, ctx: &mut MoveContext<'_, W>, agent: AgentId) -> ActionResult {
        let now = ctx.world.tick();
        if self.registry.has_moved(now, agent) {
            return ActionResult::Busy;
        }
        let Some(body) = ctx.world.agent(agent) else {
            return ActionResult::InvalidTarget;
        };

        let matrix = self.costs.get(&*ctx.world, body.pos.region, now);
        let mut candidates: Vec<(Direction, Position, bool)> = body
            .pos
            .neighbors()
            .filter(|(_, p)| !p.is_edge() && ctx.world.terrain(*p).is_walkable() && matrix.get(p.x, p.y) != BLOCKED)
            .map(|(d, p)| (d, p, ctx.world.occupant(p).is_some() || self.registry.is_claimed(now, p)))
            .collect();
        if candidates.is_empty() {
            debug!(%agent, pos = %body.pos, "nowhere to shove");
            return ActionResult::Blocked;
        }
        if candidates.iter().any(|&(_, _, occupied)| !occupied) {
            candidates.retain(|&(_, _, occupied)| !occupied);
        }

        let anchor = ctx.agents.get(agent).and_then(|m| m.shove_anchor);
        let chosen = match anchor {
            Some(anchor) => {
                let dist = |p: Position| p.range_to(anchor).max(1);
                candidates
                    .iter()
                    .copied()
                    .reduce(|best, c| if dist(c.1) < dist(best.1) { c } else { best })
            }
            None => ctx.rngs.get_mut(agent).choose(&candidates).copied(),
        };
        let Some((dir, to, _)) = chosen else {
            return ActionResult::Blocked;
        };

        debug!(%agent, from = %body.pos, %to, "shoved");
        self.step(ctx, agent, dir)
    }
}
