//! The per-agent state-machine driver.
//!
//! # One evaluation
//!
//! 1. Agents still spawning are skipped (`Busy`).
//! 2. The next [`Status`] is derived from the role's [`Transition`] rule and
//!    the agent's store.  A change of status drops the current target and
//!    announces the new status once through [`World::say`].
//! 3. The status handler runs: it re-validates or selects a target, tries
//!    the interaction, and moves towards the target on `NotInRange`.  Any
//!    other failure clears the target so it is reselected next tick.
//!
//! An invalid target is cleared and nothing else happens that tick:
//! selection waits for the next one.
//!
//! A scout arriving in a region it set out for surveys it; the survey comes
//! back on the [`Evaluation`] for the caller to keep.

use tracing::{debug, trace};

use hive_agent::{AgentMemory, ControllerReport, RegionReport, Role, Status, TargetRef};
use hive_core::{ActionResult, AgentId, EntityId, EntityKind, Position, REGION_SIZE, RegionId, ResourceKind};
use hive_mobility::{MoveContext, MoveOptions, MovementCoordinator};
use hive_spatial::GridSearch;
use hive_world::{ADJACENT_RANGE, AgentView, EntitySnapshot, WORK_RANGE, World};

use crate::config::{Gather, RoleConfig, RoleTable, Scope, Transition, Work};
use crate::select;
use crate::{BehaviorError, BehaviorResult};

/// Range to a region's centre that puts an agent inside the region.
const TRAVEL_RANGE: u32 = (REGION_SIZE / 2 - 2) as u32;

/// Source-drop haulers wait this close to their source.
const DROP_RANGE: u32 = 3;

/// What one evaluation did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub from:   Option<Status>,
    pub to:     Option<Status>,
    /// Result of the interaction or move attempted, if any.
    pub result: Option<ActionResult>,
    /// Survey of the region a scout just reached.
    pub report: Option<RegionReport>,
}

impl Evaluation {
    #[inline]
    pub fn transitioned(&self) -> bool {
        self.from != self.to
    }
}

/// Runs each role's state machine from a [`RoleTable`].
#[derive(Clone, Debug, Default)]
pub struct TaskAssignor {
    roles:     RoleTable,
    move_opts: MoveOptions,
}

impl TaskAssignor {
    pub fn new(roles: RoleTable, move_opts: MoveOptions) -> Self {
        Self { roles, move_opts }
    }

    #[inline]
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    #[inline]
    pub fn move_options(&self) -> &MoveOptions {
        &self.move_opts
    }

    /// Evaluate `agent` once.  `memory` is its record, taken out of the
    /// store by the caller.
    pub fn evaluate<W: World + ?Sized, S: GridSearch>(
        &self,
        ctx:    &mut MoveContext<'_, W>,
        mover:  &mut MovementCoordinator<S>,
        agent:  AgentId,
        memory: &mut AgentMemory,
    ) -> BehaviorResult<Evaluation> {
        let body = ctx.world.agent(agent).ok_or(BehaviorError::AgentNotFound(agent))?;
        let cfg = self.roles.get(memory.role).ok_or(BehaviorError::UnconfiguredRole(memory.role))?;
        let from = memory.status;
        if body.spawning {
            return Ok(Evaluation { from, to: from, result: Some(ActionResult::Busy), report: None });
        }

        let mut turn = Turn { ctx, mover, agent, body, memory, cfg, opts: self.move_opts, report: None };
        let next = turn.next_status();
        if from != Some(next) {
            debug!(%agent, role = %turn.memory.role, from = ?from, to = ?next, "status change");
            turn.memory.clear_target();
            turn.memory.status = Some(next);
            turn.ctx.world.say(agent, next.label());
        }

        let result = turn.run(next)?;
        Ok(Evaluation { from, to: Some(next), result, report: turn.report.take() })
    }
}

// ── Turn ──────────────────────────────────────────────────────────────────────

/// One agent's evaluation in progress.
struct Turn<'t, 'a, W: ?Sized, S: GridSearch> {
    ctx:    &'t mut MoveContext<'a, W>,
    mover:  &'t mut MovementCoordinator<S>,
    agent:  AgentId,
    body:   AgentView,
    memory: &'t mut AgentMemory,
    cfg:    &'t RoleConfig,
    opts:   MoveOptions,
    report: Option<RegionReport>,
}

type Step = BehaviorResult<Option<ActionResult>>;

impl<W: World + ?Sized, S: GridSearch> Turn<'_, '_, W, S> {
    #[inline]
    fn world(&self) -> &W {
        &*self.ctx.world
    }

    #[inline]
    fn region(&self) -> RegionId {
        self.body.pos.region
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn next_status(&self) -> Status {
        let store = &self.body.store;
        let working = self.memory.status.is_some_and(Status::is_work);
        match self.cfg.transition {
            Transition::Static if self.cfg.gather == Gather::Explore => Status::Scout,
            Transition::Static => Status::Harvest,
            _ if self.cfg.picks_misc && !store.is_full() && select::misc_lying_around(self.world(), self.region()) => {
                Status::Pick
            }
            _ if self.cfg.work.is_none() => Status::Collect,
            Transition::WhileCarrying if store.is_empty() => Status::Collect,
            Transition::WhileCarrying => self.work_status(),
            Transition::Hysteresis if store.is_full() => self.work_status(),
            Transition::Hysteresis if store.is_empty() || !working => Status::Collect,
            Transition::Hysteresis => self.work_status(),
        }
    }

    /// The working status this role's `work` maps to right now.
    fn work_status(&self) -> Status {
        match &self.cfg.work {
            Some(Work::Deliver { .. }) => Status::Deliver,
            Some(Work::BuildOrUpgrade) if select::has_construction(self.world(), self.region()) => Status::Build,
            Some(Work::BuildOrUpgrade | Work::Upgrade) => Status::Upgrade,
            Some(Work::Repair { .. }) => Status::Repair,
            Some(Work::Nurse) => Status::Nurse,
            None => Status::Collect,
        }
    }

    fn run(&mut self, status: Status) -> Step {
        let cfg = self.cfg;
        match status {
            Status::Collect | Status::Harvest => match cfg.gather {
                Gather::Priority(scope) => self.collect(scope),
                Gather::SourceDrops => self.collect_drops(),
                Gather::Mine => self.mine(),
                Gather::Explore => self.explore(),
            },
            Status::Scout => self.explore(),
            Status::Pick => self.pick(),
            Status::Deliver => match &cfg.work {
                Some(Work::Deliver { sinks, at_home }) => self.deliver(sinks, *at_home),
                _ => Ok(None),
            },
            Status::Build => self.build(),
            Status::Upgrade => self.upgrade(),
            Status::Repair => match &cfg.work {
                Some(Work::Repair { ceiling }) => self.repair(*ceiling),
                _ => Ok(None),
            },
            Status::Nurse => self.nurse(),
        }
    }

    // ── Shared plumbing ───────────────────────────────────────────────────

    fn go(&mut self, pos: Position, range: u32) -> Step {
        let opts = MoveOptions { range, ..self.opts };
        let result = self.mover.move_towards(&mut *self.ctx, self.agent, &mut *self.memory, pos, &opts)?;
        Ok(Some(result))
    }

    /// Travel into `region` if not already there.
    fn enter(&mut self, region: RegionId) -> Option<Step> {
        (self.region() != region).then(|| self.go(region.center(), TRAVEL_RANGE))
    }

    /// Move on `NotInRange`; drop the target on any other failure.
    fn settle(&mut self, result: ActionResult, pos: Position, range: u32) -> Step {
        match result {
            ActionResult::NotInRange => self.go(pos, range),
            ActionResult::Ok => Ok(Some(result)),
            other => {
                trace!(agent = %self.agent, result = %other, "target no longer viable");
                self.memory.clear_target();
                Ok(Some(other))
            }
        }
    }

    /// The persisted target if `valid` still holds for it.  `Err` means it
    /// was invalid and has been cleared.
    fn current_target(&mut self, valid: impl Fn(&EntitySnapshot) -> bool) -> Result<Option<EntitySnapshot>, ()> {
        let Some(target) = self.memory.target else {
            return Ok(None);
        };
        match self.world().entity(target.id).filter(|e| e.kind == target.kind && valid(e)) {
            Some(e) => Ok(Some(e)),
            None => {
                debug!(agent = %self.agent, target = %target.id, kind = %target.kind, "target invalid");
                self.memory.clear_target();
                Err(())
            }
        }
    }

    fn remember(&mut self, e: &EntitySnapshot) {
        self.memory.target = Some(TargetRef { id: e.id, kind: e.kind });
    }

    /// Take `resource` out of `e` with the interaction its kind calls for.
    fn take_from(&mut self, e: &EntitySnapshot, resource: ResourceKind) -> ActionResult {
        match e.kind {
            EntityKind::DroppedResource => self.ctx.world.pickup(self.agent, e.id),
            EntityKind::Source => self.ctx.world.harvest(self.agent, e.id),
            _ => self.ctx.world.withdraw(self.agent, e.id, resource),
        }
    }

    /// Region whose sources this agent works: its remote one if it has one,
    /// otherwise home.
    fn source_region(&self) -> RegionId {
        self.memory.remote.unwrap_or(self.memory.home)
    }

    /// Reserve a source for this agent: the one it holds, or the first in
    /// `region` no other agent of its role holds.
    fn reserved_source(&mut self, region: RegionId) -> Option<EntityId> {
        if let Some(id) = self.memory.source {
            return Some(id);
        }
        let (agent, role) = (self.agent, self.memory.role);
        let agents = self.ctx.agents;
        let claimed = |id: EntityId| agents.any_other(agent, role, |m| m.source == Some(id));
        let source = select::unclaimed_source(self.world(), region, claimed)?;
        debug!(%agent, %role, %region, source = %source.id, "source reserved");
        self.memory.source = Some(source.id);
        Some(source.id)
    }

    // ── Gathering ─────────────────────────────────────────────────────────

    fn collect(&mut self, scope: Scope) -> Step {
        let region = match scope {
            Scope::Current => self.region(),
            Scope::Remote => match self.memory.remote {
                Some(remote) => remote,
                None => return Ok(None),
            },
        };
        if let Some(step) = self.enter(region) {
            return step;
        }

        let target = match self.current_target(select::has_energy) {
            Err(()) => return Ok(Some(ActionResult::InvalidTarget)),
            Ok(Some(t)) => t,
            Ok(None) => {
                let priority = if self.memory.priority.is_empty() {
                    self.cfg.priority_or_default().to_vec()
                } else {
                    self.memory.priority.clone()
                };
                let Some(t) = select::collect_target(self.world(), self.body.pos, region, &priority) else {
                    return Ok(None);
                };
                trace!(agent = %self.agent, target = %t.id, kind = %t.kind, "collect target");
                self.remember(&t);
                t
            }
        };

        let result = self.take_from(&target, ResourceKind::Energy);
        self.settle(result, target.pos, ADJACENT_RANGE)
    }

    fn pick(&mut self) -> Step {
        let target = match self.current_target(|e| e.store.has_misc()) {
            Err(()) => return Ok(Some(ActionResult::InvalidTarget)),
            Ok(Some(t)) => t,
            Ok(None) => {
                let Some(t) = select::misc_target(self.world(), self.body.pos, self.region()) else {
                    return Ok(None);
                };
                self.remember(&t);
                t
            }
        };
        let Some(resource) = select::first_misc(&target) else {
            return Ok(None);
        };
        let result = self.take_from(&target, resource);
        self.settle(result, target.pos, ADJACENT_RANGE)
    }

    fn collect_drops(&mut self) -> Step {
        let region = self.source_region();
        if let Some(step) = self.enter(region) {
            return step;
        }
        let Some(source_id) = self.reserved_source(region) else {
            return Ok(None);
        };
        let Some(source) = self.world().entity(source_id) else {
            self.memory.source = None;
            return Ok(Some(ActionResult::InvalidTarget));
        };

        let drop = select::energy_drops_near(self.world(), self.body.pos, ADJACENT_RANGE)
            .or_else(|| select::energy_drops_near(self.world(), source.pos, DROP_RANGE));
        match drop {
            Some(pile) => {
                let result = self.ctx.world.pickup(self.agent, pile.id);
                self.settle(result, pile.pos, ADJACENT_RANGE)
            }
            None if !self.body.pos.in_range_to(source.pos, DROP_RANGE) => self.go(source.pos, DROP_RANGE),
            None => Ok(None),
        }
    }

    fn mine(&mut self) -> Step {
        let region = self.source_region();
        if let Some(step) = self.enter(region) {
            return step;
        }
        let Some(source_id) = self.reserved_source(region) else {
            return Ok(None);
        };
        let Some(source) = self.world().entity(source_id) else {
            self.memory.source = None;
            return Ok(Some(ActionResult::InvalidTarget));
        };

        let result = self.ctx.world.harvest(self.agent, source.id);
        if result == ActionResult::NotInRange {
            return self.go(source.pos, ADJACENT_RANGE);
        }

        if self.body.store.is_full() {
            let link = self
                .world()
                .entities_near(self.body.pos, ADJACENT_RANGE, EntityKind::Link)
                .into_iter()
                .find(|l| l.owned);
            if let Some(link) = link {
                let unloaded = self.ctx.world.transfer(self.agent, link.id, ResourceKind::Energy);
                trace!(agent = %self.agent, link = %link.id, result = %unloaded, "unload");
            }
        }
        Ok(Some(result))
    }

    // ── Exploring ─────────────────────────────────────────────────────────

    /// Head for the scout's chosen region.  On arrival, survey it (unless it
    /// is home) and pick a random existing neighbour as the next one.
    fn explore(&mut self) -> Step {
        let here = self.region();
        if self.memory.remote.is_none_or(|r| r == here) {
            if here != self.memory.home {
                let report = self.survey(here);
                debug!(agent = %self.agent, region = %here, sources = report.sources.len(), "region surveyed");
                self.report = Some(report);
            }
            let world = self.world();
            let options: Vec<RegionId> = here.neighbors().filter(|&r| world.region_exists(r)).collect();
            let Some(&next) = self.ctx.rngs.get_mut(self.agent).choose(&options) else {
                debug!(agent = %self.agent, region = %here, "no neighbouring region");
                self.memory.remote = None;
                return Ok(None);
            };
            trace!(agent = %self.agent, from = %here, to = %next, "next region");
            self.memory.remote = Some(next);
        }
        match self.memory.remote.and_then(|r| self.enter(r)) {
            Some(step) => step,
            None => Ok(None),
        }
    }

    fn survey(&self, region: RegionId) -> RegionReport {
        let world = self.world();
        let sources = world.entities_in(region, EntityKind::Source).into_iter().map(|s| (s.id, s.pos)).collect();
        let controller = world
            .entities_in(region, EntityKind::Controller)
            .into_iter()
            .next()
            .map(|c| ControllerReport { id: c.id, pos: c.pos, owned: c.owned, progress: c.progress });
        RegionReport { region, seen: world.tick(), sources, controller }
    }

    // ── Working ───────────────────────────────────────────────────────────

    fn deliver(&mut self, sinks: &[EntityKind], at_home: bool) -> Step {
        if at_home {
            let home = self.memory.home;
            if let Some(step) = self.enter(home) {
                return step;
            }
        }
        let held: Vec<ResourceKind> = self.body.store.kinds().collect();
        let Some((sink, resource)) = select::deliver_sink(self.world(), self.body.pos, self.region(), sinks, &held)
        else {
            return Ok(None);
        };
        let result = self.ctx.world.transfer(self.agent, sink.id, resource);
        self.settle(result, sink.pos, ADJACENT_RANGE)
    }

    fn nurse(&mut self) -> Step {
        let target = match self.current_target(select::needs_energy) {
            Err(()) => return Ok(Some(ActionResult::InvalidTarget)),
            Ok(Some(t)) => t,
            Ok(None) => {
                let Some(t) = select::nurse_target(self.world(), self.body.pos, self.region()) else {
                    return Ok(None);
                };
                self.remember(&t);
                t
            }
        };
        let result = self.ctx.world.transfer(self.agent, target.id, ResourceKind::Energy);
        self.settle(result, target.pos, ADJACENT_RANGE)
    }

    fn build(&mut self) -> Step {
        let target = match self.current_target(|e| e.owned) {
            Err(()) => return Ok(Some(ActionResult::InvalidTarget)),
            Ok(Some(t)) => t,
            Ok(None) => {
                let Some(t) = select::build_target(self.world(), self.body.pos, self.region()) else {
                    return Ok(None);
                };
                self.remember(&t);
                t
            }
        };
        let result = self.ctx.world.build(self.agent, target.id);
        self.settle(result, target.pos, WORK_RANGE)
    }

    fn upgrade(&mut self) -> Step {
        let Some(controller) = select::controller(self.world(), self.memory.home) else {
            return Ok(None);
        };
        let result = self.ctx.world.upgrade(self.agent, controller.id);
        if result == ActionResult::NotInRange {
            return self.go(controller.pos, WORK_RANGE);
        }
        Ok(Some(result))
    }

    fn repair(&mut self, ceiling: u32) -> Step {
        let target = match self.current_target(|e| select::repairable(e, ceiling)) {
            Err(()) => return Ok(Some(ActionResult::InvalidTarget)),
            Ok(Some(t)) => t,
            Ok(None) => {
                let agent = self.agent;
                let agents = self.ctx.agents;
                let taken = |id: EntityId| {
                    agents.any_other(agent, Role::Repairer, |m| m.target.is_some_and(|t| t.id == id))
                };
                let Some(t) = select::repair_target(self.world(), self.region(), ceiling, taken) else {
                    return Ok(None);
                };
                self.remember(&t);
                t
            }
        };
        let result = self.ctx.world.repair(self.agent, target.id);
        self.settle(result, target.pos, WORK_RANGE)
    }
}
