//! The `Colony` struct and its per-tick driver.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use hive_agent::{AgentMemory, AgentRngs, AgentStore, RegionMemory};
use hive_behavior::{BehaviorError, TaskAssignor};
use hive_core::{ActionResult, AgentId, EntityKind, Position, RegionId, Tick};
use hive_mobility::{MoveContext, MoveOptions, MovementCoordinator};
use hive_spatial::{AStarSearch, GridSearch};
use hive_spawn::{PopulationCounts, QuotaTable, SpawnPlanner};
use hive_world::{SpawnOrder, World};

use crate::{ColonyConfig, ColonyObserver, SimError, SimResult, TickBudget};

// ── Reports ───────────────────────────────────────────────────────────────────

/// Outcome of one [`Colony::run_assignment`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentPass {
    /// Agents evaluated.
    pub processed:   usize,
    /// Agents left for the next tick because the budget ran out.
    pub remaining:   usize,
    /// Evaluations that changed an agent's status.
    pub transitions: usize,
}

/// Everything one [`Colony::run_tick`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    pub tick:        Tick,
    pub evicted:     usize,
    pub spawned:     usize,
    pub processed:   usize,
    pub remaining:   usize,
    pub transitions: usize,
}

// ── Colony ────────────────────────────────────────────────────────────────────

/// The colony controller.
///
/// `Colony<S>` owns every piece of controller-side state: agent memory, the
/// per-agent RNGs, the spawn quotas, and the movement coordinator whose move
/// registry and cost-matrix cache are shared by all agents in a tick.  The
/// world is borrowed per call.
///
/// Create via [`ColonyBuilder`][crate::ColonyBuilder].
pub struct Colony<S: GridSearch = AStarSearch> {
    pub config: ColonyConfig,

    /// Persisted memory of every live agent.
    pub agents: AgentStore,

    /// Per-agent deterministic RNGs, kept apart from `agents` so shoves can
    /// borrow both.
    pub rngs: AgentRngs,

    pub quotas: QuotaTable,

    /// What scouts have reported about other regions.
    pub regions: RegionMemory,

    pub(crate) assignor: TaskAssignor,
    pub(crate) mover:    MovementCoordinator<S>,
    pub(crate) budget:   Box<dyn TickBudget>,
    /// Quota homes already reported as lacking a spawn.
    pub(crate) warned:   HashSet<RegionId>,
}

impl<S: GridSearch> Colony<S> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run one full tick against `world`: evict the dead, plan spawns, then
    /// evaluate every agent until the budget runs out.
    ///
    /// Does not advance the world; the engine does that between ticks.
    pub fn run_tick<W: World + ?Sized, O: ColonyObserver>(
        &mut self,
        world:    &mut W,
        observer: &mut O,
    ) -> SimResult<TickReport> {
        let tick = world.tick();
        observer.on_tick_start(tick);

        let evicted = self.evict_dead(&*world).len();
        let spawned = self.run_spawn_planning(world, observer).len();
        let pass = self.run_assignment(world, observer)?;

        let report = TickReport {
            tick,
            evicted,
            spawned,
            processed: pass.processed,
            remaining: pass.remaining,
            transitions: pass.transitions,
        };
        info!(
            %tick,
            agents = self.agents.len(),
            evicted,
            spawned,
            processed = pass.processed,
            transitions = pass.transitions,
            "tick done"
        );
        observer.on_tick_end(&report);
        Ok(report)
    }

    /// Drop memory and RNG state of agents the world no longer reports.
    pub fn evict_dead<W: World + ?Sized>(&mut self, world: &W) -> Vec<AgentId> {
        let alive: BTreeSet<AgentId> = world.agents().into_iter().collect();
        let gone = self.agents.evict(|id| alive.contains(&id));
        for &agent in &gone {
            self.rngs.remove(agent);
            debug!(%agent, "memory evicted");
        }
        gone
    }

    /// Request one agent for every under-filled quota.  Returns the agents
    /// the world accepted, already registered with fresh memory.
    ///
    /// Once a home region refuses a request, no further requests go to it
    /// this tick.
    pub fn run_spawn_planning<W: World + ?Sized, O: ColonyObserver>(
        &mut self,
        world:    &mut W,
        observer: &mut O,
    ) -> Vec<AgentId> {
        let tick = world.tick();
        let mut counts = PopulationCounts::from_store(&self.agents);
        for home in self.quotas.homes() {
            let has_spawn = world.entities_in(home, EntityKind::Spawn).iter().any(|s| s.owned);
            if !has_spawn && self.warned.insert(home) {
                warn!(%home, "quota names a region without an owned spawn");
            }
            counts.set_sources(home, world.entities_in(home, EntityKind::Source).len());
        }

        let mut stalled: Vec<RegionId> = Vec::new();
        let mut spawned = Vec::new();
        for need in SpawnPlanner::evaluate(&counts, &self.quotas) {
            if stalled.contains(&need.home) {
                continue;
            }
            let name = format!("{}-{}-{}", need.role, need.home, tick.0);
            let Some(agent) = world.request_spawn(&SpawnOrder { home: need.home, name: name.clone() }) else {
                debug!(role = %need.role, home = %need.home, "spawn refused");
                stalled.push(need.home);
                continue;
            };

            let mut memory = AgentMemory::new(need.role, need.home);
            memory.remote = self.quotas.get(need.role, need.home).and_then(|q| q.remote);
            self.agents.insert(agent, memory);
            info!(%agent, role = %need.role, home = %need.home, %name, have = need.have, want = need.want, "spawn requested");
            observer.on_spawn(agent, need.role, need.home);
            spawned.push(agent);
        }
        spawned
    }

    /// Evaluate every agent's state machine once, in ascending id order.
    ///
    /// The budget is consulted before each agent.  An agent's memory is
    /// taken out of the store for its evaluation and put back afterwards, so
    /// stopping between agents never leaves a record half-updated.
    pub fn run_assignment<W: World + ?Sized, O: ColonyObserver>(
        &mut self,
        world:    &mut W,
        observer: &mut O,
    ) -> SimResult<AssignmentPass> {
        let tick = world.tick();
        self.budget.start();

        let ids: Vec<AgentId> = self.agents.agent_ids().collect();
        let mut pass = AssignmentPass::default();

        for (i, &agent) in ids.iter().enumerate() {
            if self.budget.exhausted() {
                pass.remaining = ids.len() - i;
                warn!(%tick, processed = pass.processed, remaining = pass.remaining, "tick budget exhausted");
                observer.on_budget_exhausted(tick, pass.processed, pass.remaining);
                break;
            }
            let Some(mut memory) = self.agents.take(agent) else { continue };
            let role = memory.role;

            // Explicit field borrows so the borrow checker sees disjoint access.
            let result = {
                let mut ctx = MoveContext::new(&mut *world, &self.agents, &mut self.rngs);
                self.assignor.evaluate(&mut ctx, &mut self.mover, agent, &mut memory)
            };
            self.agents.restore(agent, memory);
            self.budget.charge();
            pass.processed += 1;

            match result {
                Ok(ev) => {
                    if let (true, Some(to)) = (ev.transitioned(), ev.to) {
                        pass.transitions += 1;
                        observer.on_transition(agent, role, ev.from, to);
                    }
                    if let Some(report) = ev.report {
                        if self.regions.record(report.clone()) {
                            debug!(%agent, region = %report.region, sources = report.sources.len(), "region report kept");
                            observer.on_region_report(agent, &report);
                        }
                    }
                }
                Err(BehaviorError::AgentNotFound(_)) => {
                    debug!(%agent, "agent not reported by the world; skipped");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(pass)
    }

    /// Move `agent` one step towards `target` with its cached plan, outside
    /// of its role's own evaluation.
    pub fn move_towards<W: World + ?Sized>(
        &mut self,
        world:  &mut W,
        agent:  AgentId,
        target: Position,
        opts:   &MoveOptions,
    ) -> SimResult<ActionResult> {
        let mut memory = self.agents.take(agent).ok_or(SimError::UnknownAgent(agent))?;
        let result = {
            let mut ctx = MoveContext::new(world, &self.agents, &mut self.rngs);
            self.mover.move_towards(&mut ctx, agent, &mut memory, target, opts)
        };
        self.agents.restore(agent, memory);
        Ok(result?)
    }

    /// Build this tick's cost matrices for every region an agent stands in
    /// or calls home, in parallel.
    #[cfg(feature = "parallel")]
    pub fn prewarm_costs<W: World + Sync + ?Sized>(&self, world: &W) {
        let mut regions: Vec<RegionId> = self
            .agents
            .iter()
            .flat_map(|(id, m)| [Some(m.home), world.agent(id).map(|a| a.pos.region)])
            .flatten()
            .collect();
        regions.sort_unstable();
        regions.dedup();
        self.mover.costs().prewarm(world, &regions, world.tick());
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn assignor(&self) -> &TaskAssignor {
        &self.assignor
    }

    #[inline]
    pub fn mover(&self) -> &MovementCoordinator<S> {
        &self.mover
    }
}
