//! Integration tests for hive-sim.

use hive_agent::{RegionReport, Role, Status};
use hive_core::{AgentId, EntityKind, Position, RegionId, ResourceKind, Tick};
use hive_spawn::{QuotaTable, SpawnQuota};
use hive_world::LocalWorld;

use crate::{ColonyObserver, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: RegionId = RegionId { x: 0, y: 0 };

fn at(x: u8, y: u8) -> Position {
    Position::new(HOME, x, y)
}

fn world() -> LocalWorld {
    let mut w = LocalWorld::default();
    w.add_region(HOME).unwrap();
    w
}

/// A home region with one stocked spawn at (25,25).
fn world_with_spawn(energy: u32) -> LocalWorld {
    let mut w = world();
    let spawn = w.add_structure(EntityKind::Spawn, at(25, 25), true).unwrap();
    w.fill(spawn, ResourceKind::Energy, energy).unwrap();
    w
}

/// Observer that records every callback.
#[derive(Default)]
struct Recorder {
    starts:      Vec<Tick>,
    reports:     Vec<TickReport>,
    transitions: Vec<(AgentId, Role, Option<Status>, Status)>,
    spawns:      Vec<(AgentId, Role, RegionId)>,
    exhausted:   Vec<(Tick, usize, usize)>,
    surveyed:    Vec<(AgentId, RegionId)>,
}

impl ColonyObserver for Recorder {
    fn on_tick_start(&mut self, tick: Tick) {
        self.starts.push(tick);
    }
    fn on_tick_end(&mut self, report: &TickReport) {
        self.reports.push(*report);
    }
    fn on_transition(&mut self, agent: AgentId, role: Role, from: Option<Status>, to: Status) {
        self.transitions.push((agent, role, from, to));
    }
    fn on_spawn(&mut self, agent: AgentId, role: Role, home: RegionId) {
        self.spawns.push((agent, role, home));
    }
    fn on_budget_exhausted(&mut self, tick: Tick, processed: usize, remaining: usize) {
        self.exhausted.push((tick, processed, remaining));
    }
    fn on_region_report(&mut self, agent: AgentId, report: &RegionReport) {
        self.surveyed.push((agent, report.region));
    }
}

fn quota(role: Role, minimum: u32) -> QuotaTable {
    QuotaTable::new().with(SpawnQuota::new(role, HOME, minimum))
}

// ── ColonyBuilder validation ──────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use hive_agent::{AgentMemory, AgentRngs, AgentStore, AgentStoreBuilder};
    use hive_behavior::RoleTable;

    use super::*;
    use crate::{ColonyBuilder, ColonyConfig, SimError};

    #[test]
    fn builds_with_defaults() {
        let colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        assert!(colony.agents.is_empty());
        assert!(colony.quotas.is_empty());
        assert_eq!(colony.assignor().roles().roles().count(), Role::ALL.len());
    }

    #[test]
    fn zero_cpu_budget_errors() {
        let config = ColonyConfig { cpu_budget_ms: Some(0), ..ColonyConfig::default() };
        assert!(matches!(ColonyBuilder::new(config).build(), Err(SimError::Config(_))));
    }

    #[test]
    fn rng_seed_mismatch_errors() {
        let result = ColonyBuilder::new(ColonyConfig::seeded(1))
            .agents(AgentStore::new(), AgentRngs::new(2))
            .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn quota_role_without_behavior_errors() {
        let result = ColonyBuilder::new(ColonyConfig::default())
            .roles(RoleTable::empty())
            .quotas(quota(Role::Nurse, 1))
            .build();
        assert!(matches!(result, Err(SimError::Config(m)) if m.contains("nurse")));
    }

    #[test]
    fn stored_role_without_behavior_errors() {
        let (store, rngs) = AgentStoreBuilder::new(3).agent(AgentId(0), AgentMemory::new(Role::Worker, HOME)).build();
        let result = ColonyBuilder::new(ColonyConfig::seeded(3))
            .agents(store, rngs)
            .roles(RoleTable::empty())
            .build();
        assert!(result.is_err());
    }
}

// ── Eviction ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod evict_tests {
    use hive_agent::AgentMemory;

    use super::*;
    use crate::{ColonyBuilder, ColonyConfig};

    #[test]
    fn dead_agents_are_evicted() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let b = w.add_agent(at(12, 10)).unwrap();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        colony.agents.insert(a, AgentMemory::new(Role::Worker, HOME));
        colony.agents.insert(b, AgentMemory::new(Role::Worker, HOME));
        colony.rngs.get_mut(a);
        colony.rngs.get_mut(b);

        w.kill_agent(a).unwrap();
        assert_eq!(colony.evict_dead(&w), vec![a]);
        assert!(!colony.agents.contains(a));
        assert!(colony.agents.contains(b));
        assert_eq!(colony.rngs.len(), 1);
        assert!(colony.evict_dead(&w).is_empty());
    }
}

// ── Spawn planning ────────────────────────────────────────────────────────────

#[cfg(test)]
mod spawn_tests {
    use hive_world::World;

    use super::*;
    use crate::{ColonyBuilder, ColonyConfig};

    #[test]
    fn under_quota_role_is_spawned_once() {
        let mut w = world_with_spawn(300);
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quota(Role::Nurse, 1)).build().unwrap();
        let mut obs = Recorder::default();

        let spawned = colony.run_spawn_planning(&mut w, &mut obs);
        assert_eq!(spawned.len(), 1);
        let memory = colony.agents.get(spawned[0]).unwrap();
        assert_eq!(memory.role, Role::Nurse);
        assert_eq!(memory.home, HOME);
        assert_eq!(obs.spawns, vec![(spawned[0], Role::Nurse, HOME)]);
        assert!(w.agent(spawned[0]).unwrap().spawning);

        w.end_tick();
        assert!(colony.run_spawn_planning(&mut w, &mut obs).is_empty());
    }

    #[test]
    fn per_source_quota_counts_sources() {
        let mut w = world_with_spawn(300);
        let second = w.add_structure(EntityKind::Spawn, at(35, 25), true).unwrap();
        w.fill(second, ResourceKind::Energy, 300).unwrap();
        w.add_source(at(10, 10)).unwrap();
        w.add_source(at(40, 40)).unwrap();
        let quotas = QuotaTable::new().with(SpawnQuota::per_source(Role::Harvester, HOME, 1));
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quotas).build().unwrap();

        let spawned = colony.run_spawn_planning(&mut w, &mut Recorder::default());
        assert_eq!(spawned.len(), 1);
        w.end_tick();
        let spawned = colony.run_spawn_planning(&mut w, &mut Recorder::default());
        assert_eq!(spawned.len(), 1);
        assert_eq!(colony.agents.count_role(Role::Harvester, HOME), 2);
    }

    #[test]
    fn refused_home_is_not_retried_in_the_same_tick() {
        let mut w = world_with_spawn(300);
        let quotas = QuotaTable::new()
            .with(SpawnQuota::new(Role::Nurse, HOME, 1))
            .with(SpawnQuota::new(Role::Worker, HOME, 1));
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quotas).build().unwrap();

        // One spawn produces one agent per tick; the worker waits.
        let spawned = colony.run_spawn_planning(&mut w, &mut Recorder::default());
        assert_eq!(spawned.len(), 1);
        assert_eq!(colony.agents.get(spawned[0]).unwrap().role, Role::Nurse);
    }

    #[test]
    fn quota_remote_is_handed_to_the_agent() {
        let remote = RegionId::new(1, 0);
        let mut w = world_with_spawn(300);
        let quotas = QuotaTable::new().with(SpawnQuota::new(Role::Pillager, HOME, 1).with_remote(remote));
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quotas).build().unwrap();

        let spawned = colony.run_spawn_planning(&mut w, &mut Recorder::default());
        assert_eq!(colony.agents.get(spawned[0]).unwrap().remote, Some(remote));
    }

    #[test]
    fn home_without_spawn_spawns_nothing() {
        let mut w = world();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quota(Role::Nurse, 2)).build().unwrap();
        assert!(colony.run_spawn_planning(&mut w, &mut Recorder::default()).is_empty());
        assert!(colony.warned.contains(&HOME));
    }
}

// ── Assignment ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod assignment_tests {
    use hive_agent::AgentMemory;
    use hive_mobility::MoveOptions;
    use hive_world::World;

    use super::*;
    use crate::{ColonyBuilder, ColonyConfig, NoopObserver, SimError};

    #[test]
    fn every_agent_is_evaluated() {
        let mut w = world();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        for x in [10, 20, 30] {
            let a = w.add_agent(at(x, 10)).unwrap();
            colony.agents.insert(a, AgentMemory::new(Role::Upgrader, HOME));
        }
        let mut obs = Recorder::default();
        let pass = colony.run_assignment(&mut w, &mut obs).unwrap();
        assert_eq!(pass.processed, 3);
        assert_eq!(pass.remaining, 0);
        assert_eq!(pass.transitions, 3);
        assert!(obs.transitions.iter().all(|t| t.2.is_none() && t.3 == Status::Collect));
    }

    #[test]
    fn exhausted_budget_leaves_the_rest_untouched() {
        let mut w = world();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).agent_limit(1).build().unwrap();
        let mut ids = Vec::new();
        for x in [10, 20, 30] {
            let a = w.add_agent(at(x, 10)).unwrap();
            colony.agents.insert(a, AgentMemory::new(Role::Upgrader, HOME));
            ids.push(a);
        }
        let mut obs = Recorder::default();
        let pass = colony.run_assignment(&mut w, &mut obs).unwrap();
        assert_eq!(pass.processed, 1);
        assert_eq!(pass.remaining, 2);
        assert_eq!(obs.exhausted, vec![(Tick(0), 1, 2)]);
        assert_eq!(colony.agents.get(ids[0]).unwrap().status, Some(Status::Collect));
        assert_eq!(colony.agents.get(ids[1]).unwrap(), &AgentMemory::new(Role::Upgrader, HOME));
        assert_eq!(colony.agents.get(ids[2]).unwrap(), &AgentMemory::new(Role::Upgrader, HOME));
        assert!(w.said_by(ids[1]).is_empty());
    }

    #[test]
    fn scout_reports_are_kept() {
        let east = RegionId::new(1, 0);
        let mut w = world();
        w.add_region(east).unwrap();
        w.add_source(Position::new(east, 30, 30)).unwrap();
        let a = w.add_agent(at(48, 25)).unwrap();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        colony.agents.insert(a, AgentMemory::new(Role::Scout, HOME));

        let mut obs = Recorder::default();
        for _ in 0..6 {
            colony.run_assignment(&mut w, &mut obs).unwrap();
            w.end_tick();
        }
        assert_eq!(obs.surveyed.first(), Some(&(a, east)));
        let report = colony.regions.get(east).unwrap();
        assert_eq!(report.sources.len(), 1);
        assert!(colony.regions.get(HOME).is_none());
    }

    #[test]
    fn memory_for_a_vanished_agent_is_skipped() {
        let mut w = world();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        colony.agents.insert(AgentId(40), AgentMemory::new(Role::Worker, HOME));
        let pass = colony.run_assignment(&mut w, &mut NoopObserver).unwrap();
        assert_eq!(pass.processed, 1);
        assert!(colony.agents.contains(AgentId(40)));
    }

    #[test]
    fn move_towards_uses_stored_memory() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        colony.agents.insert(a, AgentMemory::new(Role::Worker, HOME));

        let result = colony.move_towards(&mut w, a, at(20, 10), &MoveOptions::default()).unwrap();
        assert_eq!(result, hive_core::ActionResult::Ok);
        assert!(w.intent(a).is_some());
        let memory = colony.agents.get(a).unwrap();
        assert_eq!(memory.move_plan.as_ref().map(|p| p.dest), Some(at(20, 10)));
        assert_eq!(memory.shove_anchor, Some(at(20, 10)));
    }

    #[test]
    fn move_towards_unknown_agent_errors() {
        let mut w = world();
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).build().unwrap();
        let err = colony.move_towards(&mut w, AgentId(5), at(20, 10), &MoveOptions::default()).unwrap_err();
        assert!(matches!(err, SimError::UnknownAgent(AgentId(5))));
        assert_eq!(w.tick(), Tick(0));
    }
}

// ── Full ticks ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use hive_world::World;

    use super::*;
    use crate::{ColonyBuilder, ColonyConfig};

    #[test]
    fn observer_sees_every_tick() {
        let mut w = world_with_spawn(300);
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quota(Role::Upgrader, 1)).build().unwrap();
        let mut obs = Recorder::default();
        for _ in 0..5 {
            colony.run_tick(&mut w, &mut obs).unwrap();
            w.end_tick();
        }
        assert_eq!(obs.starts, (0..5).map(Tick).collect::<Vec<_>>());
        assert_eq!(obs.reports.len(), 5);
        assert_eq!(obs.reports[0].spawned, 1);
        assert!(obs.reports[1..].iter().all(|r| r.spawned == 0));
    }

    #[test]
    fn upgrader_spawns_gathers_and_upgrades() {
        let mut w = world_with_spawn(300);
        w.add_source(at(30, 25)).unwrap();
        let ctrl = w.add_controller(at(25, 30), true).unwrap();
        let mut colony =
            ColonyBuilder::new(ColonyConfig::seeded(9)).quotas(quota(Role::Upgrader, 1)).build().unwrap();
        let mut obs = Recorder::default();

        for _ in 0..60 {
            colony.run_tick(&mut w, &mut obs).unwrap();
            w.end_tick();
        }
        assert_eq!(colony.agents.len(), 1);
        assert!(w.entity(ctrl).unwrap().progress > 0);
        let statuses: Vec<Status> = obs.transitions.iter().map(|t| t.3).collect();
        assert_eq!(&statuses[..2], &[Status::Collect, Status::Upgrade]);
    }

    #[test]
    fn killed_agent_is_replaced() {
        let mut w = world_with_spawn(300);
        let mut colony = ColonyBuilder::new(ColonyConfig::default()).quotas(quota(Role::Worker, 1)).build().unwrap();
        let mut obs = Recorder::default();
        colony.run_tick(&mut w, &mut obs).unwrap();
        w.end_tick();
        let first = obs.spawns[0].0;

        w.kill_agent(first).unwrap();
        let spawn = w.entities_in(HOME, EntityKind::Spawn)[0].id;
        w.fill(spawn, ResourceKind::Energy, 300).unwrap();
        let report = colony.run_tick(&mut w, &mut obs).unwrap();
        assert_eq!(report.evicted, 1);
        assert_eq!(report.spawned, 1);
        assert_ne!(obs.spawns[1].0, first);
    }
}
