//! Unit tests for hive-mobility.

use hive_agent::{AgentMemory, AgentRngs, AgentStore, Role};
use hive_core::{Position, RegionId, Terrain};
use hive_world::LocalWorld;

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

/// A one-tile-high corridor along y = 10 from x = 5 to x = 20.
fn corridor() -> LocalWorld {
    let mut w = world();
    for x in 4..=21 {
        w.set_terrain(at(x, 9), Terrain::Wall).unwrap();
        w.set_terrain(at(x, 11), Terrain::Wall).unwrap();
    }
    w.set_terrain(at(4, 10), Terrain::Wall).unwrap();
    w.set_terrain(at(21, 10), Terrain::Wall).unwrap();
    w
}

fn memory_with_anchor(anchor: Option<Position>) -> AgentMemory {
    let mut m = AgentMemory::new(Role::Courier, HOME);
    m.shove_anchor = anchor;
    m
}

// ── MoveRegistry ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry {
    use hive_core::{AgentId, Tick};

    use super::at;
    use crate::MoveRegistry;

    #[test]
    fn records_once_per_tick() {
        let mut r = MoveRegistry::new();
        assert!(r.record(Tick(5), AgentId(1)));
        assert!(!r.record(Tick(5), AgentId(1)));
        assert!(r.has_moved(Tick(5), AgentId(1)));
        assert!(!r.has_moved(Tick(5), AgentId(2)));
    }

    #[test]
    fn resets_lazily_on_new_tick() {
        let mut r = MoveRegistry::new();
        assert_eq!(r.last_reset(), None);
        r.record(Tick(5), AgentId(1));
        r.record(Tick(5), AgentId(2));
        assert_eq!(r.moved_count(Tick(5)), 2);
        assert!(!r.has_moved(Tick(6), AgentId(1)));
        assert_eq!(r.last_reset(), Some(Tick(6)));
        assert_eq!(r.moved_count(Tick(6)), 0);
    }

    #[test]
    fn claimed_tiles_reset_with_the_tick() {
        let mut r = MoveRegistry::new();
        r.claim(Tick(5), at(11, 10));
        assert!(r.is_claimed(Tick(5), at(11, 10)));
        assert!(!r.is_claimed(Tick(5), at(12, 10)));
        assert!(!r.is_claimed(Tick(6), at(11, 10)));
    }
}

// ── MoveOptions ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod options {
    use crate::MoveOptions;

    #[test]
    fn defaults() {
        let o = MoveOptions::default();
        assert_eq!(o.range, 1);
        assert_eq!(o.path.max_regions, 6);
        assert_eq!(o.path.plain_cost, 2);
        assert_eq!(o.path.swamp_cost, 10);
        assert!(o.stop_at_unknown);
        assert_eq!(MoveOptions::within(3).range, 3);
    }
}

// ── move_towards ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod move_towards {
    use hive_agent::{AgentMemory, MovePlan, Role};
    use hive_core::{ActionResult, AgentId, Direction, EntityKind, Terrain};
    use hive_spatial::SerializedPath;
    use hive_world::{SpawnOrder, World};

    use super::*;
    use crate::{MobilityError, MoveContext, MoveOptions, MovementCoordinator};

    fn run(
        w: &mut LocalWorld,
        mc: &mut MovementCoordinator,
        agent: AgentId,
        mem: &mut AgentMemory,
        target: Position,
    ) -> ActionResult {
        let store = AgentStore::new();
        let mut rngs = AgentRngs::new(1);
        let mut ctx = MoveContext::new(w, &store, &mut rngs);
        mc.move_towards(&mut ctx, agent, mem, target, &MoveOptions::default()).unwrap()
    }

    #[test]
    fn in_range_is_a_no_op() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        assert_eq!(run(&mut w, &mut mc, a, &mut mem, at(11, 11)), ActionResult::Ok);
        assert_eq!(w.intent(a), None);
        assert_eq!(mem.shove_anchor, Some(at(11, 11)));
        assert!(mem.move_plan.as_ref().unwrap().path.is_empty());
    }

    #[test]
    fn plans_then_follows_cached_path() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        let target = at(20, 10);

        assert_eq!(run(&mut w, &mut mc, a, &mut mem, target), ActionResult::Ok);
        assert!(w.intent(a).is_some());
        let first = mem.move_plan.clone().unwrap();
        assert_eq!(first.dest, target);
        w.end_tick();
        assert_eq!(w.agent(a).unwrap().pos.range_to(target), 9);

        run(&mut w, &mut mc, a, &mut mem, target);
        let second = mem.move_plan.clone().unwrap();
        assert_eq!(second.path.remaining_steps() + 1, first.path.remaining_steps());
    }

    #[test]
    fn reaches_target() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        let target = at(20, 14);
        for _ in 0..12 {
            run(&mut w, &mut mc, a, &mut mem, target);
            w.end_tick();
        }
        assert!(w.agent(a).unwrap().pos.in_range_to(target, 1));
    }

    #[test]
    fn shoved_agent_keeps_plan() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let target = at(20, 10);
        let path = SerializedPath::encode(&[at(11, 11), at(12, 10), at(13, 10)]);
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        mem.move_plan = Some(MovePlan { dest: target, path: path.clone() });

        run(&mut w, &mut mc, a, &mut mem, target);
        assert_eq!(w.intent(a), Some(Direction::BottomRight));
        assert_eq!(mem.move_plan.unwrap().path, path);
    }

    #[test]
    fn desynchronized_plan_is_replaced() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let target = at(20, 10);
        let stale = SerializedPath::encode(&[at(30, 30), at(31, 30)]);
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        mem.move_plan = Some(MovePlan { dest: target, path: stale.clone() });

        run(&mut w, &mut mc, a, &mut mem, target);
        let plan = mem.move_plan.unwrap();
        assert_ne!(plan.path, stale);
        let head = plan.path.next_step(at(10, 10)).unwrap().unwrap();
        assert_eq!(head.range_to(at(10, 10)), 1);
    }

    #[test]
    fn corrupt_path_is_replaced() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let target = at(20, 10);
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        mem.move_plan = Some(MovePlan { dest: target, path: SerializedPath::from("zz9".to_string()) });

        assert_eq!(run(&mut w, &mut mc, a, &mut mem, target), ActionResult::Ok);
        assert!(w.intent(a).is_some());
        assert!(mem.move_plan.unwrap().path.next_step(at(10, 10)).is_ok());
    }

    #[test]
    fn drifted_target_replans() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        run(&mut w, &mut mc, a, &mut mem, at(20, 10));
        w.end_tick();
        run(&mut w, &mut mc, a, &mut mem, at(30, 30));
        assert_eq!(mem.move_plan.unwrap().dest, at(30, 30));
    }

    #[test]
    fn unreachable_target_stands_still() {
        let mut w = world();
        let a = w.add_agent(at(10, 10)).unwrap();
        for (_, p) in at(30, 30).neighbors() {
            w.set_terrain(p, Terrain::Wall).unwrap();
        }
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        let r = run(&mut w, &mut mc, a, &mut mem, at(30, 30));
        // Either nothing at all, or a partial path towards the wall ring.
        if r == ActionResult::NoPath {
            assert_eq!(w.intent(a), None);
            assert!(mem.move_plan.unwrap().path.is_empty());
        } else {
            assert_eq!(r, ActionResult::Ok);
        }
    }

    #[test]
    fn crossing_into_unseen_region_keeps_moving() {
        let mut w = world();
        let east = RegionId::new(1, 0);
        w.add_region(east).unwrap();
        w.set_visible(east, false).unwrap();
        let a = w.add_agent(at(47, 10)).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Scout, HOME);
        let target = Position::new(east, 10, 10);

        for tick in 0..20 {
            let pos = w.agent(a).unwrap().pos;
            if pos.in_range_to(target, 1) {
                return;
            }
            assert_eq!(run(&mut w, &mut mc, a, &mut mem, target), ActionResult::Ok, "tick {tick} at {pos}");
            assert!(w.intent(a).is_some(), "tick {tick} at {pos}");
            w.end_tick();
        }
        panic!("never reached {target}, stopped at {}", w.agent(a).unwrap().pos);
    }

    #[test]
    fn spawning_agent_is_busy() {
        let mut w = world();
        let spawn = w.add_structure(EntityKind::Spawn, at(25, 25), true).unwrap();
        w.fill(spawn, hive_core::ResourceKind::Energy, 300).unwrap();
        let a = w.request_spawn(&SpawnOrder { home: HOME, name: "w1".into() }).unwrap();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        assert_eq!(run(&mut w, &mut mc, a, &mut mem, at(5, 5)), ActionResult::Busy);
        assert!(mem.move_plan.is_none());
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut w = world();
        let mut mc = MovementCoordinator::new();
        let mut mem = AgentMemory::new(Role::Worker, HOME);
        let store = AgentStore::new();
        let mut rngs = AgentRngs::new(1);
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        let err = mc.move_towards(&mut ctx, AgentId(99), &mut mem, at(5, 5), &MoveOptions::default());
        assert!(matches!(err, Err(MobilityError::AgentNotFound(AgentId(99)))));
    }
}

// ── Shove ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shove {
    use hive_core::{ActionResult, AgentId, Direction, EntityKind};
    use hive_world::World;

    use super::*;
    use crate::{MoveContext, MovementCoordinator};

    fn store_with(entries: &[(AgentId, Option<Position>)]) -> AgentStore {
        let mut s = AgentStore::new();
        for &(id, anchor) in entries {
            s.insert(id, memory_with_anchor(anchor));
        }
        s
    }

    #[test]
    fn three_agent_chain_moves_once_each() {
        let mut w = corridor();
        let a = w.add_agent(at(10, 10)).unwrap();
        let b = w.add_agent(at(11, 10)).unwrap();
        let c = w.add_agent(at(12, 10)).unwrap();
        let store = store_with(&[(b, Some(at(20, 10))), (c, Some(at(20, 10)))]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let now = w.tick();

        {
            let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
            assert_eq!(mc.step(&mut ctx, a, Direction::Right), ActionResult::Ok);
        }
        for id in [a, b, c] {
            assert_eq!(w.intent(id), Some(Direction::Right));
        }
        assert!([a, b, c].into_iter().all(|id| mc.has_moved(&w, id)));
        assert_eq!(mc.registry().last_reset(), Some(now));

        w.end_tick();
        assert_eq!(w.agent(a).unwrap().pos, at(11, 10));
        assert_eq!(w.agent(b).unwrap().pos, at(12, 10));
        assert_eq!(w.agent(c).unwrap().pos, at(13, 10));
    }

    #[test]
    fn looped_chain_terminates() {
        let mut w = corridor();
        w.set_terrain(at(12, 10), Terrain::Wall).unwrap();
        let a = w.add_agent(at(10, 10)).unwrap();
        let b = w.add_agent(at(11, 10)).unwrap();
        let store = store_with(&[(b, None)]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();

        {
            let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
            mc.step(&mut ctx, a, Direction::Right);
        }
        // b's only way out is a's tile; a has already moved, so it stops there.
        assert_eq!(w.intent(a), Some(Direction::Right));
        assert_eq!(w.intent(b), Some(Direction::Left));
        w.end_tick();
        assert_eq!(w.agent(a).unwrap().pos, at(11, 10));
        assert_eq!(w.agent(b).unwrap().pos, at(10, 10));
    }

    #[test]
    fn agent_that_moved_is_not_shoved() {
        let mut w = corridor();
        let a = w.add_agent(at(10, 10)).unwrap();
        let b = w.add_agent(at(11, 10)).unwrap();
        let store = store_with(&[(a, None), (b, None)]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);

        mc.step(&mut ctx, b, Direction::Right);
        assert_eq!(mc.shove(&mut ctx, b), ActionResult::Busy);
    }

    #[test]
    fn enclosed_agent_reports_blocked() {
        let mut w = world();
        let b = w.add_agent(at(10, 10)).unwrap();
        for (_, p) in at(10, 10).neighbors() {
            w.set_terrain(p, Terrain::Wall).unwrap();
        }
        let store = store_with(&[(b, None)]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        assert_eq!(mc.shove(&mut ctx, b), ActionResult::Blocked);
        assert_eq!(w.intent(b), None);
    }

    #[test]
    fn prefers_free_tile_nearest_anchor() {
        let mut w = world();
        let b = w.add_agent(at(10, 10)).unwrap();
        let store = store_with(&[(b, Some(at(15, 10)))]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        assert_eq!(mc.shove(&mut ctx, b), ActionResult::Ok);
        let dir = w.intent(b).unwrap();
        assert_eq!(at(10, 10).step(dir).x, 11);
    }

    #[test]
    fn free_tile_beats_occupied_one_nearer_the_anchor() {
        let mut w = world();
        let b = w.add_agent(at(10, 10)).unwrap();
        let other = w.add_agent(at(11, 10)).unwrap();
        for (_, p) in at(10, 10).neighbors() {
            if p != at(11, 10) && p != at(9, 10) {
                w.set_terrain(p, Terrain::Wall).unwrap();
            }
        }
        let store = store_with(&[(b, Some(at(15, 10))), (other, None)]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        assert_eq!(mc.shove(&mut ctx, b), ActionResult::Ok);
        assert_eq!(w.intent(b), Some(Direction::Left));
        assert_eq!(w.intent(other), None);
    }

    #[test]
    fn tile_entered_this_tick_counts_as_taken() {
        let mut w = world();
        let b = w.add_agent(at(10, 10)).unwrap();
        let c = w.add_agent(at(12, 10)).unwrap();
        for (_, p) in at(10, 10).neighbors() {
            if p != at(11, 10) && p != at(9, 10) {
                w.set_terrain(p, Terrain::Wall).unwrap();
            }
        }
        let store = store_with(&[(b, Some(at(15, 10))), (c, None)]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        assert_eq!(mc.step(&mut ctx, c, Direction::Left), ActionResult::Ok);
        assert_eq!(mc.shove(&mut ctx, b), ActionResult::Ok);
        assert_eq!(w.intent(b), Some(Direction::Left));

        w.end_tick();
        assert_eq!(w.agent(c).unwrap().pos, at(11, 10));
        assert_eq!(w.agent(b).unwrap().pos, at(9, 10));
    }

    #[test]
    fn never_onto_edges_or_structures() {
        let mut w = world();
        w.add_structure(EntityKind::Tower, at(2, 2), true).unwrap();
        let b = w.add_agent(at(1, 1)).unwrap();
        let store = store_with(&[(b, Some(at(2, 2)))]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
        mc.shove(&mut ctx, b);
        let dest = at(1, 1).step(w.intent(b).unwrap());
        assert!(!dest.is_edge());
        assert_ne!(dest, at(2, 2));
    }

    #[test]
    fn random_fallback_is_deterministic() {
        let pick = |seed: u64| {
            let mut w = world();
            let b = w.add_agent(at(10, 10)).unwrap();
            let store = store_with(&[(b, None)]);
            let mut rngs = AgentRngs::new(seed);
            let mut mc = MovementCoordinator::new();
            let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
            mc.shove(&mut ctx, b);
            w.intent(b)
        };
        assert!(pick(3).is_some());
        assert_eq!(pick(3), pick(3));
    }

    #[test]
    fn hostile_blockers_are_left_alone() {
        let mut w = corridor();
        let a = w.add_agent(at(10, 10)).unwrap();
        let h = w.add_hostile(at(11, 10)).unwrap();
        let store = store_with(&[]);
        let mut rngs = AgentRngs::new(1);
        let mut mc = MovementCoordinator::new();
        {
            let mut ctx = MoveContext::new(&mut w, &store, &mut rngs);
            mc.step(&mut ctx, a, Direction::Right);
        }
        assert!(!mc.has_moved(&w, h));
        w.end_tick();
        assert_eq!(w.agent(a).unwrap().pos, at(10, 10));
    }
}
