//! Unit tests for hive-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, EntityId};

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(EntityId(100) > EntityId(99));
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert!(!EntityId::default().is_valid());
        assert!(EntityId(3).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(t.next(), Tick(11));
        assert_eq!(Tick(15) - Tick(10), 5u64);
    }

    #[test]
    fn display() {
        assert_eq!(Tick(42).to_string(), "T42");
    }
}

#[cfg(test)]
mod region {
    use crate::{MAX_REGION_INDEX, RegionId};

    #[test]
    fn names_roundtrip() {
        for (name, x, y) in [("E0S0", 0, 0), ("W0N0", -1, -1), ("E53N17", 53, -18), ("W3S12", -4, 12)] {
            let r: RegionId = name.parse().unwrap();
            assert_eq!(r, RegionId::new(x, y), "{name}");
            assert_eq!(r.to_string(), name);
        }
    }

    #[test]
    fn lowercase_accepted() {
        let r: RegionId = "e1n2".parse().unwrap();
        assert_eq!(r.to_string(), "E1N2");
    }

    #[test]
    fn malformed_rejected() {
        for bad in ["", "E", "E1", "X1N1", "E1X1", "EN1", "E1N", "E-3N2", "É1N1", "E1N1x"] {
            assert!(bad.parse::<RegionId>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn out_of_range_index_rejected() {
        for bad in ["E32767S0", "W16001N0", "E0S99999999999"] {
            assert!(bad.parse::<RegionId>().is_err(), "{bad:?} should not parse");
        }
        let edge: RegionId = format!("W{MAX_REGION_INDEX}N{MAX_REGION_INDEX}").parse().unwrap();
        assert_eq!(edge.neighbors().count(), 4);
    }

    #[test]
    fn offset_past_the_edge_is_none() {
        let east = RegionId::new(i16::MAX, 0);
        assert_eq!(east.offset(1, 0), None);
        assert_eq!(east.offset(-1, 0), Some(RegionId::new(i16::MAX - 1, 0)));
        assert_eq!(east.neighbors().count(), 3);
    }

    #[test]
    fn neighbors_share_an_edge() {
        let r = RegionId::new(2, 2);
        let n: Vec<_> = r.neighbors().collect();
        assert_eq!(n, [RegionId::new(2, 1), RegionId::new(3, 2), RegionId::new(2, 3), RegionId::new(1, 2)]);
        assert!(n.iter().all(|&o| r.distance(o) == 1));
    }

    #[test]
    fn distance_is_chebyshev() {
        let a = RegionId::new(0, 0);
        assert_eq!(a.distance(RegionId::new(3, -1)), 3);
        assert_eq!(a.distance(a), 0);
    }
}

#[cfg(test)]
mod grid {
    use crate::{Direction, Position, RegionId};

    fn at(x: u8, y: u8) -> Position {
        Position::new(RegionId::new(0, 0), x, y)
    }

    #[test]
    fn direction_codes_roundtrip() {
        for d in Direction::ALL {
            assert_eq!(Direction::from_code(d.code()), Some(d));
        }
        assert_eq!(Direction::Top.code(), '1');
        assert_eq!(Direction::TopLeft.code(), '8');
        assert_eq!(Direction::from_code('0'), None);
        assert_eq!(Direction::from_code('9'), None);
    }

    #[test]
    fn offsets_invert() {
        for d in Direction::ALL {
            let (dx, dy) = d.offset();
            assert_eq!(Direction::from_offset(dx, dy), Some(d));
        }
        assert_eq!(Direction::from_offset(0, 0), None);
    }

    #[test]
    fn step_crosses_region_border() {
        let p = at(49, 10).step(Direction::Right);
        assert_eq!(p.region, RegionId::new(1, 0));
        assert_eq!((p.x, p.y), (0, 10));

        let q = at(0, 0).step(Direction::TopLeft);
        assert_eq!(q.region, RegionId::new(-1, -1));
        assert_eq!((q.x, q.y), (49, 49));
    }

    #[test]
    fn range_across_border() {
        let a = at(49, 5);
        let b = Position::new(RegionId::new(1, 0), 1, 7);
        assert_eq!(a.range_to(b), 2);
        assert!(a.in_range_to(b, 2));
        assert!(!a.in_range_to(b, 1));
    }

    #[test]
    fn direction_to_neighbour() {
        assert_eq!(at(10, 10).direction_to(at(11, 9)), Some(Direction::TopRight));
        assert_eq!(at(10, 10).direction_to(at(10, 10)), None);
    }

    #[test]
    fn edges() {
        assert!(at(0, 20).is_edge());
        assert!(at(20, 49).is_edge());
        assert!(!at(1, 48).is_edge());
    }

    #[test]
    fn neighbors_are_adjacent() {
        let p = at(25, 25);
        let ns: Vec<_> = p.neighbors().collect();
        assert_eq!(ns.len(), 8);
        assert!(ns.iter().all(|&(d, n)| p.range_to(n) == 1 && p.step(d) == n));
    }
}

#[cfg(test)]
mod resource {
    use crate::{Inventory, ResourceKind};

    #[test]
    fn add_respects_capacity() {
        let mut inv = Inventory::with_capacity(50);
        assert_eq!(inv.add(ResourceKind::Energy, 30), 30);
        assert_eq!(inv.add(ResourceKind::Hydrogen, 30), 20);
        assert!(inv.is_full());
        assert_eq!(inv.used(), 50);
        assert!(inv.has_misc());
    }

    #[test]
    fn remove_drops_empty_kinds() {
        let mut inv = Inventory::holding(100, ResourceKind::Energy, 40);
        assert_eq!(inv.remove(ResourceKind::Energy, 100), 40);
        assert!(inv.is_empty());
        assert_eq!(inv.kinds().count(), 0);
        assert_eq!(inv.free(), 100);
    }
}

#[cfg(test)]
mod entity {
    use crate::{EntityKind, ResourceKind};

    #[test]
    fn movement_blocking() {
        assert!(!EntityKind::Road.blocks_movement(false));
        assert!(!EntityKind::Container.blocks_movement(false));
        assert!(!EntityKind::Rampart.blocks_movement(true));
        assert!(EntityKind::Rampart.blocks_movement(false));
        assert!(EntityKind::Spawn.blocks_movement(true));
        assert!(EntityKind::Source.blocks_movement(false));
        assert!(!EntityKind::Tombstone.blocks_movement(false));
    }

    #[test]
    fn transfer_acceptance() {
        assert!(EntityKind::Tower.accepts(ResourceKind::Energy));
        assert!(!EntityKind::Tower.accepts(ResourceKind::Oxygen));
        assert!(EntityKind::Storage.accepts(ResourceKind::Oxygen));
        assert!(!EntityKind::Source.accepts(ResourceKind::Energy));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, AgentId(0));
        let mut r2 = AgentRng::new(12345, AgentId(0));
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0..1000u32), r2.gen_range(0..1000u32));
        }
    }

    #[test]
    fn different_agents_differ() {
        let mut r0 = AgentRng::new(1, AgentId(0));
        let mut r1 = AgentRng::new(1, AgentId(1));
        let a: Vec<u64> = (0..4).map(|_| r0.gen_range(0..u64::MAX)).collect();
        let b: Vec<u64> = (0..4).map(|_| r1.gen_range(0..u64::MAX)).collect();
        assert_ne!(a, b, "seeds for adjacent agents should diverge");
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = AgentRng::new(0, AgentId(0));
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}
