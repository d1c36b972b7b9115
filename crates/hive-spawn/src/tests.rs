//! Unit tests for hive-spawn.

use hive_agent::Role;
use hive_core::RegionId;

// ── Helpers ───────────────────────────────────────────────────────────────────

const HOME: RegionId = RegionId { x: -2, y: -2 }; // W1N1
const OUTPOST: RegionId = RegionId { x: 0, y: 0 }; // E0S0

// ── Quotas ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod quota {
    use super::*;
    use crate::{QuotaTable, SpawnQuota};

    #[test]
    fn plain_quota_ignores_sources() {
        let q = SpawnQuota::new(Role::Upgrader, HOME, 3);
        assert_eq!(q.resolve(0), 3);
        assert_eq!(q.resolve(4), 3);
    }

    #[test]
    fn per_source_quota_scales() {
        let q = SpawnQuota::per_source(Role::Harvester, HOME, 1);
        assert_eq!(q.resolve(0), 0);
        assert_eq!(q.resolve(2), 2);
    }

    #[test]
    fn later_quota_replaces_in_place() {
        let t = QuotaTable::new()
            .with(SpawnQuota::new(Role::Nurse, HOME, 1))
            .with(SpawnQuota::new(Role::Worker, HOME, 2))
            .with(SpawnQuota::new(Role::Nurse, HOME, 4));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(Role::Nurse, HOME).unwrap().minimum, 4);
        let order: Vec<Role> = t.iter().map(|q| q.role).collect();
        assert_eq!(order, vec![Role::Nurse, Role::Worker]);
    }

    #[test]
    fn homes_in_first_seen_order() {
        let t: QuotaTable = [
            SpawnQuota::new(Role::Nurse, OUTPOST, 1),
            SpawnQuota::new(Role::Nurse, HOME, 1),
            SpawnQuota::new(Role::Worker, OUTPOST, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(t.homes(), vec![OUTPOST, HOME]);
    }
}

// ── PopulationCounts ──────────────────────────────────────────────────────────

#[cfg(test)]
mod counts {
    use hive_agent::{AgentMemory, AgentStore};
    use hive_core::AgentId;

    use super::*;
    use crate::PopulationCounts;

    #[test]
    fn counts_by_role_and_home() {
        let mut store = AgentStore::new();
        store.insert(AgentId(0), AgentMemory::new(Role::Worker, HOME));
        store.insert(AgentId(1), AgentMemory::new(Role::Worker, HOME));
        store.insert(AgentId(2), AgentMemory::new(Role::Worker, OUTPOST));
        store.insert(AgentId(3), AgentMemory::new(Role::Nurse, HOME));

        let c = PopulationCounts::from_store(&store);
        assert_eq!(c.get(Role::Worker, HOME), 2);
        assert_eq!(c.get(Role::Worker, OUTPOST), 1);
        assert_eq!(c.get(Role::Nurse, HOME), 1);
        assert_eq!(c.get(Role::Hauler, HOME), 0);
        assert_eq!(c.total(), 4);
    }

    #[test]
    fn unknown_region_has_no_sources() {
        let c = PopulationCounts::new().with_sources(HOME, 2);
        assert_eq!(c.sources(HOME), 2);
        assert_eq!(c.sources(OUTPOST), 0);
    }
}

// ── SpawnPlanner ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use super::*;
    use crate::{PopulationCounts, QuotaTable, SpawnPlanner, SpawnQuota};

    fn quotas() -> QuotaTable {
        QuotaTable::new()
            .with(SpawnQuota::per_source(Role::Harvester, HOME, 1))
            .with(SpawnQuota::new(Role::Nurse, HOME, 2))
            .with(SpawnQuota::new(Role::Upgrader, HOME, 1))
    }

    #[test]
    fn nothing_needed_at_quota() {
        let mut c = PopulationCounts::new().with_sources(HOME, 1);
        c.add(Role::Harvester, HOME);
        c.add(Role::Nurse, HOME);
        c.add(Role::Nurse, HOME);
        c.add(Role::Upgrader, HOME);
        assert!(SpawnPlanner::evaluate(&c, &quotas()).is_empty());
    }

    #[test]
    fn under_quota_roles_in_table_order() {
        let mut c = PopulationCounts::new().with_sources(HOME, 2);
        c.add(Role::Harvester, HOME);
        c.add(Role::Upgrader, HOME);

        let needs = SpawnPlanner::evaluate(&c, &quotas());
        let roles: Vec<Role> = needs.iter().map(|n| n.role).collect();
        assert_eq!(roles, vec![Role::Harvester, Role::Nurse]);
        assert_eq!(needs[0].have, 1);
        assert_eq!(needs[0].want, 2);
        assert_eq!(needs[1].missing(), 2);
    }

    #[test]
    fn population_is_scoped_to_home() {
        let mut c = PopulationCounts::new();
        c.add(Role::Upgrader, OUTPOST);
        let q = QuotaTable::new().with(SpawnQuota::new(Role::Upgrader, HOME, 1));
        let needs = SpawnPlanner::evaluate(&c, &q);
        assert_eq!(needs.len(), 1);
        assert_eq!(needs[0].home, HOME);
    }

    #[test]
    fn per_source_quota_without_sources_needs_nothing() {
        let c = PopulationCounts::new();
        let q = QuotaTable::new().with(SpawnQuota::per_source(Role::Hauler, HOME, 1));
        assert!(SpawnPlanner::evaluate(&c, &q).is_empty());
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::{SpawnError, load_quotas_csv, load_quotas_reader};

    const CSV: &[u8] = b"\
role,home,minimum,per_source,remote\n\
harvester,W1N1,1,true,\n\
hauler,W1N1,1,true,\n\
Nurse,W1N1,2,false,\n\
upgrader,E0S0,3,,\n\
pillager,W1N1,1,false,E0S0\n\
";

    #[test]
    fn loads_rows_in_order() {
        let t = load_quotas_reader(Cursor::new(CSV)).unwrap();
        assert_eq!(t.len(), 5);
        let roles: Vec<Role> = t.iter().map(|q| q.role).collect();
        assert_eq!(roles, vec![Role::Harvester, Role::Hauler, Role::Nurse, Role::Upgrader, Role::Pillager]);
    }

    #[test]
    fn parses_fields() {
        let t = load_quotas_reader(Cursor::new(CSV)).unwrap();
        let harvester = t.get(Role::Harvester, HOME).unwrap();
        assert!(harvester.per_source);
        assert_eq!(harvester.minimum, 1);
        let upgrader = t.get(Role::Upgrader, OUTPOST).unwrap();
        assert!(!upgrader.per_source);
        assert_eq!(upgrader.minimum, 3);
        assert_eq!(upgrader.remote, None);
        assert_eq!(t.get(Role::Pillager, HOME).unwrap().remote, Some(OUTPOST));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let csv = b"role,home,minimum\nworker,W1N1,2\n";
        let t = load_quotas_reader(Cursor::new(csv.as_slice())).unwrap();
        let q = t.get(Role::Worker, HOME).unwrap();
        assert!(!q.per_source);
        assert_eq!(q.remote, None);
    }

    #[test]
    fn unknown_role_errors() {
        let bad = b"role,home,minimum,per_source\nminer,W1N1,1,false\n";
        let err = load_quotas_reader(Cursor::new(bad.as_slice())).unwrap_err();
        assert!(matches!(err, SpawnError::Parse(ref m) if m.contains("line 2")));
    }

    #[test]
    fn bad_region_errors() {
        let bad = b"role,home,minimum,per_source\nnurse,X1N1,1,false\n";
        assert!(matches!(load_quotas_reader(Cursor::new(bad.as_slice())), Err(SpawnError::Parse(_))));
    }

    #[test]
    fn bad_minimum_errors() {
        let bad = b"role,home,minimum,per_source\nnurse,W1N1,-1,false\n";
        assert!(load_quotas_reader(Cursor::new(bad.as_slice())).is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV).unwrap();
        file.flush().unwrap();
        let t = load_quotas_csv(file.path()).unwrap();
        assert_eq!(t.len(), 5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_quotas_csv(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, SpawnError::Io(_)));
    }
}
