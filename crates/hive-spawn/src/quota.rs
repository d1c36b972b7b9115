//! Population quotas.
//!
//! A [`SpawnQuota`] states how many agents of one role a home region should
//! keep alive.  With `per_source` set the minimum counts per energy source
//! in that region, so a region with two sources and a per-source minimum of
//! 1 wants two agents.

use hive_agent::Role;
use hive_core::RegionId;

/// Minimum live population of `role` homed in `home`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnQuota {
    pub role:       Role,
    pub home:       RegionId,
    pub minimum:    u32,
    pub per_source: bool,
    /// Remote region handed to agents produced for this quota.
    pub remote:     Option<RegionId>,
}

impl SpawnQuota {
    pub fn new(role: Role, home: RegionId, minimum: u32) -> Self {
        Self { role, home, minimum, per_source: false, remote: None }
    }

    /// A quota of `minimum` agents for every source in `home`.
    pub fn per_source(role: Role, home: RegionId, minimum: u32) -> Self {
        Self { role, home, minimum, per_source: true, remote: None }
    }

    pub fn with_remote(mut self, remote: RegionId) -> Self {
        self.remote = Some(remote);
        self
    }

    /// The effective minimum for a home region holding `sources` sources.
    #[inline]
    pub fn resolve(&self, sources: usize) -> usize {
        let minimum = self.minimum as usize;
        if self.per_source { minimum * sources } else { minimum }
    }
}

/// Every quota a colony maintains, in the order production is preferred.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuotaTable {
    quotas: Vec<SpawnQuota>,
}

impl QuotaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a quota.  A later quota for the same `(role, home)` replaces the
    /// earlier one in place.
    pub fn push(&mut self, quota: SpawnQuota) {
        match self.quotas.iter_mut().find(|q| q.role == quota.role && q.home == quota.home) {
            Some(existing) => *existing = quota,
            None => self.quotas.push(quota),
        }
    }

    pub fn with(mut self, quota: SpawnQuota) -> Self {
        self.push(quota);
        self
    }

    pub fn get(&self, role: Role, home: RegionId) -> Option<&SpawnQuota> {
        self.quotas.iter().find(|q| q.role == role && q.home == home)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpawnQuota> + '_ {
        self.quotas.iter()
    }

    /// Distinct home regions named by any quota, in first-seen order.
    pub fn homes(&self) -> Vec<RegionId> {
        let mut homes: Vec<RegionId> = Vec::new();
        for q in &self.quotas {
            if !homes.contains(&q.home) {
                homes.push(q.home);
            }
        }
        homes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.quotas.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }
}

impl FromIterator<SpawnQuota> for QuotaTable {
    fn from_iter<I: IntoIterator<Item = SpawnQuota>>(iter: I) -> Self {
        let mut table = QuotaTable::new();
        for q in iter {
            table.push(q);
        }
        table
    }
}
