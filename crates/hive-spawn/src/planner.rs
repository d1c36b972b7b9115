//! Spawn planning: which quotas are under-filled.

use tracing::debug;

use hive_agent::Role;
use hive_core::RegionId;

use crate::{PopulationCounts, QuotaTable};

/// A role that needs production in `home`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpawnNeed {
    pub role: Role,
    pub home: RegionId,
    /// Agents alive now.
    pub have: usize,
    /// Effective minimum.
    pub want: usize,
}

impl SpawnNeed {
    #[inline]
    pub fn missing(&self) -> usize {
        self.want.saturating_sub(self.have)
    }
}

/// Compares live population against a [`QuotaTable`].
#[derive(Copy, Clone, Debug, Default)]
pub struct SpawnPlanner;

impl SpawnPlanner {
    /// Every `(role, home)` whose live count is below its effective
    /// minimum, in quota-table order.  Each pair appears at most once.
    ///
    /// Pure: production itself is up to the caller.
    pub fn evaluate(counts: &PopulationCounts, quotas: &QuotaTable) -> Vec<SpawnNeed> {
        quotas
            .iter()
            .filter_map(|q| {
                let have = counts.get(q.role, q.home);
                let want = q.resolve(counts.sources(q.home));
                (have < want).then_some(SpawnNeed { role: q.role, home: q.home, have, want })
            })
            .inspect(|n| debug!(role = %n.role, home = %n.home, have = n.have, want = n.want, "under quota"))
            .collect()
    }
}
