//! What scouts have seen of regions beyond the colony's own.
//!
//! Reports are colony-wide rather than per agent: a [`RegionReport`] is
//! produced by whichever scout arrives in a region and kept in the colony's
//! [`RegionMemory`], newest report winning.

use std::collections::BTreeMap;

use hive_core::{EntityId, Position, RegionId, Tick};

/// A region's controller as last seen.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControllerReport {
    pub id:       EntityId,
    pub pos:      Position,
    pub owned:    bool,
    pub progress: u32,
}

/// The facts recorded about one region on a visit.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionReport {
    pub region:     RegionId,
    /// Tick the report was taken.
    pub seen:       Tick,
    pub sources:    Vec<(EntityId, Position)>,
    pub controller: Option<ControllerReport>,
}

/// The latest report per region.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionMemory {
    reports: BTreeMap<RegionId, RegionReport>,
}

impl RegionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `report`, replacing an older one for the same region.  A report
    /// older than the one held is ignored; returns whether it was kept.
    pub fn record(&mut self, report: RegionReport) -> bool {
        match self.reports.get(&report.region) {
            Some(held) if held.seen > report.seen => false,
            _ => {
                self.reports.insert(report.region, report);
                true
            }
        }
    }

    #[inline]
    pub fn get(&self, region: RegionId) -> Option<&RegionReport> {
        self.reports.get(&region)
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Reports in region order.
    pub fn iter(&self) -> impl Iterator<Item = &RegionReport> + '_ {
        self.reports.values()
    }
}
