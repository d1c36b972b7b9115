//! Colony observer trait for progress reporting and data collection.

use hive_agent::{RegionReport, Role, Status};
use hive_core::{AgentId, RegionId, Tick};

use crate::TickReport;

/// Callbacks invoked by [`Colony::run_tick`][crate::Colony::run_tick].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: transition counter
///
/// ```rust,ignore
/// struct Transitions(usize);
///
/// impl ColonyObserver for Transitions {
///     fn on_transition(&mut self, _: AgentId, _: Role, _: Option<Status>, _: Status) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait ColonyObserver {
    /// Called at the very start of each tick, before eviction.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once the tick's work is done.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// An agent changed status.
    fn on_transition(&mut self, _agent: AgentId, _role: Role, _from: Option<Status>, _to: Status) {}

    /// The world accepted a spawn request.
    fn on_spawn(&mut self, _agent: AgentId, _role: Role, _home: RegionId) {}

    /// Assignment stopped early; `remaining` agents were not evaluated.
    fn on_budget_exhausted(&mut self, _tick: Tick, _processed: usize, _remaining: usize) {}

    /// A scout surveyed a region and the report was kept.
    fn on_region_report(&mut self, _agent: AgentId, _report: &RegionReport) {}
}

/// A [`ColonyObserver`] that does nothing.
pub struct NoopObserver;

impl ColonyObserver for NoopObserver {}
