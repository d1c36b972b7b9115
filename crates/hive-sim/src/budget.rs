//! Per-tick processing budgets.
//!
//! [`Colony::run_assignment`](crate::Colony::run_assignment) asks the budget
//! before every agent and stops once it reports exhaustion.  Agents not
//! reached keep their memory untouched until the next tick.

use std::time::{Duration, Instant};

pub trait TickBudget {
    /// A new tick begins.
    fn start(&mut self);

    /// One agent has been evaluated.
    fn charge(&mut self) {}

    fn exhausted(&self) -> bool;
}

/// Never runs out.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unlimited;

impl TickBudget for Unlimited {
    fn start(&mut self) {}

    #[inline]
    fn exhausted(&self) -> bool {
        false
    }
}

/// Runs out `limit` after [`start`](TickBudget::start).
#[derive(Clone, Debug)]
pub struct WallClockBudget {
    limit:   Duration,
    started: Option<Instant>,
}

impl WallClockBudget {
    pub fn new(limit: Duration) -> Self {
        Self { limit, started: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl TickBudget for WallClockBudget {
    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn exhausted(&self) -> bool {
        self.started.is_some_and(|t| t.elapsed() >= self.limit)
    }
}

/// Runs out after `limit` agents.  Deterministic, for tests and replays.
#[derive(Copy, Clone, Debug)]
pub struct AgentBudget {
    limit: usize,
    used:  usize,
}

impl AgentBudget {
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }
}

impl TickBudget for AgentBudget {
    fn start(&mut self) {
        self.used = 0;
    }

    fn charge(&mut self) {
        self.used += 1;
    }

    fn exhausted(&self) -> bool {
        self.used >= self.limit
    }
}
