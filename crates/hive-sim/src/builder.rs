//! Fluent builder for constructing a [`Colony`].

use std::collections::{BTreeSet, HashSet};

use hive_agent::{AgentRngs, AgentStore, RegionMemory, Role};
use hive_behavior::{RoleTable, TaskAssignor};
use hive_mobility::MovementCoordinator;
use hive_spatial::{AStarSearch, GridSearch};
use hive_spawn::QuotaTable;

use crate::{AgentBudget, Colony, ColonyConfig, SimError, SimResult, TickBudget, Unlimited, WallClockBudget};

/// Fluent builder for [`Colony<S>`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                                             |
/// |-------------------|-----------------------------------------------------|
/// | `.agents(s, r)`   | Empty store, RNGs seeded from `config.seed`         |
/// | `.quotas(q)`      | No quotas (nothing is ever spawned)                 |
/// | `.roles(t)`       | [`RoleTable::default`], every role's standard config |
/// | `.budget(b)`      | From `config.cpu_budget_ms`, else unlimited         |
/// | `.agent_limit(n)` | Shorthand for `.budget(AgentBudget::new(n))`        |
///
/// # Example
///
/// ```rust,ignore
/// let mut colony = ColonyBuilder::new(ColonyConfig::seeded(42))
///     .quotas(load_quotas_csv(Path::new("quotas.csv"))?)
///     .build()?;
/// loop {
///     colony.run_tick(&mut world, &mut NoopObserver)?;
///     world.end_tick();
/// }
/// ```
pub struct ColonyBuilder<S: GridSearch = AStarSearch> {
    config: ColonyConfig,
    agents: Option<(AgentStore, AgentRngs)>,
    quotas: QuotaTable,
    roles:  RoleTable,
    budget: Option<Box<dyn TickBudget>>,
    search: S,
}

impl ColonyBuilder<AStarSearch> {
    pub fn new(config: ColonyConfig) -> Self {
        Self::with_search(config, AStarSearch)
    }
}

impl<S: GridSearch> ColonyBuilder<S> {
    /// Create a builder whose path finder runs `search`.
    pub fn with_search(config: ColonyConfig, search: S) -> Self {
        Self {
            config,
            agents: None,
            quotas: QuotaTable::new(),
            roles:  RoleTable::default(),
            budget: None,
            search,
        }
    }

    /// Resume from existing agent memory, e.g. restored from persistence.
    /// `rngs` must carry the config's seed.
    pub fn agents(mut self, store: AgentStore, rngs: AgentRngs) -> Self {
        self.agents = Some((store, rngs));
        self
    }

    pub fn quotas(mut self, quotas: QuotaTable) -> Self {
        self.quotas = quotas;
        self
    }

    pub fn roles(mut self, roles: RoleTable) -> Self {
        self.roles = roles;
        self
    }

    pub fn budget(mut self, budget: impl TickBudget + 'static) -> Self {
        self.budget = Some(Box::new(budget));
        self
    }

    pub fn agent_limit(self, limit: usize) -> Self {
        self.budget(AgentBudget::new(limit))
    }

    /// Validate inputs and return a ready-to-run [`Colony`].
    pub fn build(self) -> SimResult<Colony<S>> {
        if self.config.cpu_budget_ms == Some(0) {
            return Err(SimError::Config("cpu_budget_ms must be positive".into()));
        }

        let (agents, rngs) = self
            .agents
            .unwrap_or_else(|| (AgentStore::new(), AgentRngs::new(self.config.seed)));
        if rngs.seed() != self.config.seed {
            return Err(SimError::Config(format!(
                "agent RNG seed {} does not match config seed {}",
                rngs.seed(),
                self.config.seed
            )));
        }

        // ── Every role in play needs a behavior ───────────────────────────
        let in_play: BTreeSet<Role> = agents
            .iter()
            .map(|(_, m)| m.role)
            .chain(self.quotas.iter().map(|q| q.role))
            .collect();
        if let Some(role) = in_play.into_iter().find(|&r| self.roles.get(r).is_none()) {
            return Err(SimError::Config(format!("no behavior configured for role {role}")));
        }

        let budget = match (self.budget, self.config.cpu_budget_ms) {
            (Some(b), _) => b,
            (None, Some(ms)) => Box::new(WallClockBudget::from_millis(ms)) as Box<dyn TickBudget>,
            (None, None) => Box::new(Unlimited),
        };

        Ok(Colony {
            assignor: TaskAssignor::new(self.roles, self.config.move_options),
            mover: MovementCoordinator::with_search(self.search),
            config: self.config,
            agents,
            rngs,
            quotas: self.quotas,
            regions: RegionMemory::new(),
            budget,
            warned: HashSet::new(),
        })
    }
}
