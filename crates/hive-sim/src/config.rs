//! Colony-wide settings.

use hive_mobility::MoveOptions;

/// Settings fixed for the lifetime of a [`Colony`](crate::Colony).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColonyConfig {
    /// Seed for every per-agent RNG (shove tie-breaks).
    pub seed: u64,
    /// Wall-clock budget for one tick of assignment, in milliseconds.
    /// `None` runs every agent every tick.
    pub cpu_budget_ms: Option<u64>,
    /// Movement options used by the task assignor; its `range` is overridden
    /// per interaction.
    pub move_options: MoveOptions,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self { seed: 0, cpu_budget_ms: None, move_options: MoveOptions::default() }
    }
}

impl ColonyConfig {
    pub fn seeded(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }
}
