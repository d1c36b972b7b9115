//! Role behavior as data.
//!
//! Every role runs the same driver ([`TaskAssignor`](crate::TaskAssignor));
//! what differs is captured in one [`RoleConfig`] per role:
//!
//! | Field        | Meaning                                                   |
//! |--------------|-----------------------------------------------------------|
//! | `priority`   | collect priority when the agent carries none of its own   |
//! | `gather`     | how the agent fills its store                             |
//! | `work`       | how it empties it (`None` for roles that only gather)     |
//! | `transition` | when it switches between the two                          |
//! | `picks_misc` | whether loose non-energy resources pre-empt everything    |

use std::collections::BTreeMap;

use hive_agent::{Role, TargetKind};
use hive_core::EntityKind;

/// Structures with more hits than this are never picked for repair.
pub const REPAIR_CEILING: u32 = 150_000;

/// When to switch between gathering and working.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transition {
    /// Gather until completely full, then work until completely empty.
    Hysteresis,
    /// Work whenever carrying anything; gather only when empty.
    WhileCarrying,
    /// Never stop gathering (or exploring).
    Static,
}

/// Which region a priority collect searches.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scope {
    /// The region the agent is standing in.
    Current,
    /// The agent's `remote` region; the agent travels there first.
    Remote,
}

/// How an agent fills its store.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gather {
    /// Walk the priority list and take energy from the first kind that has
    /// a candidate.
    Priority(Scope),
    /// Pick up energy dropped around the agent's reserved source.
    SourceDrops,
    /// Mine the agent's reserved source and unload into an adjacent link.
    Mine,
    /// Roam neighbouring regions and report on each one reached.
    Explore,
}

/// How an agent empties its store.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Work {
    /// Transfer into the first sink kind (in order) with room.  With
    /// `at_home` the agent returns to its home region first.
    Deliver { sinks: Vec<EntityKind>, at_home: bool },
    /// Build while there are construction sites, otherwise upgrade.
    BuildOrUpgrade,
    Upgrade,
    Repair { ceiling: u32 },
    /// Refill spawns and extensions.
    Nurse,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleConfig {
    pub priority:   Vec<TargetKind>,
    pub gather:     Gather,
    pub work:       Option<Work>,
    pub transition: Transition,
    pub picks_misc: bool,
}

impl RoleConfig {
    /// The standard behavior for `role`.
    pub fn standard(role: Role) -> Self {
        use TargetKind as T;
        let base = |gather, work, transition| RoleConfig {
            priority: Vec::new(),
            gather,
            work: Some(work),
            transition,
            picks_misc: false,
        };
        match role {
            Role::Harvester => RoleConfig {
                priority:   Vec::new(),
                gather:     Gather::Mine,
                work:       None,
                transition: Transition::Static,
                picks_misc: false,
            },
            Role::Hauler => base(
                Gather::SourceDrops,
                Work::Deliver {
                    sinks:   vec![EntityKind::Tower, EntityKind::Container, EntityKind::Storage],
                    at_home: true,
                },
                Transition::Hysteresis,
            ),
            Role::Courier => RoleConfig {
                priority: vec![T::Tombstone, T::Ruin, T::DroppedResource, T::Storage],
                picks_misc: true,
                ..base(
                    Gather::Priority(Scope::Current),
                    Work::Deliver {
                        sinks:   vec![EntityKind::Container, EntityKind::Tower, EntityKind::Storage],
                        at_home: false,
                    },
                    Transition::Hysteresis,
                )
            },
            Role::Nurse => RoleConfig {
                priority: vec![T::ContainerOrStorage, T::DroppedResource, T::Ruin, T::Tombstone],
                ..base(Gather::Priority(Scope::Current), Work::Nurse, Transition::WhileCarrying)
            },
            Role::Worker => RoleConfig {
                priority: vec![T::ContainerOrStorage, T::DroppedResource],
                ..base(Gather::Priority(Scope::Current), Work::BuildOrUpgrade, Transition::WhileCarrying)
            },
            Role::Upgrader => base(Gather::Priority(Scope::Current), Work::Upgrade, Transition::Hysteresis),
            Role::Repairer => base(
                Gather::Priority(Scope::Current),
                Work::Repair { ceiling: REPAIR_CEILING },
                Transition::WhileCarrying,
            ),
            Role::Pillager => RoleConfig {
                priority: vec![T::Ruin, T::Tombstone],
                ..base(
                    Gather::Priority(Scope::Remote),
                    Work::Deliver {
                        sinks:   vec![EntityKind::Container, EntityKind::Storage],
                        at_home: true,
                    },
                    Transition::Hysteresis,
                )
            },
            Role::RemoteHarvester => base(
                Gather::Mine,
                Work::Deliver {
                    sinks:   vec![EntityKind::Container, EntityKind::Storage],
                    at_home: true,
                },
                Transition::Hysteresis,
            ),
            Role::Scout => RoleConfig {
                priority:   Vec::new(),
                gather:     Gather::Explore,
                work:       None,
                transition: Transition::Static,
                picks_misc: false,
            },
        }
    }

    /// `priority`, or the default list when it is empty.
    pub fn priority_or_default(&self) -> &[TargetKind] {
        if self.priority.is_empty() { &TargetKind::DEFAULT_PRIORITY } else { &self.priority }
    }
}

/// Behavior for every role, overridable per colony.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoleTable {
    configs: BTreeMap<Role, RoleConfig>,
}

impl Default for RoleTable {
    fn default() -> Self {
        Self { configs: Role::ALL.into_iter().map(|r| (r, RoleConfig::standard(r))).collect() }
    }
}

impl RoleTable {
    /// A table with no roles configured.
    pub fn empty() -> Self {
        Self { configs: BTreeMap::new() }
    }

    #[inline]
    pub fn get(&self, role: Role) -> Option<&RoleConfig> {
        self.configs.get(&role)
    }

    pub fn set(&mut self, role: Role, config: RoleConfig) {
        self.configs.insert(role, config);
    }

    pub fn with(mut self, role: Role, config: RoleConfig) -> Self {
        self.set(role, config);
        self
    }

    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.configs.keys().copied()
    }
}
