//! Per-agent persisted memory.
//!
//! Everything the controller remembers about an agent between ticks lives in
//! one [`AgentMemory`] record.  The engine owns the agent's body (position,
//! store); the controller owns this.

use std::fmt;
use std::str::FromStr;

use hive_core::{EntityId, EntityKind, HiveError, Position, RegionId};
use hive_spatial::SerializedPath;

// ── Role ──────────────────────────────────────────────────────────────────────

/// What an agent was produced to do.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "lowercase"))]
pub enum Role {
    /// Static miner bound to one source.
    Harvester,
    /// Carries energy dropped at its reserved source back to the hub.
    Hauler,
    /// Sweeps up loose resources and stocks containers and towers.
    Courier,
    /// Refills spawns and extensions.
    Nurse,
    /// Builds when there is construction, upgrades otherwise.
    Worker,
    /// Upgrades the controller.
    Upgrader,
    /// Repairs damaged structures.
    Repairer,
    /// Drains ruins and tombstones in a remote region.
    Pillager,
    /// Mines a source in a remote region and carries the energy home.
    RemoteHarvester,
    /// Wanders between neighbouring regions and reports what it sees.
    Scout,
}

impl Role {
    pub const ALL: [Role; 10] = [
        Role::Harvester,
        Role::Hauler,
        Role::Courier,
        Role::Nurse,
        Role::Worker,
        Role::Upgrader,
        Role::Repairer,
        Role::Pillager,
        Role::RemoteHarvester,
        Role::Scout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Harvester       => "harvester",
            Role::Hauler          => "hauler",
            Role::Courier         => "courier",
            Role::Nurse           => "nurse",
            Role::Worker          => "worker",
            Role::Upgrader        => "upgrader",
            Role::Repairer        => "repairer",
            Role::Pillager        => "pillager",
            Role::RemoteHarvester => "remoteharvester",
            Role::Scout           => "scout",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| HiveError::Parse(format!("unknown role {s:?}")))
    }
}

// ── Status ────────────────────────────────────────────────────────────────────

/// The agent's current state-machine state.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    Collect,
    Deliver,
    Build,
    Upgrade,
    Repair,
    Nurse,
    /// Courier: gathering non-energy resources lying around.
    Pick,
    /// Harvester: mining its source.
    Harvest,
    /// Scout: travelling to the next region to report on.
    Scout,
}

impl Status {
    /// Text the agent says when it enters this status.
    pub fn label(self) -> &'static str {
        match self {
            Status::Collect => "🔄 Collect",
            Status::Deliver => "🚚 Deliver",
            Status::Build   => "🚧 Build",
            Status::Upgrade => "⚡ Upgrade",
            Status::Repair  => "🔧 Repair",
            Status::Nurse   => "🍼 Nurse",
            Status::Pick    => "🧺 Pick",
            Status::Harvest => "⛏ Harvest",
            Status::Scout   => "🔭 Scout",
        }
    }

    /// `true` for the states that spend the agent's store.
    pub fn is_work(self) -> bool {
        !matches!(self, Status::Collect | Status::Pick | Status::Harvest | Status::Scout)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// A tag in a collect priority list.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    Tombstone,
    Ruin,
    DroppedResource,
    Container,
    Storage,
    ContainerOrStorage,
    Link,
    Spawn,
    Source,
}

impl TargetKind {
    /// Priority used by agents whose memory carries no list of its own.
    pub const DEFAULT_PRIORITY: [TargetKind; 5] = [
        TargetKind::Tombstone,
        TargetKind::Ruin,
        TargetKind::ContainerOrStorage,
        TargetKind::DroppedResource,
        TargetKind::Source,
    ];

    /// Entity kinds this tag covers.
    pub fn entity_kinds(self) -> &'static [EntityKind] {
        match self {
            TargetKind::Tombstone          => &[EntityKind::Tombstone],
            TargetKind::Ruin               => &[EntityKind::Ruin],
            TargetKind::DroppedResource    => &[EntityKind::DroppedResource],
            TargetKind::Container          => &[EntityKind::Container],
            TargetKind::Storage            => &[EntityKind::Storage],
            TargetKind::ContainerOrStorage => &[EntityKind::Container, EntityKind::Storage],
            TargetKind::Link               => &[EntityKind::Link],
            TargetKind::Spawn              => &[EntityKind::Spawn],
            TargetKind::Source             => &[EntityKind::Source],
        }
    }

    #[inline]
    pub fn matches(self, kind: EntityKind) -> bool {
        self.entity_kinds().contains(&kind)
    }

    /// Links are picked by straight-line range; every other kind by path.
    #[inline]
    pub fn by_range(self) -> bool {
        matches!(self, TargetKind::Link)
    }
}

/// The entity an agent is currently pursuing.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetRef {
    pub id:   EntityId,
    pub kind: EntityKind,
}

/// A cached route: where it leads and the remaining steps.
#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovePlan {
    pub dest: Position,
    pub path: SerializedPath,
}

// ── AgentMemory ───────────────────────────────────────────────────────────────

/// Everything the controller persists for one agent.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentMemory {
    pub role:         Role,
    /// Region the agent was produced for and counts towards.
    pub home:         RegionId,
    /// `None` until the agent's first evaluation.
    pub status:       Option<Status>,
    pub target:       Option<TargetRef>,
    /// Collect priority; empty means "use the role's list".
    pub priority:     Vec<TargetKind>,
    pub move_plan:    Option<MovePlan>,
    /// Where the agent last wanted to go.  A shoved agent prefers tiles
    /// close to it.
    pub shove_anchor: Option<Position>,
    /// Source reserved by a harvester or hauler.
    pub source:       Option<EntityId>,
    /// Remote region the agent works in.  Gathering roles take their source
    /// or loot from here instead of `home`; a scout keeps its next
    /// destination here.
    pub remote:       Option<RegionId>,
}

impl AgentMemory {
    /// Fresh memory for a newly produced agent.
    pub fn new(role: Role, home: RegionId) -> Self {
        Self {
            role,
            home,
            status: None,
            target: None,
            priority: Vec::new(),
            move_plan: None,
            shove_anchor: None,
            source: None,
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: RegionId) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<Vec<TargetKind>>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Drop the current target and any route towards it.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.move_plan = None;
    }
}
