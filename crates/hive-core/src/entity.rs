//! Kinds of non-agent world objects and their static capabilities.
//!
//! The simulation reports objects as a closed set of kinds rather than as
//! arbitrary "things with a store", so every capability question (does it
//! block movement, does it accept this resource) is a `match` here.

use std::fmt;

use crate::ResourceKind;

/// Every kind of non-agent object the controller reasons about.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKind {
    Source,
    Controller,
    Spawn,
    Extension,
    Tower,
    Container,
    Storage,
    Link,
    Road,
    Wall,
    Rampart,
    ConstructionSite,
    Tombstone,
    Ruin,
    DroppedResource,
}

impl EntityKind {
    /// `true` for objects that occupy a tile permanently (structures plus
    /// sources and controllers).  These are what the cost oracle scans.
    pub fn is_fixture(self) -> bool {
        !matches!(
            self,
            EntityKind::ConstructionSite
                | EntityKind::Tombstone
                | EntityKind::Ruin
                | EntityKind::DroppedResource
        )
    }

    /// `true` if an agent cannot stand on a tile holding this object.
    ///
    /// Roads and containers are walkable; ramparts are walkable only for
    /// their owner.
    pub fn blocks_movement(self, owned: bool) -> bool {
        match self {
            EntityKind::Road | EntityKind::Container => false,
            EntityKind::Rampart => !owned,
            other => other.is_fixture(),
        }
    }

    /// `true` if an agent may transfer `resource` into this object.
    pub fn accepts(self, resource: ResourceKind) -> bool {
        match self {
            EntityKind::Spawn | EntityKind::Extension | EntityKind::Tower | EntityKind::Link => {
                resource.is_energy()
            }
            EntityKind::Container | EntityKind::Storage => true,
            _ => false,
        }
    }

    /// Human-readable label.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Source           => "source",
            EntityKind::Controller       => "controller",
            EntityKind::Spawn            => "spawn",
            EntityKind::Extension        => "extension",
            EntityKind::Tower            => "tower",
            EntityKind::Container        => "container",
            EntityKind::Storage          => "storage",
            EntityKind::Link             => "link",
            EntityKind::Road             => "road",
            EntityKind::Wall             => "wall",
            EntityKind::Rampart          => "rampart",
            EntityKind::ConstructionSite => "construction_site",
            EntityKind::Tombstone        => "tombstone",
            EntityKind::Ruin             => "ruin",
            EntityKind::DroppedResource  => "dropped_resource",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
