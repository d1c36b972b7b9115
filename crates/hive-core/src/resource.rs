//! Resource kinds and per-holder inventories.
//!
//! Every object that can hold resources (agents, containers, tombstones, …)
//! exposes the same [`Inventory`]: a single shared capacity and a per-kind
//! amount.  Sources are the one exception: they regenerate energy and are
//! modelled by the world as an inventory containing only energy.

use std::collections::BTreeMap;
use std::fmt;

/// A kind of resource.  `Energy` is the primary resource; everything else is
/// "misc" loot that only couriers bother to collect.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ResourceKind {
    #[default]
    Energy,
    Power,
    Hydrogen,
    Oxygen,
    Utrium,
    Keanium,
    Lemergium,
    Zynthium,
    Catalyst,
    Ghodium,
}

impl ResourceKind {
    #[inline]
    pub fn is_energy(self) -> bool {
        matches!(self, ResourceKind::Energy)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Energy    => "energy",
            ResourceKind::Power     => "power",
            ResourceKind::Hydrogen  => "H",
            ResourceKind::Oxygen    => "O",
            ResourceKind::Utrium    => "U",
            ResourceKind::Keanium   => "K",
            ResourceKind::Lemergium => "L",
            ResourceKind::Zynthium  => "Z",
            ResourceKind::Catalyst  => "X",
            ResourceKind::Ghodium   => "G",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Inventory ─────────────────────────────────────────────────────────────────

/// Resources held by one object, sharing a single capacity.
///
/// Kinds with a zero amount are never stored, so `kinds()` only yields
/// resources that are actually present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    capacity: u32,
    amounts:  BTreeMap<ResourceKind, u32>,
}

impl Inventory {
    pub fn with_capacity(capacity: u32) -> Self {
        Self { capacity, amounts: BTreeMap::new() }
    }

    /// An inventory already holding `amount` of `kind` (capacity grows to fit).
    pub fn holding(capacity: u32, kind: ResourceKind, amount: u32) -> Self {
        let mut inv = Self::with_capacity(capacity.max(amount));
        inv.add(kind, amount);
        inv
    }

    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Total units held across every kind.
    pub fn used(&self) -> u32 {
        self.amounts.values().sum()
    }

    #[inline]
    pub fn free(&self) -> u32 {
        self.capacity.saturating_sub(self.used())
    }

    #[inline]
    pub fn get(&self, kind: ResourceKind) -> u32 {
        self.amounts.get(&kind).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free() == 0
    }

    /// Kinds with a non-zero amount, in `ResourceKind` order.
    pub fn kinds(&self) -> impl Iterator<Item = ResourceKind> + '_ {
        self.amounts.keys().copied()
    }

    /// `true` if anything other than energy is held.
    pub fn has_misc(&self) -> bool {
        self.kinds().any(|k| !k.is_energy())
    }

    /// Add up to `amount` units of `kind`; returns how many were accepted.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let accepted = amount.min(self.free());
        if accepted > 0 {
            *self.amounts.entry(kind).or_insert(0) += accepted;
        }
        accepted
    }

    /// Remove up to `amount` units of `kind`; returns how many were removed.
    pub fn remove(&mut self, kind: ResourceKind, amount: u32) -> u32 {
        let held = self.get(kind);
        let taken = amount.min(held);
        if taken == held {
            self.amounts.remove(&kind);
        } else {
            self.amounts.insert(kind, held - taken);
        }
        taken
    }
}
