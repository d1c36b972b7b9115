//! The per-tick move registry.

use hive_core::{AgentId, Position, Tick};

#[cfg(feature = "fx-hash")]
type AgentSet = rustc_hash::FxHashSet<AgentId>;
#[cfg(not(feature = "fx-hash"))]
type AgentSet = std::collections::HashSet<AgentId>;

#[cfg(feature = "fx-hash")]
type TileSet = rustc_hash::FxHashSet<Position>;
#[cfg(not(feature = "fx-hash"))]
type TileSet = std::collections::HashSet<Position>;

/// Agents that have already issued a move this tick, and the tiles their
/// accepted moves lead to.
///
/// There is no explicit "begin tick" call.  Every access passes the current
/// tick; the first access with a tick different from the one last seen
/// clears the set.  The registry is therefore correct no matter when, or how
/// often, the driver calls into movement.
#[derive(Debug, Default)]
pub struct MoveRegistry {
    tick:    Option<Tick>,
    moved:   AgentSet,
    claimed: TileSet,
}

impl MoveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the set if `now` is a tick the registry has not seen yet.
    fn sync(&mut self, now: Tick) {
        if self.tick != Some(now) {
            self.moved.clear();
            self.claimed.clear();
            self.tick = Some(now);
        }
    }

    /// Record that `agent` moved during `now`.  Returns `false` if it had
    /// already moved this tick.
    pub fn record(&mut self, now: Tick, agent: AgentId) -> bool {
        self.sync(now);
        self.moved.insert(agent)
    }

    /// `true` if `agent` has issued a move during `now`.
    pub fn has_moved(&mut self, now: Tick, agent: AgentId) -> bool {
        self.sync(now);
        self.moved.contains(&agent)
    }

    /// Record that an accepted move during `now` ends on `pos`.
    pub fn claim(&mut self, now: Tick, pos: Position) {
        self.sync(now);
        self.claimed.insert(pos);
    }

    /// `true` if some agent's move during `now` ends on `pos`.
    pub fn is_claimed(&mut self, now: Tick, pos: Position) -> bool {
        self.sync(now);
        self.claimed.contains(&pos)
    }

    /// Number of agents that moved during `now`.
    pub fn moved_count(&mut self, now: Tick) -> usize {
        self.sync(now);
        self.moved.len()
    }

    /// The tick of the last reset, if any.
    #[inline]
    pub fn last_reset(&self) -> Option<Tick> {
        self.tick
    }
}
