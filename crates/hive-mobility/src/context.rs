//! Mutable colony state shared by movement calls within one tick.

use hive_agent::{AgentRngs, AgentStore};

/// Everything a movement call touches besides the coordinator itself.
///
/// The agent being evaluated has its memory taken out of `agents` and passed
/// separately; `agents` still answers for every other agent, which is what
/// shove resolution needs (the occupant's anchor).
pub struct MoveContext<'a, W: ?Sized> {
    pub world:  &'a mut W,
    pub agents: &'a AgentStore,
    pub rngs:   &'a mut AgentRngs,
}

impl<'a, W: ?Sized> MoveContext<'a, W> {
    #[inline]
    pub fn new(world: &'a mut W, agents: &'a AgentStore, rngs: &'a mut AgentRngs) -> Self {
        Self { world, agents, rngs }
    }
}
