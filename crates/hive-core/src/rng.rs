//! Deterministic per-agent RNG.
//!
//! The only randomness in the controller is the shove fallback: an agent
//! asked to make way with no anchor of its own picks any free neighbouring
//! tile.  Each agent draws from its own `SmallRng` seeded by
//!
//!   seed = colony_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! so spawning or evicting one agent never changes what another one picks,
//! and a colony replayed with the same seed makes the same choices.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-agent deterministic RNG.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the colony seed and an agent ID.
    pub fn new(colony_seed: u64, agent: AgentId) -> Self {
        let seed = colony_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// Expose the inner `SmallRng` for `rand` APIs not wrapped here.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Choose a random element, or `None` if the slice is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.0)
    }
}
