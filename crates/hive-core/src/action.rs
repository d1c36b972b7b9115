//! Result codes returned by the simulation for every issued action.
//!
//! These are ordinary values, not errors: none of them is fatal, and every
//! caller's recovery is "try again (differently) next tick".

use std::fmt;

/// Outcome of a move or interaction request.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Ok,
    /// The target is not close enough; move towards it.
    NotInRange,
    /// The actor cannot act this tick (still spawning, or the blocking agent
    /// has already moved).
    Busy,
    /// The target no longer exists or cannot take part in this interaction.
    InvalidTarget,
    /// Nothing of the requested resource to take.
    NotEnoughResources,
    /// No room left to receive the resource.
    Full,
    /// No path to the goal could be found.
    NoPath,
    /// The tile in that direction cannot be entered.
    Blocked,
    /// The actor or target belongs to someone else.
    NotOwner,
}

impl ActionResult {
    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, ActionResult::Ok)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActionResult::Ok                 => "ok",
            ActionResult::NotInRange         => "not_in_range",
            ActionResult::Busy               => "busy",
            ActionResult::InvalidTarget      => "invalid_target",
            ActionResult::NotEnoughResources => "not_enough_resources",
            ActionResult::Full               => "full",
            ActionResult::NoPath             => "no_path",
            ActionResult::Blocked            => "blocked",
            ActionResult::NotOwner           => "not_owner",
        }
    }
}

impl fmt::Display for ActionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
