//! Per-call movement options.

use hive_spatial::PathOptions;

/// How close to get and how to search for a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOptions {
    /// Stop once within this many tiles of the target.
    pub range:           u32,
    /// Search settings handed to the path finder on replan.
    pub path:            PathOptions,
    /// Truncate new plans right after they enter a region without vision.
    pub stop_at_unknown: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self { range: 1, path: PathOptions::default(), stop_at_unknown: true }
    }
}

impl MoveOptions {
    /// Default options with a different stopping range.
    pub fn within(range: u32) -> Self {
        Self { range, ..Self::default() }
    }
}
