//! `hive-mobility`: moving agents along cached paths and resolving
//! collisions.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`registry`]    | `MoveRegistry`: agents that moved this tick (lazy reset)    |
//! | [`options`]     | `MoveOptions`: range, search settings, stop-at-unknown      |
//! | [`context`]     | `MoveContext<'a, W>`: world, agent store, RNGs for one call |
//! | [`coordinator`] | `MovementCoordinator`: `move_towards`, `step`, `shove`      |
//! | [`error`]       | `MobilityError`, `MobilityResult<T>`                         |
//!
//! # Movement model
//!
//! Moves are intents: the world applies them when the tick ends, so every
//! query made during the tick (occupants in particular) sees start-of-tick
//! positions.  An agent shoved aside and the agent that shoved it therefore
//! trade places cleanly at the end of the tick.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | `MoveRegistry` uses `FxHashSet` instead of `HashSet`.   |
//! | `serde`   | Derives `Serialize`/`Deserialize` on `MoveOptions`.     |

pub mod context;
pub mod coordinator;
pub mod error;
pub mod options;
pub mod registry;

#[cfg(test)]
mod tests;

pub use context::MoveContext;
pub use coordinator::MovementCoordinator;
pub use error::{MobilityError, MobilityResult};
pub use options::MoveOptions;
pub use registry::MoveRegistry;
