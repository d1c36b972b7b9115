//! `hive-world`: the simulation-engine interface.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`world`]    | `World` trait: queries, actions, spawning                  |
//! | [`snapshot`] | `EntitySnapshot`, `AgentView`, `SpawnOrder`                |
//! | [`local`]    | `LocalWorld`, an in-memory engine for tests and demos      |
//! | [`error`]    | `WorldError`, `WorldResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `LocalWorldConfig`.     |

pub mod error;
pub mod local;
pub mod snapshot;
pub mod world;


pub use error::{WorldError, WorldResult};
pub use local::{ADJACENT_RANGE, LocalWorld, LocalWorldConfig, WORK_RANGE};
pub use snapshot::{AgentView, EntitySnapshot, SpawnOrder};
pub use world::World;
