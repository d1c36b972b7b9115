//! `hive-spatial`: cost matrices, grid search, and path encoding.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`view`]   | `RegionView` trait, `StructureTile`                           |
//! | [`cost`]   | `CostMatrix`, `CostMatrixCache` (per-region, per-tick oracle) |
//! | [`search`] | `GridSearch` trait, `CostField`, `AStarSearch`                |
//! | [`finder`] | `PathFinder`, `PathOptions` (budget back-off)                 |
//! | [`codec`]  | `SerializedPath` (`XXYY` + direction codes)                   |
//! | [`error`]  | `SpatialError`, `CodecError`, `SpatialResult<T>`              |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | `CostMatrixCache::prewarm` builds regions with Rayon.     |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod codec;
pub mod cost;
pub mod error;
pub mod finder;
pub mod search;
pub mod view;


pub use codec::SerializedPath;
pub use cost::{BLOCKED, CostMatrix, CostMatrixCache, ROAD_COST};
pub use error::{CodecError, SpatialError, SpatialResult};
pub use finder::{PathFinder, PathOptions};
pub use search::{AStarSearch, CostField, GridSearch, SearchGoal, SearchLimits, SearchOutcome};
pub use view::{RegionView, StructureTile};
