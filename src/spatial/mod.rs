//! Spatial placement, neighbor queries and collision moderation

pub mod collision;
pub mod placement;
pub mod sparse_hash;

pub use collision::{CollisionModerator, StaticObstacle};
pub use placement::{Clearance, Placement, SpatialPlacer};
pub use sparse_hash::SparseHashGrid;
