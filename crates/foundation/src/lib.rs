pub mod bounds;
pub mod math;
pub mod tile;
pub mod tiling;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use tile::*;
pub use tiling::*;
