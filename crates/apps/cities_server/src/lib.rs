pub mod geonames;
pub mod quadtree;
pub mod routes;

pub use routes::*;
