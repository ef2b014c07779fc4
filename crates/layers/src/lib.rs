pub mod cities;
pub mod labels;
pub mod viewer;

pub use cities::*;
pub use viewer::*;
