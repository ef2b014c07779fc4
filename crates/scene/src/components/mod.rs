pub mod color;
pub mod label;
pub mod point;
pub mod properties;
pub mod translucency;

pub use color::*;
pub use label::*;
pub use point::*;
pub use properties::*;
pub use translucency::*;
