pub mod collection;
pub mod components;
pub mod entity;
pub mod event;
pub mod picking;

pub use collection::*;
pub use entity::*;
