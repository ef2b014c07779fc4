pub mod features;
pub mod http;
pub mod protocol;
pub mod request;
pub mod residency;

pub use features::*;
pub use http::*;
pub use protocol::*;
pub use request::*;
pub use residency::*;
