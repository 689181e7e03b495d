pub mod query;
pub mod request;

pub use query::*;
pub use request::*;
