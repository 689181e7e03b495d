pub mod event_bus;
pub mod filter;
pub mod map;
pub mod sync;

pub use event_bus::*;
pub use filter::*;
pub use map::*;
pub use sync::*;
