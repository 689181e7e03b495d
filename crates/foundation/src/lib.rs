pub mod color;
pub mod date;

// Foundation crate: small, well-tested primitives only.
pub use color::*;
pub use date::*;
