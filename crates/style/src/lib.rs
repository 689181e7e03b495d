pub mod description;
pub mod options;
pub mod renderer;

pub use description::*;
pub use options::*;
pub use renderer::*;
