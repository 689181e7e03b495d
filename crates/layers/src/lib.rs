pub mod extrusion;
pub mod layer;
pub mod symbology;

pub use layer::*;
