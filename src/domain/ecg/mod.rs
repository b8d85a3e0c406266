//! Raw ECG records as handed over by the data layer. Read-only inputs to the
//! drawing builders.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
