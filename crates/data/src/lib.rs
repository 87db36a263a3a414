//! Loading of draw settings and roster presets from an assets directory.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
