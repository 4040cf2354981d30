//! Repository layer: entity-scoped database operations.

mod tender;

pub use tender::*;
