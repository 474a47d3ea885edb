//! World module - placement registry and instance bookkeeping
//!
//! Owns "what exists and where"; the pool owns "what can be reused".

pub mod placement;
pub mod registry;

pub use placement::{InstanceId, PlaceOptions, PlacementEntry};
pub use registry::{PlacementRegistry, WorldError};

#[cfg(test)]
mod tests;
