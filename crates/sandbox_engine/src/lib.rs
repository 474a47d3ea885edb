//! # Sandbox Engine
//!
//! A 2D sandbox world engine for placement-heavy building games.
//!
//! ## Features
//!
//! - **Sprite Pooling**: Renderable + physics instances are recycled per
//!   resource key instead of allocated per placement
//! - **Placement Registry**: Authoritative world-instance bookkeeping with
//!   transforms, collision flags, selection, and explicit draw order
//! - **Viewport Culling**: Off-screen entries are hidden, never removed
//! - **Persistence Bridge**: Worlds serialize to an ordered attribute list
//!   and restore with identical instance ids
//! - **Engine-Agnostic**: The core depends on a small `Renderable`
//!   capability set implemented by an adapter around the host engine
//!
//! ## Quick Start
//!
//! ```rust
//! use sandbox_engine::prelude::*;
//!
//! // Resources are resolved by the host before placement; the headless
//! // adapter stands in for a real rendering engine here.
//! let mut factory = HeadlessFactory::new();
//! factory.register("oak-tree", Vec2::new(16.0, 16.0));
//!
//! let pool = SpritePool::new(Box::new(factory));
//! let mut world = PlacementRegistry::new(pool);
//!
//! let id = world.place(&ResourceKey::new("oak-tree"), 120.0, 48.0, PlaceOptions::new())?;
//! world.rotate(id, 0.25)?;
//!
//! let culling = CullingPass::new();
//! culling.recompute(
//!     Rect::new(Vec2::new(0.0, 0.0), Vec2::new(640.0, 360.0)),
//!     &mut world,
//! );
//! # Ok::<(), sandbox_engine::world::WorldError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod renderable;
pub mod pool;
pub mod world;
pub mod culling;
pub mod events;
pub mod persistence;
pub mod config;
pub mod diagnostics;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::math::{Vec2, Point2, Rect},
        renderable::{Renderable, ResourceKey, BodyConfig, HeadlessFactory, HeadlessRenderable},
        pool::{SpritePool, RenderableFactory, PoolError, PoolStats},
        world::{PlacementRegistry, PlacementEntry, PlaceOptions, InstanceId, WorldError},
        culling::{CullingPass, CullingConfig, CullStats},
        events::{WorldEvent, WorldListener},
        persistence::{SavedPlacement, StateStore, MemoryStore, save_world, load_world},
        config::{Config, WorldConfig},
        diagnostics::{DiagnosticsSink, DiagnosticEvent, LogSink},
    };
}
