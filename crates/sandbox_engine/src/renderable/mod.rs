//! Renderable abstraction - the seam between the world core and the host engine
//!
//! The pool and registry never talk to a concrete rendering or physics
//! backend. They depend on the small capability set below, implemented by an
//! adapter around whatever engine hosts the world. A complete in-memory
//! adapter lives in [`headless`] for tests and headless tooling.

pub mod headless;

use std::any::Any;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;

pub use headless::{HeadlessRenderable, HeadlessFactory};

/// Opaque identifier naming a visual resource
///
/// Stable for the lifetime of the resource; used as the pool partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKey(String);

impl ResourceKey {
    /// Create a resource key from any string-like value
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// View the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ResourceKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Collision body parameters the core requests from the host physics engine
///
/// World objects are always static scenery: the body never moves on its own
/// and is never affected by gravity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyConfig {
    /// Body cannot be pushed by other bodies
    pub immovable: bool,
    /// Body responds to world gravity
    pub allow_gravity: bool,
    /// Initial velocity
    pub velocity: Vec2,
}

impl BodyConfig {
    /// Immovable, non-gravity, zero-velocity body for placed scenery
    pub fn static_body() -> Self {
        Self {
            immovable: true,
            allow_gravity: false,
            velocity: Vec2::zeros(),
        }
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::static_body()
    }
}

/// Capability set the world core requires from a host-engine visual instance
///
/// Implementations wrap a concrete engine object (sprite + collision body).
/// The core only toggles and resizes state through this trait; it never
/// creates engine resources itself.
pub trait Renderable {
    /// The resource this renderable is bound to
    fn resource_key(&self) -> &ResourceKey;

    /// Set world-space position
    fn set_position(&mut self, x: f32, y: f32);

    /// Set rotation in radians
    fn set_rotation(&mut self, radians: f32);

    /// Set non-uniform scale factors
    fn set_scale(&mut self, sx: f32, sy: f32);

    /// Show or hide the visual
    fn set_visible(&mut self, visible: bool);

    /// Set opacity in the [0, 1] range
    fn set_alpha(&mut self, alpha: f32);

    /// Remove any color tint
    fn clear_tint(&mut self);

    /// Re-attach the collision body with the given parameters
    fn reset_body(&mut self, config: BodyConfig);

    /// Enable or disable the collision body
    fn set_physics_enabled(&mut self, enabled: bool);

    /// Resize the collision body to match the current visual bounds
    fn sync_body_to_bounds(&mut self);

    /// Stop any in-progress animation
    fn stop_animation(&mut self);

    /// Enable or disable input interactivity
    fn set_interactive(&mut self, enabled: bool);

    /// Clear free-form attached data
    fn clear_data(&mut self);

    /// Mark the renderable active (owned by a placement) or pooled
    fn set_active(&mut self, active: bool);

    /// Whether the renderable is currently active
    fn is_active(&self) -> bool;

    /// Unscaled visual half-extent, used for conservative culling bounds
    fn base_extent(&self) -> Vec2;

    /// Downcast support for adapter-specific access
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcast support for adapter-specific access
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_key_display() {
        let key = ResourceKey::new("oak-tree");
        assert_eq!(key.as_str(), "oak-tree");
        assert_eq!(format!("{}", key), "oak-tree");
    }

    #[test]
    fn test_static_body_defaults() {
        let body = BodyConfig::default();
        assert!(body.immovable);
        assert!(!body.allow_gravity);
        assert_eq!(body.velocity, Vec2::zeros());
    }
}
