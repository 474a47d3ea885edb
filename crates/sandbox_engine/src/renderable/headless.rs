//! Headless renderable adapter
//!
//! A complete in-memory implementation of [`Renderable`] and
//! [`RenderableFactory`](crate::pool::RenderableFactory). Backs the test
//! suite and headless tooling; also serves as the reference for writing an
//! adapter around a real rendering engine.

use std::any::Any;
use std::collections::HashMap;

use crate::foundation::math::Vec2;
use crate::pool::{RenderableFactory, PoolError};
use super::{Renderable, ResourceKey, BodyConfig};

/// In-memory visual + physics instance
///
/// Records every state change the core performs so tests can assert on the
/// exact visual/physics state instead of a live engine object.
#[derive(Debug, Clone)]
pub struct HeadlessRenderable {
    key: ResourceKey,
    handle: u64,
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    visible: bool,
    alpha: f32,
    tint: Option<u32>,
    active: bool,
    physics_enabled: bool,
    body: BodyConfig,
    body_bounds_synced: bool,
    animating: bool,
    interactive: bool,
    data: HashMap<String, String>,
    base_extent: Vec2,
}

impl HeadlessRenderable {
    fn new(key: ResourceKey, handle: u64, base_extent: Vec2) -> Self {
        Self {
            key,
            handle,
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            visible: true,
            alpha: 1.0,
            tint: None,
            active: false,
            physics_enabled: true,
            body: BodyConfig::static_body(),
            body_bounds_synced: true,
            animating: false,
            interactive: true,
            data: HashMap::new(),
            base_extent,
        }
    }

    /// Identity handle assigned by the factory
    pub fn handle(&self) -> u64 {
        self.handle
    }

    /// Current world position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Current scale factors
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Current opacity
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Current tint, if any
    pub fn tint(&self) -> Option<u32> {
        self.tint
    }

    /// Whether the visual is shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the collision body is enabled
    pub fn physics_enabled(&self) -> bool {
        self.physics_enabled
    }

    /// Current collision body parameters
    pub fn body(&self) -> BodyConfig {
        self.body
    }

    /// Whether an animation is playing
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Whether input interactivity is enabled
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Apply a tint color (simulates host-engine tinting)
    pub fn set_tint(&mut self, tint: u32) {
        self.tint = Some(tint);
    }

    /// Start an animation (simulates host-engine playback)
    pub fn play_animation(&mut self) {
        self.animating = true;
    }

    /// Attach a free-form data entry
    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// Read a free-form data entry
    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Number of attached data entries
    pub fn data_len(&self) -> usize {
        self.data.len()
    }
}

impl Renderable for HeadlessRenderable {
    fn resource_key(&self) -> &ResourceKey {
        &self.key
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
    }

    fn set_scale(&mut self, sx: f32, sy: f32) {
        self.scale = Vec2::new(sx, sy);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    fn clear_tint(&mut self) {
        self.tint = None;
    }

    fn reset_body(&mut self, config: BodyConfig) {
        self.body = config;
        self.body_bounds_synced = false;
    }

    fn set_physics_enabled(&mut self, enabled: bool) {
        self.physics_enabled = enabled;
    }

    fn sync_body_to_bounds(&mut self) {
        self.body_bounds_synced = true;
    }

    fn stop_animation(&mut self) {
        self.animating = false;
    }

    fn set_interactive(&mut self, enabled: bool) {
        self.interactive = enabled;
    }

    fn clear_data(&mut self) {
        self.data.clear();
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn base_extent(&self) -> Vec2 {
        self.base_extent
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Factory producing [`HeadlessRenderable`] instances
///
/// Resources must be registered before they can be constructed, mirroring
/// the host-engine contract that assets are resolved before `acquire`.
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    resolved: HashMap<ResourceKey, Vec2>,
    next_handle: u64,
    created: u64,
}

impl HeadlessFactory {
    /// Create an empty factory with no resolved resources
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource with its unscaled visual half-extent
    pub fn register(&mut self, key: impl Into<ResourceKey>, base_extent: Vec2) {
        self.resolved.insert(key.into(), base_extent);
    }

    /// Number of renderables constructed over the factory's lifetime
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl RenderableFactory for HeadlessFactory {
    fn is_resolved(&self, key: &ResourceKey) -> bool {
        self.resolved.contains_key(key)
    }

    fn create(&mut self, key: &ResourceKey) -> Result<Box<dyn Renderable>, PoolError> {
        let base_extent = self.resolved.get(key).copied().ok_or_else(|| {
            PoolError::ResourceUnavailable { key: key.clone() }
        })?;

        let handle = self.next_handle;
        self.next_handle += 1;
        self.created += 1;

        Ok(Box::new(HeadlessRenderable::new(key.clone(), handle, base_extent)))
    }
}
