//! Placement entry - a world-resident instance
//!
//! Pure bookkeeping data plus the owned renderable. All mutation goes
//! through the registry so entry state and live renderable state never
//! diverge.

use std::fmt;

use serde::{Serialize, Deserialize};

use crate::foundation::math::{Rect, Vec2};
use crate::renderable::{Renderable, ResourceKey};

/// Unique identifier for a placed world instance
///
/// Monotonically assigned by the registry; survives export/import verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Reconstruct an id from its raw value
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id value
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Optional placement parameters
///
/// # Examples
/// ```
/// # use sandbox_engine::world::PlaceOptions;
/// let options = PlaceOptions::new()
///     .with_rotation(0.3)
///     .with_scale(2.0, 2.0)
///     .with_collision(false);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOptions {
    /// Initial rotation in radians
    pub rotation: f32,
    /// Initial scale factors
    pub scale: Vec2,
    /// Collision flag; `None` uses the registry default
    pub collision: Option<bool>,
    /// Explicit draw-order index; `None` assigns the next index
    pub z_index: Option<u32>,
}

impl Default for PlaceOptions {
    fn default() -> Self {
        Self {
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            collision: None,
            z_index: None,
        }
    }
}

impl PlaceOptions {
    /// Create default placement options
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set initial rotation (radians)
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    /// Builder pattern: Set initial non-uniform scale
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self
    }

    /// Builder pattern: Set the collision flag explicitly
    pub fn with_collision(mut self, enabled: bool) -> Self {
        self.collision = Some(enabled);
        self
    }

    /// Builder pattern: Set an explicit draw-order index
    pub fn with_z_index(mut self, z_index: u32) -> Self {
        self.z_index = Some(z_index);
        self
    }
}

/// A placed world instance
///
/// Owns exactly one active renderable for its lifetime; removing the entry
/// returns the renderable to the pool.
pub struct PlacementEntry {
    pub(crate) id: InstanceId,
    pub(crate) resource_key: ResourceKey,
    pub(crate) position: Vec2,
    pub(crate) rotation: f32,
    pub(crate) scale: Vec2,
    pub(crate) collision_enabled: bool,
    pub(crate) z_index: u32,
    pub(crate) visible: bool,
    pub(crate) renderable: Box<dyn Renderable>,
}

impl PlacementEntry {
    /// Unique instance identifier
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Resource this entry renders
    pub fn resource_key(&self) -> &ResourceKey {
        &self.resource_key
    }

    /// World position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Non-uniform scale factors
    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Whether the collision body is enabled
    pub fn collision_enabled(&self) -> bool {
        self.collision_enabled
    }

    /// Draw-order index (higher renders later)
    pub fn z_index(&self) -> u32 {
        self.z_index
    }

    /// Visibility as computed by the last culling pass
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Conservative world-space bounding box
    ///
    /// The rotated visual is enclosed in an axis-aligned box so culling
    /// never hides an entry that is partially on screen.
    pub fn world_bounds(&self) -> Rect {
        let base = self.renderable.base_extent();
        let half = Vec2::new((base.x * self.scale.x).abs(), (base.y * self.scale.y).abs());
        let (sin, cos) = self.rotation.sin_cos();
        let enclosing = Vec2::new(
            half.x * cos.abs() + half.y * sin.abs(),
            half.x * sin.abs() + half.y * cos.abs(),
        );
        Rect::from_center_half_extents(self.position, enclosing)
    }

    /// Adapter-specific read access to the owned renderable
    pub fn renderable(&self) -> &dyn Renderable {
        self.renderable.as_ref()
    }

    /// Update the derived visibility flag and the live renderable together
    pub(crate) fn apply_visibility(&mut self, visible: bool) {
        self.visible = visible;
        self.renderable.set_visible(visible);
    }
}

impl fmt::Debug for PlacementEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementEntry")
            .field("id", &self.id)
            .field("resource_key", &self.resource_key)
            .field("position", &self.position)
            .field("rotation", &self.rotation)
            .field("scale", &self.scale)
            .field("collision_enabled", &self.collision_enabled)
            .field("z_index", &self.z_index)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::foundation::math::constants::HALF_PI;
    use crate::pool::RenderableFactory;
    use crate::renderable::HeadlessFactory;

    fn entry_with(rotation: f32, scale: Vec2) -> PlacementEntry {
        let mut factory = HeadlessFactory::new();
        factory.register("crate", Vec2::new(10.0, 4.0));
        let renderable = factory.create(&ResourceKey::new("crate")).unwrap();
        PlacementEntry {
            id: InstanceId::from_raw(0),
            resource_key: ResourceKey::new("crate"),
            position: Vec2::new(100.0, 50.0),
            rotation,
            scale,
            collision_enabled: true,
            z_index: 0,
            visible: true,
            renderable,
        }
    }

    #[test]
    fn test_world_bounds_axis_aligned() {
        let entry = entry_with(0.0, Vec2::new(1.0, 1.0));
        let bounds = entry.world_bounds();

        assert_relative_eq!(bounds.min, Vec2::new(90.0, 46.0));
        assert_relative_eq!(bounds.max, Vec2::new(110.0, 54.0));
    }

    #[test]
    fn test_world_bounds_scaled() {
        let entry = entry_with(0.0, Vec2::new(2.0, 0.5));
        let bounds = entry.world_bounds();

        assert_relative_eq!(bounds.half_extents(), Vec2::new(20.0, 2.0));
    }

    #[test]
    fn test_world_bounds_quarter_turn_swaps_extents() {
        let entry = entry_with(HALF_PI, Vec2::new(1.0, 1.0));
        let bounds = entry.world_bounds();

        assert_relative_eq!(bounds.half_extents(), Vec2::new(4.0, 10.0), epsilon = 1e-4);
    }

    #[test]
    fn test_world_bounds_rotation_is_conservative() {
        // At 45 degrees the enclosing box must cover the rotated corners.
        let entry = entry_with(HALF_PI / 2.0, Vec2::new(1.0, 1.0));
        let half = entry.world_bounds().half_extents();
        let corner_reach = (10.0f32 * 10.0 + 4.0 * 4.0).sqrt();

        assert!(half.x >= 10.0 && half.y >= 4.0);
        assert!(half.x <= corner_reach && half.y <= corner_reach);
    }
}
